// SPDX-License-Identifier: MIT

//! Partitioning layer of the bim image generator: disk geometry, CRC32,
//! version-4 GUIDs, protective MBR and GPT.

#[macro_use]
mod macros;
mod io_ext;

/// CRC32 engine shared by the GPT and FAT volume ids.
pub mod crc;
pub mod errors;
/// GUID Partition Table (GPT) writer and read-back helpers.
pub mod gpt;
pub mod guid;
/// Partition type GUIDs.
pub mod guids;
/// Image geometry.
pub mod layout;
/// Protective Master Boot Record.
pub mod mbr;

pub use io_ext::BimIOLbaExt;

pub const DEFAULT_SECTOR_SIZE: u64 = layout::SECTOR_SIZE;
