// SPDX-License-Identifier: MIT
#![cfg_attr(not(feature = "std"), no_std)]

//! Filesystem formatters for bim disk images.

#[macro_use]
extern crate alloc;

// Core Modules
pub mod core;
pub mod fs;

// Reusable types and traits
pub use self::core::traits::*;

/// FAT32 formatter for the EFI System Partition.
///
/// See [`fat32::Fat32Meta`] and [`fat32::Fat32Formatter`].
pub mod fat32 {
    pub use super::fs::fat32::prelude::*;
}
