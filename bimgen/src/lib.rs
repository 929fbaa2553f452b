// SPDX-License-Identifier: MIT

//! Bootable GPT + FAT32 disk image generator.
//!
//! [`image::write_image`] lays out a protective MBR, both GPT copies and an
//! ESP holding an empty `/EFI/BOOT` tree on any [`bimio::BimIO`] sink.

pub mod image;
pub mod out;
pub mod utils;

pub use image::{ImageError, ImageReport, write_image, write_image_at};
