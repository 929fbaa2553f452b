// SPDX-License-Identifier: MIT

use alloc::vec::Vec;
use zerocopy::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::fs::fat32::{
    attr::Fat32Attributes,
    constant::{FAT_DIR_ENTRY_SIZE, FAT_DOT_NAME, FAT_DOTDOT_NAME},
};

/// Packed FAT timestamp as produced by [`crate::fs::fat32::utils::datetime_from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FatTimestamp {
    pub date: u16,
    pub time: u16,
    pub tenths: u8,
}

impl From<(u16, u16, u8)> for FatTimestamp {
    fn from((date, time, tenths): (u16, u16, u8)) -> Self {
        Self { date, time, tenths }
    }
}

/// 8.3 directory entry.
#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Unaligned, Copy, Clone, Debug)]
#[repr(C)]
pub struct Fat32Entry {
    pub name: [u8; 11],
    pub attr: u8,
    pub nt_reserved: u8,
    pub creation_time_tenth: u8,
    pub creation_time: U16,
    pub creation_date: U16,
    pub access_date: U16,
    pub first_cluster_high: U16,
    pub write_time: U16,
    pub write_date: U16,
    pub first_cluster_low: U16,
    pub file_size: U32,
}

const _: () = assert!(core::mem::size_of::<Fat32Entry>() == FAT_DIR_ENTRY_SIZE);

impl Fat32Entry {
    pub fn new(name: [u8; 11], attr: u8, cluster: u32, size: u32, ts: FatTimestamp) -> Self {
        Self {
            name,
            attr,
            nt_reserved: 0,
            creation_time_tenth: ts.tenths,
            creation_time: U16::new(ts.time),
            creation_date: U16::new(ts.date),
            access_date: U16::new(ts.date),
            first_cluster_high: U16::new((cluster >> 16) as u16),
            write_time: U16::new(ts.time),
            write_date: U16::new(ts.date),
            first_cluster_low: U16::new(cluster as u16),
            file_size: U32::new(size),
        }
    }

    pub fn dir(name: [u8; 11], cluster: u32, ts: FatTimestamp) -> Self {
        Self::new(name, Fat32Attributes::DIRECTORY.bits(), cluster, 0, ts)
    }

    pub fn dot(current_cluster: u32, ts: FatTimestamp) -> Self {
        Self::dir(*FAT_DOT_NAME, current_cluster, ts)
    }

    /// `..` entry; a parent that is the root directory is recorded as cluster 0.
    pub fn dotdot(parent_cluster: u32, ts: FatTimestamp) -> Self {
        Self::dir(*FAT_DOTDOT_NAME, parent_cluster, ts)
    }

    pub fn first_cluster(&self) -> u32 {
        ((self.first_cluster_high.get() as u32) << 16) | (self.first_cluster_low.get() as u32)
    }

    pub fn attributes(&self) -> Fat32Attributes {
        Fat32Attributes::from_bits_truncate(self.attr)
    }

    pub fn is_dir(&self) -> bool {
        self.attributes().contains(Fat32Attributes::DIRECTORY)
    }

    #[inline(always)]
    pub fn to_raw_buffer(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: FatTimestamp = FatTimestamp {
        date: 0x5861,
        time: 0x6DAF,
        tenths: 42,
    };

    #[test]
    fn entry_layout() {
        let e = Fat32Entry::dir(*b"EFI        ", 0x0001_0003, TS);
        let b = e.as_bytes();
        assert_eq!(&b[0..11], b"EFI        ");
        assert_eq!(b[11], 0x10);
        assert_eq!(b[13], 42);
        assert_eq!(&b[14..16], &0x6DAFu16.to_le_bytes());
        assert_eq!(&b[16..18], &0x5861u16.to_le_bytes());
        assert_eq!(&b[18..20], &0x5861u16.to_le_bytes());
        assert_eq!(&b[20..22], &[0x01, 0x00]);
        assert_eq!(&b[22..24], &0x6DAFu16.to_le_bytes());
        assert_eq!(&b[24..26], &0x5861u16.to_le_bytes());
        assert_eq!(&b[26..28], &[0x03, 0x00]);
        assert_eq!(&b[28..32], &[0; 4]);
        assert_eq!(e.first_cluster(), 0x0001_0003);
    }

    #[test]
    fn dot_entries() {
        let dot = Fat32Entry::dot(4, TS);
        let dotdot = Fat32Entry::dotdot(0, TS);
        assert_eq!(&dot.name, b".          ");
        assert_eq!(&dotdot.name, b"..         ");
        assert_eq!(dot.first_cluster(), 4);
        assert_eq!(dotdot.first_cluster(), 0);
        assert!(dot.is_dir() && dotdot.is_dir());
    }

    #[test]
    fn raw_buffer_appends() {
        let mut buf = Vec::new();
        Fat32Entry::dot(3, TS).to_raw_buffer(&mut buf);
        Fat32Entry::dotdot(0, TS).to_raw_buffer(&mut buf);
        assert_eq!(buf.len(), 64);
        let parsed = Fat32Entry::read_from_bytes(&buf[32..]).unwrap();
        assert_eq!(&parsed.name, FAT_DOTDOT_NAME);
    }
}
