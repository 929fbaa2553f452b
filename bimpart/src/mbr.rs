// SPDX-License-Identifier: MIT

//! Protective MBR: a single 0xEE entry covering the disk so that legacy tools
//! leave the GPT alone.

use bimio::prelude::*;
use zerocopy::little_endian::{U16, U32};
use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::errors::*;

pub const MBR_SIGNATURE: [u8; 2] = [0x55, 0xAA];
pub const PROTECTIVE_GPT: u8 = 0xEE;

pub const MBR_BOOT_CODE_SIZE: usize = 440;

#[derive(
    IntoBytes, FromBytes, KnownLayout, Immutable, Unaligned, Copy, Clone, Debug, PartialEq, Eq,
)]
#[repr(C)]
pub struct MbrEntry {
    pub boot_flag: u8,
    pub starting_chs: [u8; 3],
    pub part_type: u8,
    pub end_chs: [u8; 3],
    pub start_lba: U32,
    pub sectors: U32,
}

const _: () = assert!(core::mem::size_of::<MbrEntry>() == 16);

impl MbrEntry {
    #[inline]
    pub fn new_empty() -> Self {
        Self::new_zeroed()
    }

    /// Entry 0 of a protective MBR; the size saturates at `u32::MAX`.
    #[inline]
    pub fn new_protective(total_sectors: u64) -> Self {
        let sectors = total_sectors.saturating_sub(1).min(u32::MAX as u64) as u32;
        Self {
            boot_flag: 0x00,
            starting_chs: [0x00, 0x02, 0x00],
            part_type: PROTECTIVE_GPT,
            end_chs: [0xFF, 0xFF, 0xFF],
            start_lba: U32::new(1),
            sectors: U32::new(sectors),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.part_type == 0
    }

    #[inline]
    pub fn is_protective(&self) -> bool {
        self.part_type == PROTECTIVE_GPT
    }
}

#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Unaligned, Copy, Clone, Debug)]
#[repr(C)]
pub struct Mbr {
    pub boot_code: [u8; MBR_BOOT_CODE_SIZE],
    pub disk_signature: U32,
    pub reserved: U16,
    pub entries: [MbrEntry; 4],
    pub signature: [u8; 2],
}

const _: () = assert!(core::mem::size_of::<Mbr>() == 512);

impl Mbr {
    #[inline]
    pub fn new_protective(total_sectors: u64) -> Self {
        let mut mbr = Self::new_zeroed();
        mbr.entries[0] = MbrEntry::new_protective(total_sectors);
        mbr.signature = MBR_SIGNATURE;
        mbr
    }

    #[inline]
    pub fn has_valid_signature(&self) -> bool {
        self.signature == MBR_SIGNATURE
    }

    pub fn validate_header(&self) -> PartResult {
        if !self.has_valid_signature() {
            return Err(PartError::Invalid("MBR: invalid boot signature"));
        }
        Ok(())
    }

    /// Checks the layout written by [`write_mbr_protective`] for a disk of
    /// `total_sectors`.
    pub fn validate_protective(&self, total_sectors: u64) -> PartResult {
        self.validate_header()?;

        let first = &self.entries[0];
        if !first.is_protective() {
            return Err(PartError::Invalid("MBR: first entry is not protective"));
        }
        if self.entries[1..].iter().any(|e| !e.is_empty()) {
            return Err(PartError::Invalid("MBR: extra entries next to protective"));
        }
        if first.start_lba.get() != 1 {
            return Err(PartError::Invalid("MBR: protective entry must start at LBA 1"));
        }
        let expected = total_sectors.saturating_sub(1).min(u32::MAX as u64) as u32;
        if first.sectors.get() != expected {
            return Err(PartError::Invalid("MBR: protective size mismatch"));
        }
        Ok(())
    }
}

/// Writes the protective MBR at offset 0.
pub fn write_mbr_protective<IO: BimIO + ?Sized>(io: &mut IO, total_sectors: u64) -> PartResult {
    let mbr = Mbr::new_protective(total_sectors);
    io.write_struct(0, &mbr)?;
    Ok(())
}

pub fn read_mbr<IO: BimIO + ?Sized>(io: &mut IO) -> PartResult<Mbr> {
    let mbr: Mbr = io.read_struct(0)?;
    mbr.validate_header()?;
    Ok(mbr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_and_parse_protective_mbr() {
        let mut buf = [0xAAu8; 512];
        let mut io = MemBimIO::new(&mut buf);

        write_mbr_protective(&mut io, 73761).unwrap();
        let mbr = read_mbr(&mut io).unwrap();
        mbr.validate_protective(73761).unwrap();

        assert_eq!(mbr.entries[0].part_type, PROTECTIVE_GPT);
        assert_eq!(mbr.entries[0].sectors.get(), 73760);
        assert_eq!(buf[510], 0x55);
        assert_eq!(buf[511], 0xAA);
        assert!(buf[..446 - 6].iter().all(|&b| b == 0));
    }

    #[test]
    fn raw_entry_bytes() {
        let mut buf = [0u8; 512];
        let mut io = MemBimIO::new(&mut buf);
        write_mbr_protective(&mut io, 2048).unwrap();

        assert_eq!(
            &buf[446..462],
            &[
                0x00, 0x00, 0x02, 0x00, 0xEE, 0xFF, 0xFF, 0xFF, 0x01, 0x00, 0x00, 0x00, 0xFF,
                0x07, 0x00, 0x00
            ]
        );
        assert!(buf[462..510].iter().all(|&b| b == 0));
    }

    #[test]
    fn size_saturates_at_2tib() {
        let exact = 1u64 << 32;
        for total in [exact, exact + 1, u64::MAX] {
            let e = MbrEntry::new_protective(total);
            assert_eq!(e.sectors.get(), u32::MAX, "total {total}");
            assert_eq!(e.part_type, 0xEE);
            assert!(Mbr::new_protective(total).validate_protective(total).is_ok());
        }
        // One below the limit still fits exactly.
        assert_eq!(MbrEntry::new_protective(exact - 1).sectors.get(), u32::MAX - 1);
    }

    #[test]
    fn signature_for_any_size() {
        for total in [1u64, 34, 73761, 1 << 40] {
            let mbr = Mbr::new_protective(total);
            assert!(mbr.has_valid_signature());
            assert_eq!(mbr.as_bytes()[510..], [0x55, 0xAA]);
        }
    }

    #[test]
    fn invalid_signature_rejected() {
        let mut bad = Mbr::new_protective(2048);
        bad.signature = [0, 0];
        assert!(bad.validate_header().is_err());
        assert!(bad.validate_protective(2048).is_err());

        let mut buf = [0u8; 512];
        let mut io = MemBimIO::new(&mut buf);
        io.write_struct(0, &bad).unwrap();
        assert_eq!(
            read_mbr(&mut io).unwrap_err(),
            PartError::Invalid("MBR: invalid boot signature")
        );
    }

    #[test]
    fn size_mismatch_rejected() {
        let mbr = Mbr::new_protective(2048);
        assert!(mbr.validate_protective(4096).is_err());
    }

    #[test]
    fn short_sink_fails() {
        let mut buf = [0u8; 256];
        let mut io = MemBimIO::new(&mut buf);
        assert_eq!(
            write_mbr_protective(&mut io, 2048),
            Err(PartError::IO(BimIOError::OutOfBounds))
        );
    }
}
