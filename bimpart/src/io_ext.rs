// SPDX-License-Identifier: MIT

//! Sector-addressed helpers on top of [`BimIO`], so callers pass an LBA
//! instead of multiplying by the sector size everywhere.

use bimio::prelude::*;

#[inline]
fn lba_offset(lba: u64, sector_size: u64) -> BimIOResult<u64> {
    lba.checked_mul(sector_size).ok_or(BimIOError::Overflow)
}

pub trait BimIOLbaExt: BimIO {
    #[inline]
    fn read_at_lba(&mut self, lba: u64, sector_size: u64, buf: &mut [u8]) -> BimIOResult {
        let off = lba_offset(lba, sector_size)?;
        self.read_at(off, buf)
    }

    /// Writes `data` at `lba`, zero-padded up to a whole number of sectors.
    #[inline]
    fn write_sectors_padded(&mut self, lba: u64, sector_size: u64, data: &[u8]) -> BimIOResult {
        let off = lba_offset(lba, sector_size)?;
        let padded = (data.len() as u64).div_ceil(sector_size).max(1) * sector_size;
        self.write_padded(off, data, padded as usize)
    }

    #[inline]
    fn read_struct_lba<T>(&mut self, lba: u64, sector_size: u64) -> BimIOResult<T>
    where
        T: zerocopy::FromBytes + zerocopy::KnownLayout + zerocopy::Immutable,
    {
        let off = lba_offset(lba, sector_size)?;
        self.read_struct::<T>(off)
    }
}

impl<T: BimIO + ?Sized> BimIOLbaExt for T {}
