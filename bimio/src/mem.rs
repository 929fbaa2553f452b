// SPDX-License-Identifier: MIT

use crate::{BimIO, BimIOError, BimIOResult, BimIOSetLen};

/// In-memory implementation of `BimIO`.
///
/// Backs the staged image mode and most tests.
#[derive(Debug)]
pub struct MemBimIO<'a> {
    buffer: &'a mut [u8],
    partition_offset: u64,
    logical_len: usize,
}

impl<'a> MemBimIO<'a> {
    #[inline]
    pub fn new(buffer: &'a mut [u8]) -> Self {
        let logical_len = buffer.len();

        Self {
            buffer,
            logical_len,
            partition_offset: 0,
        }
    }

    #[inline]
    pub fn new_with_offset(buffer: &'a mut [u8], partition_offset: u64) -> Self {
        let logical_len = buffer.len();

        Self {
            buffer,
            logical_len,
            partition_offset,
        }
    }

    /// Resolves a relative access into a range of the backing slice.
    #[inline]
    fn range(&self, offset: u64, len: usize) -> BimIOResult<core::ops::Range<usize>> {
        let start = self
            .partition_offset
            .checked_add(offset)
            .ok_or(BimIOError::Overflow)?;
        let end = start
            .checked_add(len as u64)
            .ok_or(BimIOError::Overflow)?;
        if end > self.logical_len as u64 {
            return Err(BimIOError::OutOfBounds);
        }
        Ok(start as usize..end as usize)
    }
}

impl<'a> BimIO for MemBimIO<'a> {
    #[inline(always)]
    fn write_at(&mut self, offset: u64, data: &[u8]) -> BimIOResult {
        let range = self.range(offset, data.len())?;
        self.buffer[range].copy_from_slice(data);
        Ok(())
    }

    #[inline(always)]
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> BimIOResult {
        let range = self.range(offset, buf.len())?;
        buf.copy_from_slice(&self.buffer[range]);
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> BimIOResult {
        Ok(())
    }

    #[inline]
    fn set_offset(&mut self, partition_offset: u64) -> u64 {
        self.partition_offset = partition_offset;
        partition_offset
    }

    #[inline]
    fn partition_offset(&self) -> u64 {
        self.partition_offset
    }
}

impl<'a> BimIOSetLen for MemBimIO<'a> {
    fn set_len(&mut self, new_len: u64) -> BimIOResult {
        let end = self
            .partition_offset
            .checked_add(new_len)
            .ok_or(BimIOError::Overflow)?;
        if end > self.buffer.len() as u64 {
            return Err(BimIOError::OutOfBounds);
        }
        self.logical_len = end as usize;
        Ok(())
    }
}
