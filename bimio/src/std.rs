// SPDX-License-Identifier: MIT

use std::io::{Error, ErrorKind, Read, Seek, SeekFrom, Write};

use crate::{BimIO, BimIOError, BimIOResult, BimIOSetLen};

/// `BimIO` over any seekable std stream (file, cursor, ...).
#[derive(Debug)]
pub struct StdBimIO<'a, T: Read + Write + Seek> {
    io: &'a mut T,
    partition_offset: u64,
}

impl<'a, T: Read + Write + Seek> StdBimIO<'a, T> {
    #[inline]
    pub fn new(io: &'a mut T) -> Self {
        Self {
            io,
            partition_offset: 0,
        }
    }

    #[inline]
    pub fn new_with_offset(io: &'a mut T, partition_offset: u64) -> Self {
        Self {
            io,
            partition_offset,
        }
    }

    #[inline]
    fn seek_to(&mut self, offset: u64) -> BimIOResult {
        let abs_offset = self
            .partition_offset
            .checked_add(offset)
            .ok_or(BimIOError::Overflow)?;
        self.io.seek(SeekFrom::Start(abs_offset))?;
        Ok(())
    }
}

impl<'a, T: Read + Write + Seek> BimIO for StdBimIO<'a, T> {
    fn write_at(&mut self, offset: u64, data: &[u8]) -> BimIOResult {
        self.seek_to(offset)?;
        self.io.write_all(data)?;
        Ok(())
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> BimIOResult {
        self.seek_to(offset)?;
        self.io.read_exact(buf)?;
        Ok(())
    }

    fn flush(&mut self) -> BimIOResult {
        self.io.flush()?;
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

impl<'a> BimIOSetLen for StdBimIO<'a, std::fs::File> {
    fn set_len(&mut self, len: u64) -> BimIOResult {
        let end = self
            .partition_offset
            .checked_add(len)
            .ok_or(BimIOError::Overflow)?;
        self.io.set_len(end)?;
        self.io.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}

impl From<Error> for BimIOError {
    #[cold]
    #[inline(never)]
    fn from(e: Error) -> Self {
        match e.kind() {
            ErrorKind::WriteZero => BimIOError::ShortWrite,
            ErrorKind::UnexpectedEof => BimIOError::ShortRead,
            ErrorKind::Unsupported => BimIOError::Unsupported,
            _ => {
                // Leak the message to produce a 'static str; errors end the run anyway.
                let leaked: &'static str = Box::leak(e.to_string().into_boxed_str());
                BimIOError::Other(leaked)
            }
        }
    }
}
