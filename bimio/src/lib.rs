// SPDX-License-Identifier: MIT
#![cfg_attr(not(feature = "std"), no_std)]

//! Positioned byte sink used by every bim writer.
//!
//! Writers never stream: each structure is placed at an absolute offset, which
//! lets the backup GPT and the backup boot sector be written out of order.

// Core modules
pub mod errors;
#[macro_use]
mod macros;

// Backend modules
#[cfg(feature = "mem")]
mod mem;

#[cfg(feature = "std")]
mod std;

// Prelude re-exports (central entrypoint)
pub mod prelude {
    pub use super::BimIO;
    pub use super::BimIOExt;
    pub use super::BimIOSetLen;
    pub use super::BimIOStructExt;
    pub use super::errors::*;

    #[cfg(feature = "mem")]
    pub use super::mem::MemBimIO;

    #[cfg(feature = "std")]
    pub use super::std::StdBimIO;
}

use errors::*;

/// Size of the internal scratch buffer used by chunked helpers.
pub const BLOCK_BUF_SIZE: usize = 4096;

/// Byte sink abstraction.
///
/// Offsets are relative to `partition_offset()`, so a filesystem formatter can
/// address its volume from zero while the sink maps it into the disk image.
pub trait BimIO {
    /// Writes all of `data` at `offset`. A partial write is an error.
    fn write_at(&mut self, offset: u64, data: &[u8]) -> BimIOResult;

    /// Reads `buf.len()` bytes into `buf` from `offset`.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> BimIOResult;

    /// Flushes any buffered data (may be a no-op).
    fn flush(&mut self) -> BimIOResult;

    /// Sets the base offset applied to every access and returns it.
    fn set_offset(&mut self, partition_offset: u64) -> u64;

    fn partition_offset(&self) -> u64;
}

/// Convenience helpers built on top of [`BimIO`].
pub trait BimIOExt: BimIO {
    /// Fills a region with zeroes.
    ///
    /// Used to pad structures out to a whole sector or cluster.
    #[inline(always)]
    fn zero_fill(&mut self, offset: u64, len: usize) -> BimIOResult {
        const ZERO_BUF: [u8; BLOCK_BUF_SIZE] = [0u8; BLOCK_BUF_SIZE];
        let mut remaining = len;
        let mut off = offset;
        while remaining > 0 {
            let chunk = remaining.min(ZERO_BUF.len());
            self.write_at(off, &ZERO_BUF[..chunk])?;
            off += chunk as u64;
            remaining -= chunk;
        }
        Ok(())
    }

    /// Writes `data` followed by zeroes up to `block_size` bytes.
    #[inline]
    fn write_padded(&mut self, offset: u64, data: &[u8], block_size: usize) -> BimIOResult {
        if data.len() > block_size {
            return Err(BimIOError::Other("write_padded: data larger than block"));
        }
        self.write_at(offset, data)?;
        self.zero_fill(offset + data.len() as u64, block_size - data.len())
    }

    // Little-endian helpers for primitive types (u16, u32, u64)
    bimio_impl_primitive_rw!(u16, u32, u64);
}

impl<T: BimIO + ?Sized> BimIOExt for T {}

/// Trait for setting the length of a BimIO object.
pub trait BimIOSetLen: BimIO {
    /// Sets the length of the storage, relative to the partition offset.
    fn set_len(&mut self, len: u64) -> BimIOResult;
}

/// Reads and writes zerocopy structs at a given offset.
pub trait BimIOStructExt: BimIO {
    /// Reads a struct of type `T` from the given offset.
    fn read_struct<T: zerocopy::FromBytes + zerocopy::KnownLayout + zerocopy::Immutable>(
        &mut self,
        offset: u64,
    ) -> BimIOResult<T> {
        let size = core::mem::size_of::<T>();
        if size > BLOCK_BUF_SIZE {
            return Err(BimIOError::Other("read_struct: type too large"));
        }
        let mut buf = [0u8; BLOCK_BUF_SIZE];
        self.read_at(offset, &mut buf[..size])?;
        T::read_from_bytes(&buf[..size]).map_err(|_| BimIOError::Other("read_struct failed"))
    }

    /// Writes a struct of type `T` at the given offset.
    fn write_struct<T: zerocopy::IntoBytes + zerocopy::Immutable>(
        &mut self,
        offset: u64,
        val: &T,
    ) -> BimIOResult {
        self.write_at(offset, val.as_bytes())
    }
}

impl<T: BimIO + ?Sized> BimIOStructExt for T {}
