// SPDX-License-Identifier: MIT

pub use crate::core::errors::{FsFormatterError, FsFormatterResult};

use crate::core::meta::FsMeta;
use bimio::{BimIO, BimIOExt};

/// Lays down the on-disk structures of an empty filesystem.
///
/// Implementations own their I/O backend and metadata. A *full* format also
/// zeroes the data region; a quick one relies on the backing store already
/// being zero there.
pub trait FsFormatter {
    #[must_use = "format result must be checked for errors"]
    fn format(&mut self, full_format: bool) -> FsFormatterResult;
}

/// Zeroes every data unit that the formatter did not write itself.
pub fn zero_cluster_heap<M: FsMeta<u32>, IO: BimIO + ?Sized>(
    io: &mut IO,
    meta: &M,
    first_free: u32,
) -> FsFormatterResult {
    let last = meta.last_data_unit();
    if first_free > last {
        return Ok(());
    }

    let start = meta.unit_offset(first_free);
    let end = meta.unit_offset(last) + meta.unit_size() as u64;
    let len = end.saturating_sub(start) as usize;

    io.zero_fill(start, len)?;
    Ok(())
}
