// SPDX-License-Identifier: MIT

use alloc::vec::Vec;
use bimio::{BimIO, BimIOExt};
use time::OffsetDateTime;
use zerocopy::IntoBytes;

pub use crate::core::formatter::*;

use crate::fs::fat32::{constant::*, meta::*, types::*, utils};

/// Fat32Formatter:
/// - Writes the reserved region (VBR, FSInfo and their backups), both FATs,
///   the root directory and the `/EFI/BOOT` directory chain.
/// - Every offset is relative to the volume; the caller positions the I/O
///   backend on the partition with [`BimIO::set_offset`].
/// - Directory timestamps come from the wall clock unless overridden.
pub struct Fat32Formatter<'a, IO: BimIO + ?Sized> {
    io: &'a mut IO,
    meta: &'a Fat32Meta,
    timestamp: FatTimestamp,
}

impl<'a, IO: BimIO + ?Sized> Fat32Formatter<'a, IO> {
    pub fn new(io: &'a mut IO, meta: &'a Fat32Meta) -> Self {
        Self {
            io,
            meta,
            timestamp: utils::datetime_now().into(),
        }
    }

    /// Stamps every directory entry with `ts` instead of the current time.
    pub fn with_timestamp(mut self, ts: OffsetDateTime) -> Self {
        self.timestamp = utils::datetime_from(ts).into();
        self
    }

    /// Clusters taken by the root directory and the boot path.
    #[inline]
    pub fn allocated_clusters() -> u32 {
        1 + FAT_BOOT_PATH.len() as u32
    }

    fn write_reserved_region(&mut self) -> FsFormatterResult {
        let meta = self.meta;
        self.io
            .zero_fill(0, meta.sector_offset(meta.reserved_sectors as u64) as usize)?;

        let vbr = Fat32Vbr::from_meta(meta);
        self.io
            .write_at(meta.sector_offset(FAT_VBR_SECTOR), vbr.as_bytes())?;
        self.io
            .write_at(meta.sector_offset(FAT_VBR_BACKUP_SECTOR), vbr.as_bytes())?;

        let fsinfo = Fat32FsInfo::default();
        self.io
            .write_at(meta.sector_offset(FAT_FSINFO_SECTOR), fsinfo.as_bytes())?;
        self.io
            .write_at(meta.sector_offset(FAT_FSINFO_BACKUP_SECTOR), fsinfo.as_bytes())?;

        Ok(())
    }

    fn write_fat_region(&mut self) -> FsFormatterResult {
        let used = Self::allocated_clusters();
        let mut head = Vec::with_capacity((FAT_FIRST_CLUSTER + used) as usize * FAT_ENTRY_SIZE);
        head.extend_from_slice(&FAT_MEDIA_ENTRY.to_le_bytes());
        head.extend_from_slice(&FAT_RESERVED_ENTRY.to_le_bytes());
        for _ in 0..used {
            head.extend_from_slice(&FAT_EOC.to_le_bytes());
        }

        let fat_bytes = self.meta.fat_size_bytes() as usize;
        for fat_index in 0..self.meta.num_fats {
            let offset = self.meta.fat_offset(fat_index);
            self.io.write_padded(offset, &head, fat_bytes)?;
        }
        Ok(())
    }

    fn write_dir_cluster(&mut self, cluster: u32, entries: &[Fat32Entry]) -> FsFormatterResult {
        if !self.meta.is_valid_unit(cluster) {
            return Err(FsFormatterError::Invalid("FAT32: cluster outside the data region"));
        }
        let mut buf = Vec::with_capacity(self.meta.unit_size());
        for e in entries {
            e.to_raw_buffer(&mut buf);
        }
        if buf.len() > self.meta.unit_size() {
            return Err(FsFormatterError::Invalid("FAT32: directory larger than a cluster"));
        }
        let offset = self.meta.unit_offset(cluster);
        self.io.write_padded(offset, &buf, self.meta.unit_size())?;
        Ok(())
    }

    /// Root directory with one entry, then one cluster per path component
    /// holding `.`, `..` and the next component.
    fn write_directories(&mut self) -> FsFormatterResult {
        let ts = self.timestamp;
        let root = self.meta.root_unit();

        self.write_dir_cluster(root, &[Fat32Entry::dir(*FAT_BOOT_PATH[0], root + 1, ts)])?;

        for (depth, _) in FAT_BOOT_PATH.iter().enumerate() {
            let cluster = root + 1 + depth as u32;
            let parent = if depth == 0 { 0 } else { cluster - 1 };

            let mut entries = vec![Fat32Entry::dot(cluster, ts), Fat32Entry::dotdot(parent, ts)];
            if let Some(child) = FAT_BOOT_PATH.get(depth + 1) {
                entries.push(Fat32Entry::dir(**child, cluster + 1, ts));
            }
            self.write_dir_cluster(cluster, &entries)?;
        }
        Ok(())
    }
}

impl<'a, IO: BimIO + ?Sized> FsFormatter for Fat32Formatter<'a, IO> {
    fn format(&mut self, full_format: bool) -> FsFormatterResult {
        self.write_reserved_region()?;
        self.write_fat_region()?;
        self.write_directories()?;
        if full_format {
            let first_free = FAT_FIRST_CLUSTER + Self::allocated_clusters();
            zero_cluster_heap(self.io, self.meta, first_free)?;
        }
        self.io.flush()?;
        Ok(())
    }
}
