// SPDX-License-Identifier: MIT

//! Disk geometry: where every structure of the image lives.
//!
//! All values are derived once from a handful of sizes and never change
//! afterwards. Nothing here can fail; overflow is impossible for any size that
//! fits the 64-bit LBA space the GPT itself can describe.

/// Bytes per logical sector.
pub const SECTOR_SIZE: u64 = 512;

pub const MIB: u64 = 1024 * 1024;

/// Partition alignment unit, in bytes.
pub const ALIGNMENT: u64 = MIB;

/// EFI System Partition size, in bytes.
pub const ESP_SIZE: u64 = 33 * MIB;

/// Basic data partition size, in bytes.
pub const DATA_SIZE: u64 = MIB;

pub const GPT_ENTRY_SIZE: u32 = 128;
pub const GPT_ENTRY_COUNT: u32 = 128;

/// Minimum size reserved for each partition entry array.
pub const GPT_TABLE_MIN_BYTES: u64 = 16 * 1024;

pub const MBR_LBA: u64 = 0;
pub const GPT_PRIMARY_HEADER_LBA: u64 = 1;
pub const GPT_PRIMARY_ENTRIES_LBA: u64 = 2;

/// `ceil(bytes / sector_size)`.
#[inline]
pub const fn bytes_to_sectors(bytes: u64, sector_size: u64) -> u64 {
    bytes.div_ceil(sector_size)
}

/// First multiple of `align` strictly greater than `lba`.
///
/// An already aligned input still moves to the next boundary.
#[inline]
pub const fn next_aligned_lba(lba: u64, align: u64) -> u64 {
    lba - lba % align + align
}

/// Contiguous run of sectors owned by one partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionExtent {
    pub start_lba: u64,
    pub sectors: u64,
}

impl PartitionExtent {
    #[inline]
    pub const fn new(start_lba: u64, sectors: u64) -> Self {
        Self { start_lba, sectors }
    }

    /// Last sector of the partition (inclusive).
    #[inline]
    pub const fn end_lba(&self) -> u64 {
        self.start_lba + self.sectors.saturating_sub(1)
    }

    /// Sector right after the partition.
    #[inline]
    pub const fn next_lba(&self) -> u64 {
        self.start_lba + self.sectors
    }

    #[inline]
    pub const fn byte_offset(&self, sector_size: u64) -> u64 {
        self.start_lba * sector_size
    }

    #[inline]
    pub const fn byte_len(&self, sector_size: u64) -> u64 {
        self.sectors * sector_size
    }
}

/// Inputs of the geometry calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryParams {
    pub esp_bytes: u64,
    pub data_bytes: u64,
    pub sector_size: u64,
    pub alignment_bytes: u64,
    pub entry_count: u32,
    pub entry_size: u32,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self {
            esp_bytes: ESP_SIZE,
            data_bytes: DATA_SIZE,
            sector_size: SECTOR_SIZE,
            alignment_bytes: ALIGNMENT,
            entry_count: GPT_ENTRY_COUNT,
            entry_size: GPT_ENTRY_SIZE,
        }
    }
}

/// Every derived LBA and size of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLayout {
    pub sector_size: u64,
    /// Alignment unit in sectors.
    pub alignment: u64,
    pub entry_count: u32,
    pub entry_size: u32,
    /// Sectors taken by one copy of the partition entry array.
    pub entry_array_sectors: u64,
    pub first_usable_lba: u64,
    pub last_usable_lba: u64,
    pub esp: PartitionExtent,
    pub data: PartitionExtent,
    pub backup_entries_lba: u64,
    pub backup_header_lba: u64,
    pub total_sectors: u64,
}

impl ImageLayout {
    /// Layout for the built-in sizes (33 MiB ESP, 1 MiB data).
    pub fn new() -> Self {
        Self::with_geometry(&GeometryParams::default())
    }

    pub fn with_geometry(p: &GeometryParams) -> Self {
        let sector_size = p.sector_size;
        let alignment = (p.alignment_bytes / sector_size).max(1);

        let table_bytes = (p.entry_count as u64 * p.entry_size as u64).max(GPT_TABLE_MIN_BYTES);
        let entry_array_sectors = bytes_to_sectors(table_bytes, sector_size);
        let first_usable_lba = GPT_PRIMARY_ENTRIES_LBA + entry_array_sectors;

        let esp = PartitionExtent::new(
            next_aligned_lba(first_usable_lba, alignment),
            bytes_to_sectors(p.esp_bytes, sector_size),
        );
        let data = PartitionExtent::new(
            next_aligned_lba(esp.next_lba(), alignment),
            bytes_to_sectors(p.data_bytes, sector_size),
        );

        let total_sectors = data.next_lba() + entry_array_sectors + 1;
        let backup_header_lba = total_sectors - 1;
        let backup_entries_lba = backup_header_lba - entry_array_sectors;

        Self {
            sector_size,
            alignment,
            entry_count: p.entry_count,
            entry_size: p.entry_size,
            entry_array_sectors,
            first_usable_lba,
            last_usable_lba: backup_entries_lba - 1,
            esp,
            data,
            backup_entries_lba,
            backup_header_lba,
            total_sectors,
        }
    }

    #[inline]
    pub fn total_bytes(&self) -> u64 {
        self.total_sectors * self.sector_size
    }

    /// Byte length of one entry array as declared in the header.
    #[inline]
    pub fn entry_array_bytes(&self) -> usize {
        self.entry_count as usize * self.entry_size as usize
    }

    #[inline]
    pub fn lba_offset(&self, lba: u64) -> u64 {
        lba * self.sector_size
    }
}

impl Default for ImageLayout {
    fn default() -> Self {
        Self::new()
    }
}
