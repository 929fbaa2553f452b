// SPDX-License-Identifier: MIT

//! Image assembly: protective MBR, GPT, then the ESP's FAT32 bootstrap, all
//! against one shared sink.

use core::fmt;

use bimfs::fat32::{Fat32Formatter, Fat32Meta, FsFormatter, FsFormatterError};
use bimio::BimIO;
use bimpart::{
    crc::crc32,
    errors::PartError,
    gpt::{GptEntry, GptTables, write_gpt},
    guid::{EntropySource, Guid, GuidGenerator},
    guids::{GPT_PARTITION_TYPE_BASIC_DATA, GPT_PARTITION_TYPE_ESP},
    layout::ImageLayout,
    mbr::write_mbr_protective,
};
use time::OffsetDateTime;

pub const ESP_NAME: &str = "EFI SYSTEM";
pub const DATA_NAME: &str = "BASIC DATA";

/// Failure of one writer stage; the stage is the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageError {
    Mbr(PartError),
    Gpt(PartError),
    Fat32(FsFormatterError),
}

impl ImageError {
    pub fn stage(&self) -> &'static str {
        match self {
            ImageError::Mbr(_) => "legacy-record write",
            ImageError::Gpt(_) => "partition-table write",
            ImageError::Fat32(_) => "filesystem-bootstrap write",
        }
    }
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Mbr(e) | ImageError::Gpt(e) => write!(f, "{} failed: {e}", self.stage()),
            ImageError::Fat32(e) => write!(f, "{} failed: {e}", self.stage()),
        }
    }
}

impl std::error::Error for ImageError {}

/// What was written, for logging and tests.
#[derive(Debug, Clone)]
pub struct ImageReport {
    pub layout: ImageLayout,
    pub disk_guid: Guid,
    pub esp_guid: Guid,
    pub data_guid: Guid,
    pub tables: GptTables,
    pub fat: Fat32Meta,
}

impl ImageReport {
    #[inline]
    pub fn entries_crc32(&self) -> u32 {
        self.tables.primary.entries_crc.get()
    }

    #[inline]
    pub fn volume_id(&self) -> u32 {
        self.fat.volume_id
    }
}

impl fmt::Display for ImageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let l = &self.layout;
        writeln!(f, "disk      {}  {} sectors", self.disk_guid, l.total_sectors)?;
        writeln!(
            f,
            "esp       {}  LBA {}..={}",
            self.esp_guid,
            l.esp.start_lba,
            l.esp.end_lba()
        )?;
        writeln!(
            f,
            "data      {}  LBA {}..={}",
            self.data_guid,
            l.data.start_lba,
            l.data.end_lba()
        )?;
        writeln!(
            f,
            "gpt       entries crc {:#010x}  header crc {:#010x} / {:#010x}",
            self.entries_crc32(),
            self.tables.primary.header_crc.get(),
            self.tables.backup.header_crc.get()
        )?;
        write!(
            f,
            "fat32     id {:#010x}  fat {} sectors  {} clusters",
            self.volume_id(),
            self.fat.fat_size_sectors,
            self.fat.cluster_count
        )
    }
}

/// Writes a complete image to `io`, stamping the FAT directories with the
/// current time.
pub fn write_image<IO, E>(
    io: &mut IO,
    layout: &ImageLayout,
    guids: &mut GuidGenerator<E>,
) -> Result<ImageReport, ImageError>
where
    IO: BimIO + ?Sized,
    E: EntropySource,
{
    write_image_at(io, layout, guids, bimfs::core::now_utc())
}

/// Same as [`write_image`] with a fixed directory timestamp.
///
/// The sink must already span `layout.total_bytes()`. GUIDs are drawn in the
/// order disk, ESP, data.
pub fn write_image_at<IO, E>(
    io: &mut IO,
    layout: &ImageLayout,
    guids: &mut GuidGenerator<E>,
    timestamp: OffsetDateTime,
) -> Result<ImageReport, ImageError>
where
    IO: BimIO + ?Sized,
    E: EntropySource,
{
    let disk_guid = guids.new_guid();
    let esp_guid = guids.new_guid();
    let data_guid = guids.new_guid();

    write_mbr_protective(io, layout.total_sectors).map_err(ImageError::Mbr)?;

    let entries = [
        GptEntry::new(GPT_PARTITION_TYPE_ESP, esp_guid, &layout.esp, ESP_NAME),
        GptEntry::new(GPT_PARTITION_TYPE_BASIC_DATA, data_guid, &layout.data, DATA_NAME),
    ];
    let tables = write_gpt(io, layout, disk_guid, &entries).map_err(ImageError::Gpt)?;

    let fat = format_esp(io, layout, crc32(&esp_guid.to_disk_bytes()), timestamp)
        .map_err(ImageError::Fat32)?;

    Ok(ImageReport {
        layout: *layout,
        disk_guid,
        esp_guid,
        data_guid,
        tables,
        fat,
    })
}

fn format_esp<IO: BimIO + ?Sized>(
    io: &mut IO,
    layout: &ImageLayout,
    volume_id: u32,
    timestamp: OffsetDateTime,
) -> Result<Fat32Meta, FsFormatterError> {
    let hidden_sectors = u32::try_from(layout.esp.start_lba)
        .map_err(|_| FsFormatterError::Invalid("ESP starts beyond 32-bit sector range"))?;
    let meta = Fat32Meta::new(
        layout.esp.byte_len(layout.sector_size),
        hidden_sectors,
        volume_id,
    )?;

    let base = io.partition_offset();
    io.set_offset(base + layout.esp.byte_offset(layout.sector_size));
    let result = Fat32Formatter::new(&mut *io, &meta)
        .with_timestamp(timestamp)
        .format(false);
    io.set_offset(base);

    result.map(|()| meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bimio::prelude::*;
    use bimpart::guid::XorShiftEntropy;

    fn generator() -> GuidGenerator<XorShiftEntropy> {
        GuidGenerator::new(XorShiftEntropy::from_seed(7))
    }

    #[test]
    fn report_matches_layout() {
        let layout = ImageLayout::new();
        let mut buf = vec![0u8; layout.total_bytes() as usize];
        let mut io = MemBimIO::new(&mut buf);
        let report = write_image(&mut io, &layout, &mut generator()).unwrap();

        assert_eq!(report.layout, layout);
        assert_eq!(report.fat.hidden_sectors, 2048);
        assert_eq!(report.volume_id(), crc32(&report.esp_guid.to_disk_bytes()));
        assert_ne!(report.disk_guid, report.esp_guid);
        assert_ne!(report.esp_guid, report.data_guid);
        assert_eq!(io.partition_offset(), 0);
    }

    #[test]
    fn stages_are_named() {
        let layout = ImageLayout::new();

        let mut tiny = vec![0u8; 256];
        let err = write_image(&mut MemBimIO::new(&mut tiny), &layout, &mut generator()).unwrap_err();
        assert_eq!(err, ImageError::Mbr(PartError::IO(BimIOError::OutOfBounds)));
        assert_eq!(err.stage(), "legacy-record write");

        // Room for the primary GPT but not the backup.
        let mut short = vec![0u8; 64 * 1024];
        let err = write_image(&mut MemBimIO::new(&mut short), &layout, &mut generator()).unwrap_err();
        assert!(matches!(err, ImageError::Gpt(_)));
        assert!(err.to_string().starts_with("partition-table write failed"));
    }

    #[test]
    fn undersized_esp_is_a_fat32_stage_error() {
        // A 512 KiB ESP is too small for FAT32.
        let layout = ImageLayout::new();
        let mut buf = vec![0u8; layout.total_bytes() as usize];
        let mut io = MemBimIO::new(&mut buf);
        let mut bad = layout;
        bad.esp.sectors = 1024;
        let err = write_image(&mut io, &bad, &mut generator()).unwrap_err();
        assert!(matches!(err, ImageError::Fat32(FsFormatterError::Invalid(_))));
        assert_eq!(err.stage(), "filesystem-bootstrap write");
    }
}
