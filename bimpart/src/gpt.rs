// SPDX-License-Identifier: MIT

//! GUID Partition Table: primary and backup headers plus their entry arrays.

use bimio::prelude::*;
use zerocopy::little_endian::{U16, U32, U64};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::crc::{CRC32, crc32};
use crate::errors::*;
use crate::guid::Guid;
use crate::guids::GptPartitionKind;
use crate::io_ext::BimIOLbaExt;
use crate::layout::{GPT_PRIMARY_ENTRIES_LBA, GPT_PRIMARY_HEADER_LBA, ImageLayout, PartitionExtent};

pub const GPT_SIGNATURE: [u8; 8] = *b"EFI PART";
pub const GPT_REVISION: u32 = 0x0001_0000;
pub const GPT_HEADER_SIZE: u32 = 92;
pub const GPT_NAME_UNITS: usize = 36;

const ENTRY_BASE_SIZE: usize = core::mem::size_of::<GptEntry>();

/// Encodes `name` as UTF-16LE, truncated or zero-padded to 36 code units.
pub fn encode_gpt_name(name: &str) -> [U16; GPT_NAME_UNITS] {
    let mut buf = [U16::ZERO; GPT_NAME_UNITS];
    for (slot, c) in buf.iter_mut().zip(name.encode_utf16()) {
        *slot = U16::new(c);
    }
    buf
}

#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Unaligned, Copy, Clone, Debug)]
#[repr(C)]
pub struct GptEntry {
    pub type_guid: Guid,
    pub unique_guid: Guid,
    pub start_lba: U64,
    /// Inclusive.
    pub end_lba: U64,
    pub attributes: U64,
    pub name: [U16; GPT_NAME_UNITS],
}

const _: () = assert!(core::mem::size_of::<GptEntry>() == 128);

impl GptEntry {
    pub fn new(type_guid: Guid, unique_guid: Guid, extent: &PartitionExtent, name: &str) -> Self {
        Self {
            type_guid,
            unique_guid,
            start_lba: U64::new(extent.start_lba),
            end_lba: U64::new(extent.end_lba()),
            attributes: U64::ZERO,
            name: encode_gpt_name(name),
        }
    }

    #[inline]
    pub fn kind(&self) -> GptPartitionKind {
        GptPartitionKind::from_guid(&self.type_guid)
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().iter().all(|&b| b == 0)
    }

    /// Partition name up to the first NUL.
    pub fn name_lossy(&self) -> String {
        let units: Vec<u16> = self
            .name
            .iter()
            .map(|u| u.get())
            .take_while(|&u| u != 0)
            .collect();
        String::from_utf16_lossy(&units)
    }

    fn validate_in_bounds(&self, first_usable: u64, last_usable: u64) -> PartResult {
        let (start, end) = (self.start_lba.get(), self.end_lba.get());
        if end < start {
            return Err(PartError::Invalid("GPT: partition ends before it starts"));
        }
        if start < first_usable {
            return Err(PartError::Invalid("GPT: partition starts before first usable LBA"));
        }
        if end > last_usable {
            return Err(PartError::Invalid("GPT: partition ends after last usable LBA"));
        }
        Ok(())
    }
}

#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Unaligned, Copy, Clone, Debug)]
#[repr(C)]
pub struct GptHeader {
    pub signature: [u8; 8],
    pub revision: U32,
    pub header_size: U32,
    pub header_crc: U32,
    pub reserved: U32,
    pub current_lba: U64,
    pub backup_lba: U64,
    pub first_usable_lba: U64,
    pub last_usable_lba: U64,
    pub disk_guid: Guid,
    pub entries_lba: U64,
    pub num_entries: U32,
    pub entry_size: U32,
    pub entries_crc: U32,
}

const _: () = assert!(core::mem::size_of::<GptHeader>() == GPT_HEADER_SIZE as usize);

impl GptHeader {
    /// Primary header for `layout`. Both checksums are left at zero until
    /// [`GptHeader::seal`] is called.
    pub fn new_primary(layout: &ImageLayout, disk_guid: Guid) -> Self {
        Self {
            signature: GPT_SIGNATURE,
            revision: U32::new(GPT_REVISION),
            header_size: U32::new(GPT_HEADER_SIZE),
            header_crc: U32::ZERO,
            reserved: U32::ZERO,
            current_lba: U64::new(GPT_PRIMARY_HEADER_LBA),
            backup_lba: U64::new(layout.backup_header_lba),
            first_usable_lba: U64::new(layout.first_usable_lba),
            last_usable_lba: U64::new(layout.last_usable_lba),
            disk_guid,
            entries_lba: U64::new(GPT_PRIMARY_ENTRIES_LBA),
            num_entries: U32::new(layout.entry_count),
            entry_size: U32::new(layout.entry_size),
            entries_crc: U32::ZERO,
        }
    }

    /// Backup copy: current and alternate LBAs swapped, entry array moved to
    /// `backup_entries_lba`, header checksum recomputed.
    pub fn to_backup(&self, backup_entries_lba: u64) -> Self {
        let mut backup = *self;
        backup.current_lba = self.backup_lba;
        backup.backup_lba = self.current_lba;
        backup.entries_lba = U64::new(backup_entries_lba);
        backup.seal();
        backup
    }

    /// CRC32 over the declared header length with the checksum field zeroed.
    pub fn compute_header_crc32(&self) -> u32 {
        let mut zeroed = *self;
        zeroed.header_crc = U32::ZERO;
        let len = (self.header_size.get() as usize).min(core::mem::size_of::<Self>());
        crc32(&zeroed.as_bytes()[..len])
    }

    /// Records the entry array checksum and seals the header.
    pub fn set_entries_crc(&mut self, entries_crc: u32) {
        self.entries_crc = U32::new(entries_crc);
        self.seal();
    }

    #[inline]
    pub fn seal(&mut self) {
        self.header_crc = U32::new(self.compute_header_crc32());
    }

    pub fn validate_header(&self) -> PartResult {
        if self.signature != GPT_SIGNATURE {
            return Err(PartError::Invalid("GPT: invalid signature"));
        }
        if self.revision.get() != GPT_REVISION {
            return Err(PartError::Invalid("GPT: unsupported revision"));
        }
        if self.header_size.get() != GPT_HEADER_SIZE {
            return Err(PartError::Invalid("GPT: unexpected header size"));
        }
        if (self.entry_size.get() as usize) < ENTRY_BASE_SIZE || self.entry_size.get() % 8 != 0 {
            return Err(PartError::Invalid("GPT: invalid entry size"));
        }
        Ok(())
    }

    /// Checks both the header checksum and the checksum of `entry_array`.
    pub fn validate_crc(&self, entry_array: &[u8]) -> PartResult {
        if self.compute_header_crc32() != self.header_crc.get() {
            return Err(PartError::Invalid("GPT: header CRC mismatch"));
        }
        if compute_entries_crc32(entry_array) != self.entries_crc.get() {
            return Err(PartError::Invalid("GPT: entries CRC mismatch"));
        }
        Ok(())
    }

    /// Checks that used entries lie inside the usable range and do not overlap.
    pub fn validate_entries(&self, entries: &[GptEntry]) -> PartResult {
        let (first, last) = (self.first_usable_lba.get(), self.last_usable_lba.get());
        let mut segs: Vec<(u64, u64)> = Vec::with_capacity(entries.len());
        for e in entries.iter().filter(|e| !e.is_empty()) {
            e.validate_in_bounds(first, last)?;
            segs.push((e.start_lba.get(), e.end_lba.get()));
        }
        segs.sort_unstable_by_key(|s| s.0);
        if segs.windows(2).any(|w| w[1].0 <= w[0].1) {
            return Err(PartError::Invalid("GPT: partition overlap detected"));
        }
        Ok(())
    }
}

/// Serializes `entries` into a full `num_entries * entry_size` array; unused
/// slots and per-entry tail bytes are zero.
pub fn build_entry_array(
    entries: &[GptEntry],
    num_entries: u32,
    entry_size: u32,
) -> PartResult<Vec<u8>> {
    let entry_size = entry_size as usize;
    if entry_size < ENTRY_BASE_SIZE {
        return Err(PartError::Invalid("GPT: entry size smaller than an entry"));
    }
    if entries.len() > num_entries as usize {
        return Err(PartError::Invalid("GPT: too many partitions for the entry array"));
    }
    let mut array = vec![0u8; num_entries as usize * entry_size];
    for (slot, e) in array.chunks_exact_mut(entry_size).zip(entries) {
        slot[..ENTRY_BASE_SIZE].copy_from_slice(e.as_bytes());
    }
    Ok(array)
}

/// Parses every slot of an entry array, empty ones included.
pub fn parse_entry_array(array: &[u8], entry_size: u32) -> PartResult<Vec<GptEntry>> {
    let entry_size = entry_size as usize;
    if entry_size < ENTRY_BASE_SIZE {
        return Err(PartError::Invalid("GPT: entry size smaller than an entry"));
    }
    array
        .chunks_exact(entry_size)
        .map(|slot| {
            GptEntry::read_from_bytes(&slot[..ENTRY_BASE_SIZE])
                .map_err(|_| PartError::Invalid("GPT: malformed entry"))
        })
        .collect()
}

#[inline]
pub fn compute_entries_crc32(entry_array: &[u8]) -> u32 {
    let mut digest = CRC32.digest();
    for chunk in entry_array.chunks(crate::DEFAULT_SECTOR_SIZE as usize) {
        digest.update(chunk);
    }
    digest.finalize()
}

/// Both sealed headers as they were written.
#[derive(Debug, Clone, Copy)]
pub struct GptTables {
    pub primary: GptHeader,
    pub backup: GptHeader,
}

/// Writes the primary header and array, then the backup array and header.
///
/// Each array copy fills its whole reserved area, zero-padded; headers are
/// padded to a full sector.
pub fn write_gpt<IO: BimIO + ?Sized>(
    io: &mut IO,
    layout: &ImageLayout,
    disk_guid: Guid,
    entries: &[GptEntry],
) -> PartResult<GptTables> {
    let array = build_entry_array(entries, layout.entry_count, layout.entry_size)?;
    let entries_crc = compute_entries_crc32(&array);

    let mut primary = GptHeader::new_primary(layout, disk_guid);
    primary.set_entries_crc(entries_crc);
    let backup = primary.to_backup(layout.backup_entries_lba);

    let sector_size = layout.sector_size;
    let array_area = (layout.entry_array_sectors * sector_size) as usize;

    io.write_sectors_padded(GPT_PRIMARY_HEADER_LBA, sector_size, primary.as_bytes())?;
    io.write_padded(layout.lba_offset(GPT_PRIMARY_ENTRIES_LBA), &array, array_area)?;
    io.write_padded(layout.lba_offset(layout.backup_entries_lba), &array, array_area)?;
    io.write_sectors_padded(layout.backup_header_lba, sector_size, backup.as_bytes())?;

    Ok(GptTables { primary, backup })
}

/// Reads the header at `lba` and checks its fixed fields.
pub fn read_gpt_header<IO: BimIO + ?Sized>(
    io: &mut IO,
    lba: u64,
    sector_size: u64,
) -> PartResult<GptHeader> {
    let header: GptHeader = io.read_struct_lba(lba, sector_size)?;
    header.validate_header()?;
    Ok(header)
}

/// Reads the raw entry array referenced by `header`.
pub fn read_entry_array<IO: BimIO + ?Sized>(
    io: &mut IO,
    header: &GptHeader,
    sector_size: u64,
) -> PartResult<Vec<u8>> {
    let len = header.num_entries.get() as usize * header.entry_size.get() as usize;
    let mut array = vec![0u8; len];
    io.read_at_lba(header.entries_lba.get(), sector_size, &mut array)?;
    Ok(array)
}
