// SPDX-License-Identifier: MIT

use zerocopy::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::fs::fat32::{constant::*, meta::*};

#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Unaligned, Copy, Clone, Debug)]
#[repr(C)]
pub struct Fat32Vbr {
    pub jump_boot: [u8; 3],
    pub oem_name: [u8; 8],
    pub bytes_per_sector: U16,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: U16,
    pub num_fats: u8,
    pub root_entry_count: U16,
    pub total_sectors_16: U16,
    pub media: u8,
    pub fat_size_16: U16,
    pub sectors_per_track: U16,
    pub num_heads: U16,
    pub hidden_sectors: U32,
    pub total_sectors_32: U32,

    // FAT32 Extended BPB
    pub fat_size_32: U32,
    pub ext_flags: U16,
    pub fs_version: U16,
    pub root_cluster: U32,
    pub fsinfo_sector: U16,
    pub backup_boot_sector: U16,
    pub reserved: [u8; 12],

    pub drive_number: u8,
    pub reserved1: u8,
    pub boot_signature: u8,
    pub volume_id: U32,
    pub volume_label: [u8; 11],
    pub fs_type: [u8; 8],

    pub boot_code: [u8; FAT_BOOT_CODE_SIZE],
    pub signature: U16,
}

const _: () = assert!(core::mem::size_of::<Fat32Vbr>() == 512);

impl Fat32Vbr {
    pub fn from_meta(meta: &Fat32Meta) -> Self {
        Self {
            jump_boot: FAT_JUMP_BOOT,
            oem_name: *FAT_OEM_NAME,
            bytes_per_sector: U16::new(meta.bytes_per_sector),
            sectors_per_cluster: meta.sectors_per_cluster,
            reserved_sectors: U16::new(meta.reserved_sectors),
            num_fats: meta.num_fats,
            root_entry_count: U16::ZERO,
            total_sectors_16: U16::ZERO,
            media: FAT_MEDIA_DESCRIPTOR,
            fat_size_16: U16::ZERO,
            sectors_per_track: U16::new(FAT_SECTORS_PER_TRACK),
            num_heads: U16::new(FAT_HEADS),
            hidden_sectors: U32::new(meta.hidden_sectors),
            total_sectors_32: U32::new(meta.volume_size_sectors),
            fat_size_32: U32::new(meta.fat_size_sectors),
            ext_flags: U16::ZERO,
            fs_version: U16::ZERO,
            root_cluster: U32::new(meta.root_unit()),
            fsinfo_sector: U16::new(FAT_FSINFO_SECTOR as u16),
            backup_boot_sector: U16::new(FAT_VBR_BACKUP_SECTOR as u16),
            reserved: [0u8; 12],
            drive_number: FAT_DRIVE_NUMBER,
            reserved1: 0,
            boot_signature: FAT_BOOT_SIGNATURE,
            volume_id: U32::new(meta.volume_id),
            volume_label: meta.volume_label,
            fs_type: *FAT_FS_TYPE,
            boot_code: [0u8; FAT_BOOT_CODE_SIZE],
            signature: U16::new(FAT_SIGNATURE),
        }
    }
}

#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Unaligned, Copy, Clone, Debug)]
#[repr(C)]
pub struct Fat32FsInfo {
    pub lead_signature: U32,
    pub reserved1: [u8; 480],
    pub struct_signature: U32,
    pub free_cluster_count: U32,
    pub next_free_cluster: U32,
    pub reserved2: [u8; 12],
    pub trail_signature: U32,
}

const _: () = assert!(core::mem::size_of::<Fat32FsInfo>() == 512);

impl Default for Fat32FsInfo {
    /// Free count and next-free hint both "unknown".
    fn default() -> Self {
        Self {
            lead_signature: U32::new(FAT_FSINFO_LEAD_SIGNATURE),
            reserved1: [0u8; 480],
            struct_signature: U32::new(FAT_FSINFO_STRUCT_SIGNATURE),
            free_cluster_count: U32::new(FAT_FSINFO_UNKNOWN),
            next_free_cluster: U32::new(FAT_FSINFO_UNKNOWN),
            reserved2: [0u8; 12],
            trail_signature: U32::new(FAT_FSINFO_TRAIL_SIGNATURE),
        }
    }
}
