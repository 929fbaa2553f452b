// SPDX-License-Identifier: MIT

// === Disk Layout Parameters ===

pub const FAT_SECTOR_SIZE: u16 = 512; // BPB_BytsPerSec
pub const FAT_SECTORS_PER_CLUSTER: u8 = 1; // BPB_SecPerClus
pub const FAT_CLUSTER_SIZE: u32 = FAT_SECTOR_SIZE as u32 * FAT_SECTORS_PER_CLUSTER as u32;

pub const DEFAULT_FAT_RESERVED_SECTORS: u16 = 32; // BPB_RsvdSecCnt
pub const FAT_NUM_FATS: u8 = 2; // BPB_NumFATs
pub const FAT_HEADS: u16 = 255; // BPB_NumHeads (CHS hint)
pub const FAT_SECTORS_PER_TRACK: u16 = 63; // BPB_SecPerTrk (CHS hint)

/// The first data cluster is placed on a 1 MiB boundary of the volume.
pub const FAT_DATA_ALIGNMENT_BYTES: u64 = 1024 * 1024;

/// Below this many clusters a volume is FAT16 by definition.
pub const FAT32_MIN_CLUSTERS: u32 = 65525;

// === FAT Region Parameters ===

pub const FAT_ENTRY_SIZE: usize = 4;
pub const FAT_MEDIA_DESCRIPTOR: u8 = 0xF8; // BPB_Media
pub const FAT_MEDIA_ENTRY: u32 = 0x0FFF_FF00 | FAT_MEDIA_DESCRIPTOR as u32; // FAT[0]
pub const FAT_RESERVED_ENTRY: u32 = 0x0FFF_FFFF; // FAT[1]
pub const FAT_EOC: u32 = 0x0FFF_FFFF;
pub const FAT_MASK: u32 = 0x0FFF_FFFF;
pub const FAT_FIRST_CLUSTER: u32 = 2;
pub const FAT_ROOT_CLUSTER: u32 = 2; // BPB_RootClus

// === Special Sector Numbers ===

pub const FAT_VBR_SECTOR: u64 = 0;
pub const FAT_FSINFO_SECTOR: u64 = 1;
pub const FAT_VBR_BACKUP_SECTOR: u64 = 6;
pub const FAT_FSINFO_BACKUP_SECTOR: u64 = 7;

// === Standard FAT32 BPB / Extended BPB Constants ===

pub const FAT_JUMP_BOOT: [u8; 3] = [0xEB, 0x58, 0x90]; // BS_jmpBoot
pub const FAT_OEM_NAME: &[u8; 8] = b"MSWIN4.1"; // BS_OEMName
pub const FAT_DRIVE_NUMBER: u8 = 0x80; // BS_DrvNum
pub const FAT_BOOT_SIGNATURE: u8 = 0x29; // BS_BootSig
pub const FAT_FS_TYPE: &[u8; 8] = b"FAT32   "; // BS_FilSysType
pub const FAT_SIGNATURE: u16 = 0xAA55; // bytes 55 AA
pub const FAT_VOLUME_LABEL_EMPTY: &[u8; 11] = b"NO NAME    ";
pub const FAT_BOOT_CODE_SIZE: usize = 420;

// === FSINFO Constants ===

pub const FAT_FSINFO_LEAD_SIGNATURE: u32 = 0x4161_5252; // "RRaA"
pub const FAT_FSINFO_STRUCT_SIGNATURE: u32 = 0x6141_7272; // "rrAa"
pub const FAT_FSINFO_TRAIL_SIGNATURE: u32 = 0xAA55_0000;
pub const FAT_FSINFO_UNKNOWN: u32 = 0xFFFF_FFFF;

// === Directory Entries ===

pub const FAT_DIR_ENTRY_SIZE: usize = 32;
pub const FAT_DOT_NAME: &[u8; 11] = b".          ";
pub const FAT_DOTDOT_NAME: &[u8; 11] = b"..         ";

/// Directory path created under the root, outermost first (`/EFI/BOOT`).
pub const FAT_BOOT_PATH: [&[u8; 11]; 2] = [b"EFI        ", b"BOOT       "];
