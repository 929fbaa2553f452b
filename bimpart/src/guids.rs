// SPDX-License-Identifier: MIT

//! Partition type GUIDs written by the image generator.

define_partition_types! {
    ESP => "EFI System Partition",
        [0x28, 0x73, 0x2A, 0xC1, 0x1F, 0xF8, 0xD2, 0x11, 0xBA, 0x4B, 0x00, 0xA0, 0xC9, 0x3E, 0xC9, 0x3B],
    BASIC_DATA => "Basic Data Partition",
        [0xA2, 0xA0, 0xD0, 0xEB, 0xE5, 0xB9, 0x33, 0x44, 0x87, 0xC0, 0x68, 0xB6, 0xB7, 0x26, 0x99, 0xC7],
}
