// SPDX-License-Identifier: MIT

pub use crate::core::meta::*;

use crate::core::errors::*;
use crate::fs::fat32::constant::*;

/// Geometry of a FAT32 volume, derived from its size.
#[derive(Debug, Clone)]
pub struct Fat32Meta {
    pub volume_id: u32,
    pub volume_label: [u8; 11],

    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub bytes_per_cluster: u32,

    pub volume_size_bytes: u64,
    pub volume_size_sectors: u32,
    /// Sectors preceding the volume on the disk (partition start LBA).
    pub hidden_sectors: u32,

    pub reserved_sectors: u16,
    pub num_fats: u8,
    pub fat_offset_bytes: u64,
    pub fat_size_sectors: u32,

    pub cluster_heap_offset: u64,
    pub cluster_count: u32,

    root_cluster: u32,
}

impl Fat32Meta {
    /// Default FAT32 geometry (512-byte sectors, one sector per cluster,
    /// 32 reserved sectors, two FATs) for a volume of `size_bytes` that starts
    /// at disk sector `hidden_sectors`.
    pub fn new(size_bytes: u64, hidden_sectors: u32, volume_id: u32) -> FsFormatterResult<Self> {
        Self::new_custom(
            size_bytes,
            hidden_sectors,
            volume_id,
            None,
            FAT_NUM_FATS,
            FAT_SECTOR_SIZE,
            FAT_CLUSTER_SIZE,
            DEFAULT_FAT_RESERVED_SECTORS,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new_custom(
        volume_size_bytes: u64,
        hidden_sectors: u32,
        volume_id: u32,
        volume_label: Option<&str>,
        num_fats: u8,
        bytes_per_sector: u16,
        bytes_per_cluster: u32,
        reserved_sectors: u16,
    ) -> FsFormatterResult<Self> {
        if bytes_per_sector == 0 || bytes_per_cluster % bytes_per_sector as u32 != 0 {
            return Err(FsFormatterError::Invalid(
                "FAT32: cluster size must be a multiple of sector size",
            ));
        }
        let sectors_per_cluster = bytes_per_cluster / bytes_per_sector as u32;
        if sectors_per_cluster == 0 || sectors_per_cluster > 128 {
            return Err(FsFormatterError::Invalid("FAT32: unsupported cluster size"));
        }
        if num_fats == 0 || reserved_sectors as u64 <= FAT_FSINFO_BACKUP_SECTOR {
            return Err(FsFormatterError::Invalid("FAT32: invalid reserved region"));
        }

        let mut volume_label_safe = *FAT_VOLUME_LABEL_EMPTY;
        if let Some(label) = volume_label {
            volume_label_safe = [b' '; 11];
            for (dst, b) in volume_label_safe.iter_mut().zip(label.bytes()) {
                *dst = b.to_ascii_uppercase();
            }
        }

        let volume_size_sectors = volume_size_bytes / bytes_per_sector as u64;
        if volume_size_sectors > u32::MAX as u64 {
            return Err(FsFormatterError::Invalid("FAT32: volume too large"));
        }

        let (fat_size_sectors, _) = converge_fat_layout(
            bytes_per_sector as u32,
            volume_size_sectors,
            reserved_sectors as u32,
            FAT_ENTRY_SIZE as u32,
            FAT_FIRST_CLUSTER,
            num_fats,
            sectors_per_cluster,
        );

        let align = (FAT_DATA_ALIGNMENT_BYTES / bytes_per_sector as u64).max(1);
        let (fat_size_sectors, data_start) =
            align_data_region(reserved_sectors as u64, num_fats, fat_size_sectors, align);

        let cluster_count =
            (volume_size_sectors.saturating_sub(data_start) / sectors_per_cluster as u64) as u32;
        if fat_capacity(fat_size_sectors, bytes_per_sector)
            < cluster_count as u64 + FAT_FIRST_CLUSTER as u64
        {
            return Err(FsFormatterError::Invalid("FAT32: FAT cannot map every cluster"));
        }
        if cluster_count < FAT32_MIN_CLUSTERS {
            return Err(FsFormatterError::Invalid(
                "FAT32: volume too small (fewer than 65525 clusters)",
            ));
        }

        let fat_offset_bytes = reserved_sectors as u64 * bytes_per_sector as u64;
        let cluster_heap_offset = data_start * bytes_per_sector as u64;

        Ok(Self {
            volume_id,
            volume_label: volume_label_safe,
            bytes_per_sector,
            sectors_per_cluster: sectors_per_cluster as u8,
            bytes_per_cluster,
            volume_size_bytes,
            volume_size_sectors: volume_size_sectors as u32,
            hidden_sectors,
            reserved_sectors,
            num_fats,
            fat_offset_bytes,
            fat_size_sectors,
            cluster_heap_offset,
            cluster_count,
            root_cluster: FAT_ROOT_CLUSTER,
        })
    }

    #[inline]
    pub fn sector_offset(&self, sector: u64) -> u64 {
        sector * self.bytes_per_sector as u64
    }

    #[inline]
    pub fn fat_size_bytes(&self) -> u64 {
        self.fat_size_sectors as u64 * self.bytes_per_sector as u64
    }

    /// Byte offset of FAT copy `fat_index`.
    #[inline]
    pub fn fat_offset(&self, fat_index: u8) -> u64 {
        self.fat_offset_bytes + fat_index as u64 * self.fat_size_bytes()
    }

    #[inline]
    pub fn fat_entry_offset(&self, cluster: u32, fat_index: u8) -> u64 {
        self.fat_offset(fat_index) + cluster as u64 * FAT_ENTRY_SIZE as u64
    }

    /// First data sector, relative to the volume.
    #[inline]
    pub fn data_start_sector(&self) -> u64 {
        self.cluster_heap_offset / self.bytes_per_sector as u64
    }
}

impl FsMeta<u32> for Fat32Meta {
    fn unit_size(&self) -> usize {
        self.bytes_per_cluster as usize
    }

    fn root_unit(&self) -> u32 {
        self.root_cluster
    }

    fn size_bytes(&self) -> u64 {
        self.volume_size_bytes
    }

    fn unit_offset(&self, cluster: u32) -> u64 {
        self.cluster_heap_offset + ((cluster - FAT_FIRST_CLUSTER) as u64 * self.unit_size() as u64)
    }

    fn first_data_unit(&self) -> u32 {
        FAT_FIRST_CLUSTER
    }

    fn last_data_unit(&self) -> u32 {
        FAT_FIRST_CLUSTER + self.cluster_count - 1
    }
}

/// Computes the FAT size and cluster count for a given FAT configuration.
///
/// Returns the smallest FAT that still maps every cluster left once the FATs
/// themselves are carved out of the volume. The sectors a FAT needs only shrink
/// as it grows, so the smallest fitting size is found by bisection.
///
/// # Returns
/// Tuple `(fat_size, cluster_count)`
/// - `fat_size`: FAT size in sectors
/// - `cluster_count`: Number of data clusters
pub fn converge_fat_layout(
    sector_size: u32,
    total_sectors: u64,
    reserved_sectors: u32,
    entry_size: u32,
    min_entries: u32,
    num_fats: u8,
    sectors_per_cluster: u32,
) -> (u32, u32) {
    let spc = sectors_per_cluster as u64;
    let clusters_for = |fat_size: u64| {
        total_sectors
            .saturating_sub(reserved_sectors as u64)
            .saturating_sub(fat_size * num_fats as u64)
            / spc
    };
    let fat_needed = |fat_size: u64| {
        ((clusters_for(fat_size) + min_entries as u64) * entry_size as u64)
            .div_ceil(sector_size as u64)
    };

    let (mut lo, mut hi) = (0u64, fat_needed(0));
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if fat_needed(mid) <= mid {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }

    (hi as u32, clusters_for(hi) as u32)
}

/// Entries a FAT of `fat_size` sectors can hold.
#[inline]
pub fn fat_capacity(fat_size: u32, bytes_per_sector: u16) -> u64 {
    fat_size as u64 * bytes_per_sector as u64 / FAT_ENTRY_SIZE as u64
}

/// Grows the FAT until the data region starts on a multiple of `align`
/// sectors. Returns `(fat_size, data_start_sector)`.
///
/// Growing the FAT only shrinks the cluster count, so a FAT that could map
/// the converged layout still maps the aligned one. When no boundary can be
/// split evenly between the FAT copies the layout is left unaligned.
pub fn align_data_region(reserved: u64, num_fats: u8, fat_size: u32, align: u64) -> (u32, u64) {
    let fats = num_fats as u64;
    let mut data_start = (reserved + fats * fat_size as u64).next_multiple_of(align);
    for _ in 0..fats {
        if (data_start - reserved) % fats == 0 {
            return (((data_start - reserved) / fats) as u32, data_start);
        }
        data_start += align;
    }
    (fat_size, reserved + fats * fat_size as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESP_BYTES: u64 = 33 * 1024 * 1024;

    #[test]
    fn converge_default_esp() {
        let (fat_size, clusters) = converge_fat_layout(512, 67584, 32, 4, 2, 2, 1);
        assert_eq!((fat_size, clusters), (520, 66512));
        // The converged FAT maps every cluster.
        assert!(fat_size as u64 * 512 / 4 >= clusters as u64 + 2);
    }

    #[test]
    fn converge_64_mib_is_consistent() {
        // 1008 sectors hold 129024 entries, one short of 129022 clusters + 2.
        assert_eq!(converge_fat_layout(512, 131072, 32, 4, 2, 2, 1), (1009, 129022));

        let meta = Fat32Meta::new(64 * 1024 * 1024, 2048, 0).unwrap();
        assert_eq!(meta.fat_size_sectors, 2032);
        assert_eq!(meta.data_start_sector(), 4096);
        assert_eq!(meta.cluster_count, 126976);
    }

    #[test]
    fn converged_fat_is_smallest_that_fits() {
        for total in (67_000u64..67_600).chain(130_900..131_200).chain([1 << 20, 4_000_037]) {
            for spc in [1u32, 8] {
                let (fat, clusters) = converge_fat_layout(512, total, 32, 4, 2, 2, spc);
                assert!(fat_capacity(fat, 512) >= clusters as u64 + 2, "{total}/{spc}");
                let more = (total - 32 - 2 * (fat as u64 - 1)) / spc as u64;
                assert!(fat_capacity(fat - 1, 512) < more + 2, "{total}/{spc}");
            }
        }
    }

    #[test]
    fn every_size_maps_all_clusters() {
        // Whole and odd sector counts from 33 MiB upwards.
        for sectors in (67_584u64..200_000).step_by(97) {
            let meta = Fat32Meta::new(sectors * 512, 2048, 0).unwrap();
            assert!(
                fat_capacity(meta.fat_size_sectors, 512) >= meta.cluster_count as u64 + 2,
                "{sectors} sectors"
            );
            let heap_end = meta.data_start_sector() + meta.cluster_count as u64;
            assert!(heap_end <= sectors, "{sectors} sectors");
        }
    }

    #[test]
    fn valid_units_cover_the_heap() {
        let meta = Fat32Meta::new(ESP_BYTES, 2048, 0).unwrap();
        assert!(meta.is_valid_unit(2));
        assert!(meta.is_valid_unit(65537));
        assert!(!meta.is_valid_unit(1));
        assert!(!meta.is_valid_unit(65538));
    }

    #[test]
    fn default_esp_geometry() {
        let meta = Fat32Meta::new(ESP_BYTES, 2048, 0x1234_5678).unwrap();
        assert_eq!(meta.volume_size_sectors, 67584);
        assert_eq!(meta.fat_size_sectors, 1008);
        assert_eq!(meta.data_start_sector(), 2048);
        assert_eq!(meta.cluster_count, 65536);
        assert_eq!(meta.fat_offset(0), 32 * 512);
        assert_eq!(meta.fat_offset(1), (32 + 1008) * 512);
        assert_eq!(meta.unit_offset(2), 2048 * 512);
        assert_eq!(meta.unit_offset(4), 2050 * 512);
        assert_eq!(meta.last_data_unit(), 65537);
        assert_eq!(meta.hidden_sectors, 2048);
        assert_eq!(&meta.volume_label, b"NO NAME    ");
    }

    #[test]
    fn aligned_fat_still_maps_all_clusters() {
        for mib in [33u64, 40, 64, 100, 257] {
            let meta = Fat32Meta::new(mib * 1024 * 1024, 2048, 0).unwrap();
            assert_eq!(meta.cluster_heap_offset % FAT_DATA_ALIGNMENT_BYTES, 0, "{mib} MiB");
            let capacity = meta.fat_size_bytes() / FAT_ENTRY_SIZE as u64;
            assert!(capacity >= meta.cluster_count as u64 + 2, "{mib} MiB");
        }
    }

    #[test]
    fn rejects_fat16_sized_volume() {
        assert_eq!(
            Fat32Meta::new(32 * 1024 * 1024, 2048, 0).unwrap_err(),
            FsFormatterError::Invalid("FAT32: volume too small (fewer than 65525 clusters)")
        );
        assert!(Fat32Meta::new(0, 0, 0).is_err());
    }

    #[test]
    fn rejects_bad_cluster_size() {
        assert!(Fat32Meta::new_custom(ESP_BYTES, 0, 0, None, 2, 512, 700, 32).is_err());
        assert!(Fat32Meta::new_custom(ESP_BYTES, 0, 0, None, 2, 512, 512, 4).is_err());
    }

    #[test]
    fn custom_label_is_uppercased_and_padded() {
        let meta = Fat32Meta::new_custom(ESP_BYTES, 0, 0, Some("boot"), 2, 512, 512, 32).unwrap();
        assert_eq!(&meta.volume_label, b"BOOT       ");
    }

    #[test]
    fn align_data_region_odd_layouts() {
        assert_eq!(align_data_region(32, 2, 520, 2048), (1008, 2048));
        assert_eq!(align_data_region(32, 2, 1008, 2048), (1008, 2048));
        // Three FATs: 2048 - 32 = 2016 is divisible by 3.
        assert_eq!(align_data_region(32, 3, 10, 2048), (672, 2048));
        // 1 MiB boundaries minus 33 reserved sectors are always odd.
        assert_eq!(align_data_region(33, 2, 1500, 2048), (1500, 3033));
        // 2048 - 31 = 2017 is not a multiple of 3, 4096 - 31 = 4065 is.
        assert_eq!(align_data_region(31, 3, 10, 2048), (1355, 4096));
    }
}
