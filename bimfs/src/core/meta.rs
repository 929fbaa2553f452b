// SPDX-License-Identifier: MIT

/// Static geometry of a formatted filesystem, expressed in allocation units.
pub trait FsMeta<Unit: Ord + Copy> {
    /// Size of one allocation unit in bytes.
    fn unit_size(&self) -> usize;

    /// Byte offset, relative to the volume, of a given allocation unit.
    fn unit_offset(&self, unit: Unit) -> u64;

    /// Root unit (root cluster).
    fn root_unit(&self) -> Unit;

    fn first_data_unit(&self) -> Unit;

    fn last_data_unit(&self) -> Unit;

    /// Total size in bytes of the volume.
    fn size_bytes(&self) -> u64;

    fn is_valid_unit(&self, unit: Unit) -> bool {
        unit >= self.first_data_unit() && unit <= self.last_data_unit()
    }
}
