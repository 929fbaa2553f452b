// SPDX-License-Identifier: MIT

//! Random (version 4) GUIDs in the on-disk mixed-endian layout.
//!
//! GPT stores a GUID as three little-endian integers (32, 16, 16 bits)
//! followed by eight raw bytes. [`Guid`] keeps that layout so it can be copied
//! straight into headers and entries; [`uuid::Uuid`] is used for the textual
//! form and for forcing the version and variant bits.

use core::fmt;

use uuid::{Builder, Uuid};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Source of random bytes for [`GuidGenerator`].
pub trait EntropySource {
    fn fill_bytes(&mut self, dest: &mut [u8]);
}

impl<T: EntropySource + ?Sized> EntropySource for &mut T {
    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        (**self).fill_bytes(dest)
    }
}

/// Operating-system randomness, drawn through [`Uuid::new_v4`].
///
/// Each 16-byte block carries the v4 marker bits at bytes 6 and 8;
/// [`GuidGenerator`] overwrites exactly those.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(16) {
            let block = Uuid::new_v4().into_bytes();
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
    }
}

/// Seeded xorshift64 generator for reproducible GUIDs in tests and benches.
#[derive(Debug, Clone)]
pub struct XorShiftEntropy {
    state: u64,
}

impl XorShiftEntropy {
    // xorshift never leaves the all-zero state.
    const ZERO_SEED_REPLACEMENT: u64 = 0x9E37_79B9_7F4A_7C15;

    pub fn from_seed(seed: u64) -> Self {
        let state = splitmix64(seed);
        Self {
            state: if state == 0 {
                Self::ZERO_SEED_REPLACEMENT
            } else {
                state
            },
        }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl EntropySource for XorShiftEntropy {
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let word = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }
}

#[inline]
fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// GUID stored in its on-disk (mixed-endian) byte order.
#[derive(
    IntoBytes, FromBytes, KnownLayout, Immutable, Unaligned, Clone, Copy, PartialEq, Eq, Hash, Default,
)]
#[repr(transparent)]
pub struct Guid([u8; 16]);

impl Guid {
    pub const NIL: Guid = Guid([0u8; 16]);

    #[inline]
    pub const fn from_disk_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn to_disk_bytes(&self) -> [u8; 16] {
        self.0
    }

    #[inline]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.to_bytes_le())
    }

    #[inline]
    pub fn to_uuid(&self) -> Uuid {
        Uuid::from_bytes_le(self.0)
    }

    /// Version nibble (high nibble of the little-endian `time_hi` field).
    #[inline]
    pub fn version(&self) -> u8 {
        self.0[7] >> 4
    }

    /// Two most significant bits of the clock-sequence byte.
    #[inline]
    pub fn variant_bits(&self) -> u8 {
        self.0[8] >> 6
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uuid().hyphenated())
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({self})")
    }
}

/// Produces fresh version-4 GUIDs from an owned entropy source.
#[derive(Debug)]
pub struct GuidGenerator<E: EntropySource = OsEntropy> {
    entropy: E,
}

impl GuidGenerator<OsEntropy> {
    pub fn from_os() -> Self {
        Self::new(OsEntropy)
    }
}

impl<E: EntropySource> GuidGenerator<E> {
    pub fn new(entropy: E) -> Self {
        Self { entropy }
    }

    /// Draws 16 random bytes and stamps version 4 and the RFC 4122 variant.
    pub fn new_guid(&mut self) -> Guid {
        let mut bytes = [0u8; 16];
        self.entropy.fill_bytes(&mut bytes);
        Guid::from_uuid(Builder::from_random_bytes(bytes).into_uuid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counting(u8);

    impl EntropySource for Counting {
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for b in dest {
                *b = self.0;
                self.0 = self.0.wrapping_add(1);
            }
        }
    }

    struct Saturated;

    impl EntropySource for Saturated {
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0xFF);
        }
    }

    #[test]
    fn version_and_variant_forced() {
        let mut ids = GuidGenerator::new(XorShiftEntropy::from_seed(42));
        for _ in 0..256 {
            let g = ids.new_guid();
            assert_eq!(g.version(), 4);
            assert_eq!(g.variant_bits(), 0b10);
            assert_eq!(g.to_uuid().get_version_num(), 4);
            assert_eq!(g.to_uuid().get_variant(), uuid::Variant::RFC4122);
        }
    }

    #[test]
    fn saturated_bytes_clear_only_fixed_bits() {
        let g = GuidGenerator::new(Saturated).new_guid();
        let mut expected = [0xFFu8; 16];
        expected[7] = 0x4F;
        expected[8] = 0xBF;
        assert_eq!(g.to_disk_bytes(), expected);
    }

    #[test]
    fn mixed_endian_layout() {
        let g = GuidGenerator::new(Counting(0)).new_guid();
        assert_eq!(
            g.to_disk_bytes(),
            [3, 2, 1, 0, 5, 4, 7, 0x46, 0x88, 9, 10, 11, 12, 13, 14, 15]
        );
        assert_eq!(g.to_string(), "00010203-0405-4607-8809-0a0b0c0d0e0f");
    }

    #[test]
    fn deterministic_for_seed() {
        let mut a = GuidGenerator::new(XorShiftEntropy::from_seed(7));
        let mut b = GuidGenerator::new(XorShiftEntropy::from_seed(7));
        assert_eq!(a.new_guid(), b.new_guid());
        assert_eq!(a.new_guid(), b.new_guid());
    }

    #[test]
    fn never_repeats_within_a_run() {
        let mut ids = GuidGenerator::from_os();
        let seen: std::collections::HashSet<Guid> = (0..1024).map(|_| ids.new_guid()).collect();
        assert_eq!(seen.len(), 1024);
    }

    #[test]
    fn os_source_fills_any_length() {
        let mut a = [0u8; 37];
        let mut b = [0u8; 37];
        OsEntropy.fill_bytes(&mut a);
        OsEntropy.fill_bytes(&mut b);
        assert_ne!(a, b);
        assert!(a.iter().any(|&x| x != 0));
    }

    #[test]
    fn os_generator_stamps_version_and_variant() {
        let mut ids = GuidGenerator::from_os();
        for _ in 0..64 {
            let g = ids.new_guid();
            assert_eq!(g.version(), 4);
            assert_eq!(g.variant_bits(), 0b10);
        }
    }

    #[test]
    fn zero_seed_is_usable() {
        let mut e = XorShiftEntropy::from_seed(0);
        assert_ne!(e.next_u64(), 0);
        assert_ne!(e.next_u64(), e.next_u64());
    }

    #[test]
    fn borrowed_source() {
        let mut source = Counting(0);
        let first = GuidGenerator::new(&mut source).new_guid();
        let second = GuidGenerator::new(&mut source).new_guid();
        assert_ne!(first, second);
        assert_eq!(source.0, 32);
    }
}
