// SPDX-License-Identifier: MIT

//! Table-driven CRC32 (IEEE 802.3, reflected) used by the GPT header and
//! partition entry array checksums.
//!
//! The lookup table is computed at compile time and never mutated.

/// Reflected form of the IEEE 802.3 polynomial.
pub const CRC32_POLY: u32 = 0xEDB8_8320;

const CRC32_INIT: u32 = 0xFFFF_FFFF;

/// Immutable 256-entry CRC32 lookup table.
#[derive(Clone)]
pub struct Crc32 {
    table: [u32; 256],
}

/// Shared engine; the table is built by the compiler.
pub static CRC32: Crc32 = Crc32::new();

impl Crc32 {
    pub const fn new() -> Self {
        let mut table = [0u32; 256];
        let mut i = 0;
        while i < 256 {
            let mut crc = i as u32;
            let mut bit = 0;
            while bit < 8 {
                crc = if crc & 1 != 0 {
                    (crc >> 1) ^ CRC32_POLY
                } else {
                    crc >> 1
                };
                bit += 1;
            }
            table[i] = crc;
            i += 1;
        }
        Self { table }
    }

    #[inline]
    pub fn table(&self) -> &[u32; 256] {
        &self.table
    }

    /// One-shot checksum of `bytes`.
    #[inline]
    pub fn checksum(&self, bytes: &[u8]) -> u32 {
        let mut digest = self.digest();
        digest.update(bytes);
        digest.finalize()
    }

    /// Starts a streaming checksum.
    #[inline]
    pub fn digest(&self) -> Crc32Digest<'_> {
        Crc32Digest {
            table: &self.table,
            state: CRC32_INIT,
        }
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Crc32 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Crc32").field("poly", &CRC32_POLY).finish()
    }
}

/// Running CRC32 state borrowed from a [`Crc32`] table.
#[derive(Debug, Clone)]
pub struct Crc32Digest<'a> {
    table: &'a [u32; 256],
    state: u32,
}

impl Crc32Digest<'_> {
    #[inline]
    pub fn update(&mut self, bytes: &[u8]) {
        let mut crc = self.state;
        for &b in bytes {
            crc = self.table[((crc ^ b as u32) & 0xFF) as usize] ^ (crc >> 8);
        }
        self.state = crc;
    }

    #[inline]
    pub fn finalize(self) -> u32 {
        self.state ^ CRC32_INIT
    }
}

/// CRC32 of `bytes` using the shared table.
#[inline]
pub fn crc32(bytes: &[u8]) -> u32 {
    CRC32.checksum(bytes)
}
