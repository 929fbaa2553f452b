// SPDX-License-Identifier: MIT

//! Wall-clock access for filesystem timestamps.
//!
//! - In `std` mode, uses the system clock.
//! - Without `std`, returns `UNIX_EPOCH`, which FAT clamps to 1980-01-01.

use time::OffsetDateTime;

/// Returns the current UTC time.
pub fn now_utc() -> OffsetDateTime {
    #[cfg(feature = "std")]
    {
        OffsetDateTime::now_utc()
    }

    #[cfg(not(feature = "std"))]
    {
        OffsetDateTime::UNIX_EPOCH
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn now_is_after_fat_epoch() {
        assert!(now_utc().year() >= 2024);
    }
}
