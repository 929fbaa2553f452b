// SPDX-License-Identifier: MIT

use time::OffsetDateTime;

use crate::core::utils::time_utils;

/// Packed FAT timestamp: `(date, time, tenths)`.
///
/// - date: bits 15-9 years since 1980, 8-5 month, 4-0 day
/// - time: bits 15-11 hours, 10-5 minutes, 4-0 seconds / 2
/// - tenths: 10 ms units within the 2-second window (0..=199)
///
/// Years outside 1980..=2107 are clamped.
pub fn datetime_from(ts: OffsetDateTime) -> (u16, u16, u8) {
    let year = ts.year().clamp(1980, 2107);
    let month = ts.month() as u16;
    let day = ts.day() as u16;

    let hour = ts.hour() as u16;
    let minute = ts.minute() as u16;
    let second = ts.second() as u16;

    let date = ((year - 1980) as u16) << 9 | (month << 5) | day;
    let time = (hour << 11) | (minute << 5) | (second / 2);
    let tenths = (second % 2) * 100 + ts.millisecond() / 10;

    (date, time, tenths as u8)
}

pub fn datetime_now() -> (u16, u16, u8) {
    datetime_from(time_utils::now_utc())
}
