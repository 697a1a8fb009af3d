//! Register codec
//!
//! Pure conversions between binary field values and the packed BCD layout of
//! the timekeeping registers. Nothing here touches the bus.

use crate::datetime::TimeFormat;
use crate::register::{HoursFlags, HOURS_12H_MASK, HOURS_24H_MASK, SECONDS_MASK};

/// Decodes a packed BCD byte as `10 * high_nibble + low_nibble`.
///
/// Nibbles above 9 are not rejected; the device never produces them.
pub const fn decode_bcd(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0f)
}

/// Encodes `value` as two packed BCD digits.
///
/// Callers must keep `value <= 99`. Above that the ten's nibble is not a
/// decimal digit, and from 160 up it is truncated to the low 4 bits. Use
/// [`try_encode_bcd`] to reject such values instead.
pub const fn encode_bcd(value: u8) -> u8 {
    if value <= 9 {
        value
    } else {
        ((value / 10) << 4) | (value % 10)
    }
}

/// Checked variant of [`encode_bcd`]. Returns `None` for values above 99.
pub const fn try_encode_bcd(value: u8) -> Option<u8> {
    if value > 99 {
        None
    } else {
        Some(encode_bcd(value))
    }
}

/// Seconds register value with the clock-halt bit forced to 0 (running)
pub const fn encode_seconds(seconds: u8) -> u8 {
    encode_bcd(seconds) & SECONDS_MASK
}

/// Seconds value with the clock-halt bit masked off
pub const fn decode_seconds(raw: u8) -> u8 {
    decode_bcd(raw & SECONDS_MASK)
}

/// Packs an hours value and its format into the hours register layout.
pub fn encode_hours(hours: u8, format: TimeFormat) -> u8 {
    let bcd = encode_bcd(hours);
    match format {
        TimeFormat::H24 => bcd & HOURS_24H_MASK,
        TimeFormat::H12Am => (bcd & HOURS_12H_MASK) | HoursFlags::MODE_12H.bits(),
        TimeFormat::H12Pm => {
            (bcd & HOURS_12H_MASK) | (HoursFlags::MODE_12H | HoursFlags::PM).bits()
        }
    }
}

/// Unpacks the hours register into the hours value and the format it is
/// kept in.
pub fn decode_hours(raw: u8) -> (u8, TimeFormat) {
    let flags = HoursFlags::from_bits_truncate(raw);
    if flags.contains(HoursFlags::MODE_12H) {
        let format = if flags.contains(HoursFlags::PM) {
            TimeFormat::H12Pm
        } else {
            TimeFormat::H12Am
        };
        (decode_bcd(raw & HOURS_12H_MASK), format)
    } else {
        // bit 5 is the second ten's-hour digit here
        (decode_bcd(raw & HOURS_24H_MASK), TimeFormat::H24)
    }
}
