//! DS1307 register map
//!
//! ```text
//! ADDR  BIT7  BIT6   BIT5    BIT4    BIT3..BIT0   FUNCTION  RANGE
//! 00h   CH    10 Seconds             Seconds      Seconds   00-59
//! 01h   0     10 Minutes             Minutes      Minutes   00-59
//! 02h   0     12     PM/AM   10 Hour Hours        Hours     1-12 AM/PM
//!             24     10 Hour 10 Hour                        00-23
//! 03h   0     0      0       0       0  Day       Day       01-07
//! 04h   0     0      10 Date         Date         Date      01-31
//! 05h   0     0      0       10 Mon  Month        Month     01-12
//! 06h   10 Year                      Year         Year      00-99
//! 07h   OUT   0      0       SQWE    0 0 RS1 RS0  Control   -
//! ```
//!
//! Bits marked `0` always read back as zero.

use bitflags::bitflags;

/// Timekeeping register offsets
///
/// These offsets are fixed by the device and must not change.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    Seconds = 0x00,
    Minutes = 0x01,
    Hours = 0x02,
    Day = 0x03,
    Date = 0x04,
    Month = 0x05,
    Year = 0x06,
    Control = 0x07,
}

impl Register {
    /// Word address put on the wire to position the device pointer
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

bitflags! {
    /// Control bits living in the seconds register
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct SecondsFlags: u8 {
        /// Clock halt. 1 = oscillator stopped, 0 = running
        const CLOCK_HALT = 0b1000_0000;
    }
}

bitflags! {
    /// Mode bits living in the hours register
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct HoursFlags: u8 {
        /// 12-hour mode select. Clear selects 24-hour mode
        const MODE_12H = 0b0100_0000;
        /// PM when in 12-hour mode, second ten's-hour digit in 24-hour mode
        const PM = 0b0010_0000;
    }
}

/// Seconds value bits (everything but the clock-halt flag)
pub const SECONDS_MASK: u8 = 0b0111_1111;

/// Hours value bits in 24-hour mode (two ten's-hour bits)
pub const HOURS_24H_MASK: u8 = 0b0011_1111;

/// Hours value bits in 12-hour mode (one ten's-hour bit)
pub const HOURS_12H_MASK: u8 = 0b0001_1111;
