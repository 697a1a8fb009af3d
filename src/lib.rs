//! Driver for the DS1307 battery-backed real-time clock
//!
//! The device sits at the fixed I2C address [`ADDRESS`] and keeps time and
//! calendar in eight packed BCD registers (see [`register`]). [`bcd`] holds
//! the pure register codec, [`Ds1307`] runs the bus transactions on top of
//! any embedded-hal blocking I2C master.
//!
//! ```ignore
//! let mut rtc = Ds1307::new(i2c);
//! if rtc.init()? {
//!     // oscillator did not start
//! }
//! rtc.set_time(&ClockTime::new(5, 30, 0, TimeFormat::H12Pm))?;
//! rtc.set_date(&CalendarDate::new(SUNDAY, 17, 11, 24))?;
//! let now = rtc.time()?;
//! ```
//!
//! The driver is not reentrant. It owns the bus master, so sharing it between
//! execution contexts needs external locking.

#![cfg_attr(not(test), no_std)]

pub(crate) use embedded_hal as hal;

use fugit::HertzU32 as Hertz;

pub mod bcd;
pub mod datetime;
pub mod register;
pub mod rtc;

#[cfg(feature = "stm32f7")]
pub mod board;

pub use crate::datetime::{
    CalendarDate, ClockTime, InvalidClockTime, TimeFormat, FRIDAY, MONDAY, SATURDAY, SUNDAY,
    THURSDAY, TUESDAY, WEDNESDAY,
};
pub use crate::register::Register;
pub use crate::rtc::{Ds1307, Error};

/// 7-bit bus address of the device
pub const ADDRESS: u8 = 0x68;

/// Standard-mode SCL frequency the device supports
pub const BUS_FREQUENCY: Hertz = Hertz::kHz(100);
