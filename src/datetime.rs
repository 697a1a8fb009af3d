//! Time and calendar values exchanged with the driver

use time::error::ComponentRange;
use time::{Date, Month, Time};

use crate::bcd::encode_bcd;

/// Day-of-week numbering used by [`CalendarDate::day`]
pub const SUNDAY: u8 = 1;
pub const MONDAY: u8 = 2;
pub const TUESDAY: u8 = 3;
pub const WEDNESDAY: u8 = 4;
pub const THURSDAY: u8 = 5;
pub const FRIDAY: u8 = 6;
pub const SATURDAY: u8 = 7;

/// First year of the century the two-digit year register is read in
pub const CENTURY_BASE: i32 = 2000;

/// Hours format of the hours register
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeFormat {
    /// 24-hour mode, hours in 0..=23
    H24,
    /// 12-hour mode before noon, hours in 1..=12
    H12Am,
    /// 12-hour mode after noon, hours in 1..=12
    H12Pm,
}

/// Wall-clock time of day
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTime {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub format: TimeFormat,
}

/// A [`ClockTime`] field is out of the range its format allows
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidClockTime;

impl ClockTime {
    /// Arguments come in reading order, hours first, like the fields.
    pub const fn new(hours: u8, minutes: u8, seconds: u8, format: TimeFormat) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            format,
        }
    }

    /// Checks every field against the range its format allows
    pub fn is_valid(&self) -> bool {
        let hours_ok = match self.format {
            TimeFormat::H24 => self.hours <= 23,
            TimeFormat::H12Am | TimeFormat::H12Pm => (1..=12).contains(&self.hours),
        };
        hours_ok && self.minutes <= 59 && self.seconds <= 59
    }

    /// Hours on the 0..=23 scale, whatever the format
    pub fn hours_24(&self) -> u8 {
        match self.format {
            TimeFormat::H24 => self.hours,
            TimeFormat::H12Am => self.hours % 12,
            TimeFormat::H12Pm => self.hours % 12 + 12,
        }
    }
}

impl From<Time> for ClockTime {
    fn from(time: Time) -> Self {
        Self::new(time.hour(), time.minute(), time.second(), TimeFormat::H24)
    }
}

/// Fails for times [`ClockTime::is_valid`] rejects, such as hour 0 or 13 in
/// 12-hour format.
impl TryFrom<ClockTime> for Time {
    type Error = InvalidClockTime;

    fn try_from(time: ClockTime) -> Result<Self, Self::Error> {
        if !time.is_valid() {
            return Err(InvalidClockTime);
        }
        Time::from_hms(time.hours_24(), time.minutes, time.seconds).map_err(|_| InvalidClockTime)
    }
}

/// Calendar date with a two-digit year
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalendarDate {
    /// Day of week, 1..=7. See [`SUNDAY`] and friends
    pub day: u8,
    /// Day of month, 1..=31
    pub date: u8,
    /// 1..=12
    pub month: u8,
    /// 0..=99, no century
    pub year: u8,
}

impl CalendarDate {
    pub const fn new(day: u8, date: u8, month: u8, year: u8) -> Self {
        Self {
            day,
            date,
            month,
            year,
        }
    }

    pub fn is_valid(&self) -> bool {
        (SUNDAY..=SATURDAY).contains(&self.day)
            && (1..=31).contains(&self.date)
            && (1..=12).contains(&self.month)
            && self.year <= 99
    }

    /// Copy with date, month and year packed as BCD, the form
    /// [`Ds1307::set_full_date`](crate::Ds1307::set_full_date) puts on the
    /// wire unchanged. The day of week is left as is.
    pub fn bcd_encoded(&self) -> Self {
        Self {
            day: self.day,
            date: encode_bcd(self.date),
            month: encode_bcd(self.month),
            year: encode_bcd(self.year),
        }
    }
}

/// Fails for dates outside 2000..=2099.
impl TryFrom<Date> for CalendarDate {
    type Error = cast::Error;

    fn try_from(date: Date) -> Result<Self, Self::Error> {
        let year = cast::u8(date.year() - CENTURY_BASE)?;
        if year > 99 {
            return Err(cast::Error::Overflow);
        }
        Ok(Self::new(
            date.weekday().number_from_sunday(),
            date.day(),
            u8::from(date.month()),
            year,
        ))
    }
}

/// The day of week is not checked against the date; the device never
/// derives one from the other.
impl TryFrom<CalendarDate> for Date {
    type Error = ComponentRange;

    fn try_from(date: CalendarDate) -> Result<Self, Self::Error> {
        Date::from_calendar_date(
            CENTURY_BASE + i32::from(date.year),
            Month::try_from(date.month)?,
            date.date,
        )
    }
}
