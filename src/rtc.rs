//! DS1307 transactions
//!
//! Every field is moved in its own bus transaction: a two-byte write
//! (word address, data) to store it, or a write of the word address followed
//! by a repeated START and a one-byte read to fetch it. The device's
//! auto-incrementing burst access is not used, so multi-field operations are
//! not atomic. A reader running between two of the writes of
//! [`Ds1307::set_time`] can observe a partially updated time.

use defmt_or_log as log;
use time::{Date, PrimitiveDateTime, Time};

use crate::bcd::{
    decode_bcd, decode_hours, decode_seconds, encode_bcd, encode_hours, encode_seconds,
};
use crate::datetime::{CalendarDate, ClockTime};
use crate::hal::blocking::i2c::{Write, WriteRead};
use crate::register::{Register, SecondsFlags};
use crate::ADDRESS;

/// DS1307 error
#[derive(Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error<E> {
    /// Bus transport failure, as reported by the I2C master
    I2c(E),
    /// A field was out of range. Nothing was written
    InvalidFieldValue,
    /// The registers hold a time or date that does not exist
    InvalidDateTime,
}

/// DS1307 real-time clock on an I2C bus
///
/// Owns the bus master for as long as it lives. Use [`Ds1307::destroy`] to
/// get it back.
pub struct Ds1307<I2C> {
    i2c: I2C,
}

impl<I2C, E> Ds1307<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    /// Binds an already configured bus master to the device at [`ADDRESS`].
    pub fn new(i2c: I2C) -> Self {
        Ds1307 { i2c }
    }

    /// Releases the bus master
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    /// Starts the oscillator by writing 0 to the seconds register, then reads
    /// the register back.
    ///
    /// Returns `true` if the clock-halt bit is still set, i.e. the
    /// oscillator did not start. There is no retry; call again if needed.
    /// Note that this also resets the seconds count to 0.
    pub fn init(&mut self) -> Result<bool, Error<E>> {
        self.write_register(Register::Seconds, 0x00)?;
        let halted = self.clock_halted()?;

        if halted {
            log::warn!("ds1307: oscillator did not start");
        } else {
            log::debug!("ds1307: oscillator running");
        }

        Ok(halted)
    }

    /// Writes seconds, minutes, then hours.
    ///
    /// The clock-halt bit is always written as 0. Fails with
    /// [`Error::InvalidFieldValue`] before touching the bus if a field is
    /// out of range for its format.
    pub fn set_time(&mut self, time: &ClockTime) -> Result<(), Error<E>> {
        if !time.is_valid() {
            return Err(Error::InvalidFieldValue);
        }

        self.write_register(Register::Seconds, encode_seconds(time.seconds))?;
        self.write_register(Register::Minutes, encode_bcd(time.minutes))?;
        self.write_register(Register::Hours, encode_hours(time.hours, time.format))
    }

    /// Reads seconds, minutes, then hours. The format comes from the mode
    /// bits of the hours register.
    pub fn time(&mut self) -> Result<ClockTime, Error<E>> {
        let seconds = decode_seconds(self.read_register(Register::Seconds)?);
        let minutes = decode_bcd(self.read_register(Register::Minutes)?);
        let (hours, format) = decode_hours(self.read_register(Register::Hours)?);

        Ok(ClockTime::new(hours, minutes, seconds, format))
    }

    /// Writes day, date, month, then year exactly as given.
    ///
    /// No encoding is applied: date, month and year must already be packed
    /// BCD (see [`CalendarDate::bcd_encoded`]) while the day of week is a
    /// plain 1..=7 value. [`Ds1307::full_date`] does decode BCD, so writing
    /// binary values here does not read back the same. Use
    /// [`Ds1307::set_date`] to have the driver do the encoding.
    pub fn set_full_date(&mut self, date: &CalendarDate) -> Result<(), Error<E>> {
        self.write_register(Register::Day, date.day)?;
        self.write_register(Register::Date, date.date)?;
        self.write_register(Register::Month, date.month)?;
        self.write_register(Register::Year, date.year)
    }

    /// Reads day, date, month, then year. The day of week is returned raw.
    pub fn full_date(&mut self) -> Result<CalendarDate, Error<E>> {
        let day = self.read_register(Register::Day)?;
        let date = decode_bcd(self.read_register(Register::Date)?);
        let month = decode_bcd(self.read_register(Register::Month)?);
        let year = decode_bcd(self.read_register(Register::Year)?);

        Ok(CalendarDate::new(day, date, month, year))
    }

    /// Range-checks `date`, BCD encodes date, month and year, and writes the
    /// fields in the same order as [`Ds1307::set_full_date`].
    pub fn set_date(&mut self, date: &CalendarDate) -> Result<(), Error<E>> {
        if !date.is_valid() {
            return Err(Error::InvalidFieldValue);
        }

        self.set_full_date(&date.bcd_encoded())
    }

    /// Reads the time, then the date, as a date in 2000..=2099.
    pub fn datetime(&mut self) -> Result<PrimitiveDateTime, Error<E>> {
        let time = Time::try_from(self.time()?).map_err(|_| Error::InvalidDateTime)?;
        let date = Date::try_from(self.full_date()?).map_err(|_| Error::InvalidDateTime)?;

        Ok(PrimitiveDateTime::new(date, time))
    }

    /// Writes the time in 24-hour format, then the date. The day of week is
    /// derived from the date, counting Sunday as 1.
    pub fn set_datetime(&mut self, datetime: &PrimitiveDateTime) -> Result<(), Error<E>> {
        let date =
            CalendarDate::try_from(datetime.date()).map_err(|_| Error::InvalidFieldValue)?;

        self.set_time(&ClockTime::from(datetime.time()))?;
        self.set_date(&date)
    }

    /// `true` while the oscillator runs (clock-halt bit clear)
    pub fn is_running(&mut self) -> Result<bool, Error<E>> {
        Ok(!self.clock_halted()?)
    }

    /// Stops the oscillator, keeping the seconds count.
    pub fn halt(&mut self) -> Result<(), Error<E>> {
        self.update_clock_halt(true)
    }

    /// Restarts the oscillator, keeping the seconds count.
    ///
    /// Besides [`Ds1307::init`], this is the only operation that clears the
    /// clock-halt bit.
    pub fn start(&mut self) -> Result<(), Error<E>> {
        self.update_clock_halt(false)
    }

    /// Reads one register: word address write, repeated START, one-byte read
    pub fn read_register(&mut self, register: Register) -> Result<u8, Error<E>> {
        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(ADDRESS, &[register.addr()], &mut buffer)
            .map_err(Error::I2c)?;

        log::trace!("ds1307: read {} from {}", buffer[0], register.addr());
        Ok(buffer[0])
    }

    /// Writes one register in a single two-byte transfer
    pub fn write_register(&mut self, register: Register, value: u8) -> Result<(), Error<E>> {
        log::trace!("ds1307: write {} to {}", value, register.addr());
        self.i2c
            .write(ADDRESS, &[register.addr(), value])
            .map_err(Error::I2c)
    }

    fn clock_halted(&mut self) -> Result<bool, Error<E>> {
        let seconds = SecondsFlags::from_bits_truncate(self.read_register(Register::Seconds)?);
        Ok(seconds.contains(SecondsFlags::CLOCK_HALT))
    }

    // Read-modify-write of the seconds register; skips the write if the bit
    // already has the requested state.
    fn update_clock_halt(&mut self, halt: bool) -> Result<(), Error<E>> {
        let raw = self.read_register(Register::Seconds)?;
        let mut flags = SecondsFlags::from_bits_retain(raw);
        if flags.contains(SecondsFlags::CLOCK_HALT) == halt {
            return Ok(());
        }

        flags.set(SecondsFlags::CLOCK_HALT, halt);
        self.write_register(Register::Seconds, flags.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime::{TimeFormat, FRIDAY, SATURDAY, SUNDAY};
    use embedded_hal_mock::i2c::{Mock as I2cMock, Transaction as I2cTrans};
    use embedded_hal_mock::MockError;
    use std::io::ErrorKind;
    use time::macros::datetime;

    fn new_rtc(expectations: &[I2cTrans]) -> Ds1307<I2cMock> {
        Ds1307::new(I2cMock::new(expectations))
    }

    fn done(rtc: Ds1307<I2cMock>) {
        let mut i2c = rtc.destroy();
        i2c.done();
    }

    fn write(register: Register, value: u8) -> I2cTrans {
        I2cTrans::write(ADDRESS, vec![register.addr(), value])
    }

    fn read(register: Register, value: u8) -> I2cTrans {
        I2cTrans::write_read(ADDRESS, vec![register.addr()], vec![value])
    }

    fn bus_error() -> MockError {
        MockError::Io(ErrorKind::Other)
    }

    #[test]
    fn read_register_points_then_reads_one_byte() {
        let mut rtc = new_rtc(&[I2cTrans::write_read(0x68, vec![0x00], vec![0x42])]);
        assert_eq!(rtc.read_register(Register::Seconds), Ok(0x42));
        done(rtc);
    }

    #[test]
    fn write_register_sends_address_then_data() {
        let mut rtc = new_rtc(&[I2cTrans::write(0x68, vec![0x07, 0x10])]);
        assert_eq!(rtc.write_register(Register::Control, 0x10), Ok(()));
        done(rtc);
    }

    #[test]
    fn init_clears_clock_halt() {
        let mut rtc = new_rtc(&[write(Register::Seconds, 0x00), read(Register::Seconds, 0x00)]);
        assert_eq!(rtc.init(), Ok(false));
        done(rtc);
    }

    #[test]
    fn init_reports_stopped_oscillator() {
        let mut rtc = new_rtc(&[write(Register::Seconds, 0x00), read(Register::Seconds, 0x80)]);
        assert_eq!(rtc.init(), Ok(true));
        done(rtc);
    }

    #[test]
    fn init_propagates_nack() {
        let mut rtc =
            new_rtc(&[I2cTrans::write(ADDRESS, vec![0x00, 0x00]).with_error(bus_error())]);
        assert_eq!(rtc.init(), Err(Error::I2c(bus_error())));
        done(rtc);
    }

    #[test]
    fn set_time_writes_seconds_minutes_hours() {
        let mut rtc = new_rtc(&[
            write(Register::Seconds, 0x58),
            write(Register::Minutes, 0x59),
            write(Register::Hours, 0x23),
        ]);
        rtc.set_time(&ClockTime::new(23, 59, 58, TimeFormat::H24)).unwrap();
        done(rtc);
    }

    #[test]
    fn set_time_12h_sets_mode_bits() {
        let mut rtc = new_rtc(&[
            write(Register::Seconds, 0x09),
            write(Register::Minutes, 0x07),
            write(Register::Hours, 0x65),
            write(Register::Seconds, 0x00),
            write(Register::Minutes, 0x00),
            write(Register::Hours, 0x52),
        ]);
        rtc.set_time(&ClockTime::new(5, 7, 9, TimeFormat::H12Pm)).unwrap();
        rtc.set_time(&ClockTime::new(12, 0, 0, TimeFormat::H12Am)).unwrap();
        done(rtc);
    }

    #[test]
    fn set_time_never_writes_clock_halt() {
        // no read of the previous seconds value happens either
        let mut expectations = vec![];
        for s in 0..=59u8 {
            expectations.push(write(Register::Seconds, encode_bcd(s)));
            expectations.push(write(Register::Minutes, 0x00));
            expectations.push(write(Register::Hours, 0x00));
        }
        let mut rtc = new_rtc(&expectations);
        for s in 0..=59u8 {
            assert!(encode_seconds(s) & SecondsFlags::CLOCK_HALT.bits() == 0);
            rtc.set_time(&ClockTime::new(0, 0, s, TimeFormat::H24)).unwrap();
        }
        done(rtc);
    }

    #[test]
    fn set_time_rejects_out_of_range_without_bus_traffic() {
        let mut rtc = new_rtc(&[]);
        for time in [
            ClockTime::new(24, 0, 0, TimeFormat::H24),
            ClockTime::new(0, 0, 0, TimeFormat::H12Pm),
            ClockTime::new(13, 0, 0, TimeFormat::H12Am),
            ClockTime::new(1, 60, 0, TimeFormat::H24),
            ClockTime::new(1, 0, 99, TimeFormat::H24),
        ] {
            assert_eq!(rtc.set_time(&time), Err(Error::InvalidFieldValue));
        }
        done(rtc);
    }

    #[test]
    fn set_time_stops_at_first_failed_write() {
        let mut rtc = new_rtc(&[
            write(Register::Seconds, 0x30),
            I2cTrans::write(ADDRESS, vec![0x01, 0x15]).with_error(bus_error()),
        ]);
        assert_eq!(
            rtc.set_time(&ClockTime::new(10, 15, 30, TimeFormat::H24)),
            Err(Error::I2c(bus_error()))
        );
        done(rtc);
    }

    #[test]
    fn time_masks_clock_halt_and_decodes_hours() {
        let mut rtc = new_rtc(&[
            read(Register::Seconds, 0x80 | 0x45),
            read(Register::Minutes, 0x30),
            read(Register::Hours, 0x65),
            read(Register::Seconds, 0x00),
            read(Register::Minutes, 0x59),
            read(Register::Hours, 0x23),
        ]);
        assert_eq!(rtc.time(), Ok(ClockTime::new(5, 30, 45, TimeFormat::H12Pm)));
        assert_eq!(rtc.time(), Ok(ClockTime::new(23, 59, 0, TimeFormat::H24)));
        done(rtc);
    }

    #[test]
    fn time_propagates_read_failure() {
        let mut rtc = new_rtc(&[
            read(Register::Seconds, 0x12),
            I2cTrans::write_read(ADDRESS, vec![0x01], vec![0x00]).with_error(bus_error()),
        ]);
        assert_eq!(rtc.time(), Err(Error::I2c(bus_error())));
        done(rtc);
    }

    #[test]
    fn set_full_date_writes_fields_unchanged() {
        let mut rtc = new_rtc(&[
            write(Register::Day, SUNDAY),
            write(Register::Date, 0x17),
            write(Register::Month, 0x11),
            write(Register::Year, 0x24),
        ]);
        rtc.set_full_date(&CalendarDate::new(SUNDAY, 0x17, 0x11, 0x24)).unwrap();
        done(rtc);
    }

    #[test]
    fn set_full_date_with_binary_fields_does_not_read_back() {
        // date 17 goes out as 0x11, which reads back as 11
        let mut rtc = new_rtc(&[
            write(Register::Day, SUNDAY),
            write(Register::Date, 17),
            write(Register::Month, 11),
            write(Register::Year, 24),
            read(Register::Day, SUNDAY),
            read(Register::Date, 17),
            read(Register::Month, 11),
            read(Register::Year, 24),
        ]);
        let date = CalendarDate::new(SUNDAY, 17, 11, 24);
        rtc.set_full_date(&date).unwrap();
        assert_eq!(rtc.full_date(), Ok(CalendarDate::new(SUNDAY, 11, 11, 18)));
        done(rtc);
    }

    #[test]
    fn full_date_decodes_all_but_day() {
        let mut rtc = new_rtc(&[
            read(Register::Day, 0x07),
            read(Register::Date, 0x31),
            read(Register::Month, 0x12),
            read(Register::Year, 0x99),
        ]);
        assert_eq!(rtc.full_date(), Ok(CalendarDate::new(SATURDAY, 31, 12, 99)));
        done(rtc);
    }

    #[test]
    fn set_date_encodes_and_validates() {
        let mut rtc = new_rtc(&[
            write(Register::Day, FRIDAY),
            write(Register::Date, 0x31),
            write(Register::Month, 0x12),
            write(Register::Year, 0x99),
        ]);
        rtc.set_date(&CalendarDate::new(FRIDAY, 31, 12, 99)).unwrap();
        assert_eq!(
            rtc.set_date(&CalendarDate::new(FRIDAY, 32, 12, 99)),
            Err(Error::InvalidFieldValue)
        );
        assert_eq!(
            rtc.set_date(&CalendarDate::new(0, 1, 1, 0)),
            Err(Error::InvalidFieldValue)
        );
        done(rtc);
    }

    #[test]
    fn power_on_defaults_read_as_first_of_january() {
        let mut rtc = new_rtc(&[
            read(Register::Seconds, 0x80),
            read(Register::Minutes, 0x00),
            read(Register::Hours, 0x00),
            read(Register::Day, 0x01),
            read(Register::Date, 0x01),
            read(Register::Month, 0x01),
            read(Register::Year, 0x00),
        ]);
        assert_eq!(rtc.datetime(), Ok(datetime!(2000-01-01 0:00)));
        done(rtc);
    }

    #[test]
    fn datetime_rejects_impossible_register_values() {
        let mut rtc = new_rtc(&[
            read(Register::Seconds, 0x00),
            read(Register::Minutes, 0x00),
            read(Register::Hours, 0x12),
            read(Register::Day, 0x01),
            read(Register::Date, 0x30),
            read(Register::Month, 0x02),
            read(Register::Year, 0x24),
        ]);
        assert_eq!(rtc.datetime(), Err(Error::InvalidDateTime));
        done(rtc);
    }

    #[test]
    fn datetime_rejects_impossible_twelve_hour_values() {
        // 12-hour AM hour 0, then 12-hour PM hour 13
        for hours in [0x40, 0x73] {
            let mut rtc = new_rtc(&[
                read(Register::Seconds, 0x00),
                read(Register::Minutes, 0x00),
                read(Register::Hours, hours),
                read(Register::Day, 0x01),
                read(Register::Date, 0x01),
                read(Register::Month, 0x01),
                read(Register::Year, 0x00),
            ]);
            assert_eq!(rtc.datetime(), Err(Error::InvalidDateTime));
            done(rtc);
        }
    }

    #[test]
    fn set_datetime_writes_time_then_date() {
        // 2024-11-17 is a Sunday
        let mut rtc = new_rtc(&[
            write(Register::Seconds, 0x05),
            write(Register::Minutes, 0x04),
            write(Register::Hours, 0x19),
            write(Register::Day, SUNDAY),
            write(Register::Date, 0x17),
            write(Register::Month, 0x11),
            write(Register::Year, 0x24),
        ]);
        rtc.set_datetime(&datetime!(2024-11-17 19:04:05)).unwrap();
        assert_eq!(
            rtc.set_datetime(&datetime!(2100-01-01 0:00)),
            Err(Error::InvalidFieldValue)
        );
        done(rtc);
    }

    #[test]
    fn halt_and_start_keep_seconds() {
        let mut rtc = new_rtc(&[
            read(Register::Seconds, 0x42),
            write(Register::Seconds, 0xc2),
            read(Register::Seconds, 0xc2),
            read(Register::Seconds, 0xc2),
            write(Register::Seconds, 0x42),
            read(Register::Seconds, 0x42),
            read(Register::Seconds, 0x42),
        ]);
        rtc.halt().unwrap();
        assert_eq!(rtc.is_running(), Ok(false));
        rtc.start().unwrap();
        assert_eq!(rtc.is_running(), Ok(true));
        // already running, no write
        rtc.start().unwrap();
        done(rtc);
    }

    #[test]
    fn reads_do_not_write() {
        let mut rtc = new_rtc(&[
            read(Register::Seconds, 0x00),
            read(Register::Minutes, 0x00),
            read(Register::Hours, 0x00),
            read(Register::Day, 0x01),
            read(Register::Date, 0x01),
            read(Register::Month, 0x01),
            read(Register::Year, 0x00),
        ]);
        rtc.time().unwrap();
        rtc.full_date().unwrap();
        done(rtc);
    }
}
