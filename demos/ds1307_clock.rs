//! Starts a DS1307 on I2C1, sets it to a fixed date and time, then prints it.
//!
//! ```text
//! STM32F746 <-> DS1307
//! PB6       <-> SCL
//! PB7       <-> SDA
//! ```

#![no_main]
#![no_std]

extern crate panic_halt as _;
use cortex_m_rt::entry;

use cortex_m_semihosting::hprintln;
use ds1307_rtc::{board, ClockTime, TimeFormat};
use stm32f7xx_hal::{pac, prelude::*};
use time::macros::datetime;

#[entry]
fn main() -> ! {
    let dp = pac::Peripherals::take().unwrap();

    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    let gpiob = dp.GPIOB.split();
    let scl = gpiob.pb6.into_alternate_open_drain::<4>();
    let sda = gpiob.pb7.into_alternate_open_drain::<4>();

    let mut rtc = board::ds1307_i2c1(dp.I2C1, (scl, sda), &clocks, &mut rcc.apb1);

    if rtc.init().unwrap() {
        hprintln!("DS1307 oscillator did not start");
    }

    rtc.set_datetime(&datetime!(2024-11-17 23:59:50)).unwrap();
    // Alternatively, field by field:
    // rtc.set_time(&ClockTime::new(11, 59, 50, TimeFormat::H12Pm)).unwrap();
    // rtc.set_date(&CalendarDate::new(SUNDAY, 17, 11, 24)).unwrap();

    let mut last = ClockTime::new(0, 0, 60, TimeFormat::H24);
    loop {
        let now = rtc.time().unwrap();
        if now != last {
            let date = rtc.full_date().unwrap();
            hprintln!(
                "20{:02}-{:02}-{:02} (day {}) {:02}:{:02}:{:02} {:?}",
                date.year,
                date.month,
                date.date,
                date.day,
                now.hours,
                now.minutes,
                now.seconds,
                now.format
            );
            last = now;
        }
    }
}
