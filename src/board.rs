//! STM32F7 bring-up of the bus the DS1307 hangs off
//!
//! ```text
//! STM32F7 <-> DS1307
//! PB6     <-> SCL
//! PB7     <-> SDA
//! ```
//!
//! Both lines have to be put in alternate function 4, open drain, before
//! they are handed over, and need pull-ups (most DS1307 modules carry them).

use stm32f7xx_hal::i2c::{self, BlockingI2c, Mode, PinScl, PinSda};
use stm32f7xx_hal::pac::I2C1;
use stm32f7xx_hal::rcc::{Clocks, RccBus};

use crate::{Ds1307, BUS_FREQUENCY};

/// Error reported by the HAL's blocking I2C master
pub type BusError = nb::Error<i2c::Error>;

/// Byte timeout of the blocking master, in microseconds
pub const DATA_TIMEOUT_US: u32 = 50_000;

/// Driver bound to I2C1
pub type Ds1307I2c1<SCL, SDA> = Ds1307<BlockingI2c<I2C1, SCL, SDA>>;

/// Enables I2C1, configures it as a standard-mode master at
/// [`BUS_FREQUENCY`] and binds a driver to it.
///
/// Call [`Ds1307::init`] on the result to start the oscillator.
pub fn ds1307_i2c1<SCL, SDA>(
    i2c: I2C1,
    pins: (SCL, SDA),
    clocks: &Clocks,
    apb: &mut <I2C1 as RccBus>::Bus,
) -> Ds1307I2c1<SCL, SDA>
where
    SCL: PinScl<I2C1>,
    SDA: PinSda<I2C1>,
{
    let i2c = BlockingI2c::i2c1(
        i2c,
        pins,
        Mode::standard(BUS_FREQUENCY),
        clocks,
        apb,
        DATA_TIMEOUT_US,
    );
    Ds1307::new(i2c)
}
