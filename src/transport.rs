//! Bus transport abstraction for the AS5600.
//!
//! The driver core is written against [`Transport`] so that the same
//! register logic runs over any addressed two-wire bus implementation:
//! a hardware I2C peripheral through [`I2cTransport`], or an in-memory
//! fake in tests.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{I2c, Operation};

/// Capability set the driver requires from the underlying bus
///
/// `read` and `write` address a register within the device at the given
/// bus address and transfer `buf.len()` / `data.len()` bytes. Each call
/// is a single bus transaction; the driver never retries and treats a
/// failed transfer as terminal for the operation in progress.
pub trait Transport {
    /// Transport-specific error
    type Error;

    /// Activate the bus
    ///
    /// # Errors
    ///
    /// Returns an error if the bus could not be activated
    fn open(&mut self) -> Result<(), Self::Error>;

    /// Release the bus
    ///
    /// # Errors
    ///
    /// Returns an error if the bus could not be released
    fn close(&mut self) -> Result<(), Self::Error>;

    /// Read `buf.len()` bytes starting at `register`
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails
    fn read(&mut self, address: u8, register: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `data` starting at `register`
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails
    fn write(&mut self, address: u8, register: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

/// [`Transport`] over an `embedded-hal` I2C bus and delay provider
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cTransport<I2C, D> {
    i2c: I2C,
    delay: D,
}

impl<I2C, D> I2cTransport<I2C, D> {
    /// Create a new transport over the given bus and delay provider
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self { i2c, delay }
    }

    /// Release the bus and delay provider, consuming the transport
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C, D, E> Transport for I2cTransport<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
{
    type Error = E;

    /// The bus peripheral is owned and already powered; nothing to do
    fn open(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn read(&mut self, address: u8, register: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        // `address` is the 8-bit form; embedded-hal takes the 7-bit form
        self.i2c.write_read(address >> 1, &[register], buf)
    }

    fn write(&mut self, address: u8, register: u8, data: &[u8]) -> Result<(), Self::Error> {
        // One transaction, no repeated start between address byte and
        // payload, no intermediate buffer
        self.i2c.transaction(
            address >> 1,
            &mut [Operation::Write(&[register]), Operation::Write(data)],
        )
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
