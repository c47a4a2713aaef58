//! Synchronous driver for the AS5600 magnetic rotary position sensor

use crate::{
    config::{
        BurnCommand, FastFilterThreshold, Hysteresis, OutputStage, PowerMode, PwmFrequency,
        SlowFilter,
    },
    error::Error,
    register::{ConfigHighRegister, ConfigLowRegister, Register},
    status::Status,
    transport::Transport,
    utils,
};

/// Fixed bus address of the AS5600, in 8-bit form
pub const DEVICE_ADDRESS: u8 = 0x6C;

/// Maximum angle value (12-bit: 0-4095, representing 0-360°)
pub const ANGLE_MAX: u16 = 0xFFF + 1;

const DEGREES_PER_LSB: f32 = 360.0 / 4096.0;

/// Convert a degree value to its 12-bit register representation
///
/// The conversion truncates towards zero and does not range-check the
/// result against [`ANGLE_MAX`]; round-tripping a degree value through
/// [`register_to_angle`] is therefore lossy
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn angle_to_register(degrees: f32) -> u16 {
    (degrees / DEGREES_PER_LSB) as u16
}

/// Convert a 12-bit register value to degrees
#[must_use]
pub fn register_to_angle(raw: u16) -> f32 {
    f32::from(raw) * DEGREES_PER_LSB
}

/// AS5600 driver instance
///
/// Owns a [`Transport`] bound to the fixed device address
/// [`DEVICE_ADDRESS`]. Every register accessor requires a prior
/// successful [`init`](Self::init); the configuration setters perform a
/// read-modify-write of one CONF byte, so concurrent callers sharing a
/// driver must serialize access externally.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct As5600<T> {
    transport: T,
    initialized: bool,
}

impl<T, E> As5600<T>
where
    T: Transport<Error = E>,
{
    /// Create a new AS5600 driver instance over the given transport
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            initialized: false,
        }
    }

    /// Release the transport, consuming the driver
    pub fn release(self) -> T {
        self.transport
    }

    /// Activate the bus and mark the driver ready
    ///
    /// The device needs no setup sequence beyond bus activation, so no
    /// register traffic occurs here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InitFailed`] if the transport could not open the
    /// bus
    pub fn init(&mut self) -> Result<(), Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Opening bus");

        self.transport.open().map_err(|e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("Bus open failed");
            Error::InitFailed(e)
        })?;
        self.initialized = true;

        Ok(())
    }

    /// Release the bus and mark the driver uninitialized
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] if [`init`](Self::init) has not
    /// succeeded, or [`Error::DeinitFailed`] if the transport could not
    /// close the bus
    pub fn deinit(&mut self) -> Result<(), Error<E>> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("Closing bus");

        self.transport.close().map_err(|e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("Bus close failed");
            Error::DeinitFailed(e)
        })?;
        self.initialized = false;

        Ok(())
    }

    /// Block for at least `ms` milliseconds using the transport's delay
    /// capability
    ///
    /// Useful for sequencing operations the device needs settling time
    /// between, such as the OTP load command steps.
    pub fn delay_ms(&mut self, ms: u32) {
        self.transport.delay_ms(ms);
    }

    /// Read bytes starting at an arbitrary register address
    ///
    /// Escape hatch for fields not otherwise modeled by this driver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn read_raw(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Error<E>> {
        self.read_bytes(register, buf)
    }

    /// Write bytes starting at an arbitrary register address
    ///
    /// Escape hatch for fields not otherwise modeled by this driver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn write_raw(&mut self, register: u8, data: &[u8]) -> Result<(), Error<E>> {
        self.write_bytes(register, data)
    }

    fn read_bytes(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Error<E>> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("Reading {} bytes from register 0x{:02X}", buf.len(), register);

        self.transport
            .read(DEVICE_ADDRESS, register, buf)
            .map_err(|e| {
                #[cfg(feature = "defmt")]
                defmt::warn!("Register read failed");
                Error::Io(e)
            })
    }

    fn write_bytes(&mut self, register: u8, data: &[u8]) -> Result<(), Error<E>> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("Writing {} bytes to register 0x{:02X}", data.len(), register);

        self.transport
            .write(DEVICE_ADDRESS, register, data)
            .map_err(|e| {
                #[cfg(feature = "defmt")]
                defmt::warn!("Register write failed");
                Error::Io(e)
            })
    }

    fn read_byte(&mut self, register: Register) -> Result<u8, Error<E>> {
        let mut buf = [0u8; 1];
        self.read_bytes(register.into(), &mut buf)?;
        Ok(buf[0])
    }

    /// Read a 12-bit value from the byte pair starting at `register`
    fn read_u12(&mut self, register: Register) -> Result<u16, Error<E>> {
        let mut buf = [0u8; 2];
        self.read_bytes(register.into(), &mut buf)?;
        Ok(utils::decode12(buf[0], buf[1]))
    }

    /// Write a 12-bit value to the byte pair starting at `register`
    ///
    /// Rejects values above 0x0FFF before any bus traffic.
    fn write_u12(&mut self, register: Register, value: u16) -> Result<(), Error<E>> {
        if value > 0x0FFF {
            return Err(Error::ValueOutOfRange);
        }

        self.write_bytes(register.into(), &utils::encode12(value))
    }

    fn modify_register(
        &mut self,
        register: Register,
        f: impl FnOnce(&mut u8),
    ) -> Result<(), Error<E>> {
        let mut data = self.read_byte(register)?;

        f(&mut data);

        self.write_bytes(register.into(), &[data])
    }

    /// Read the magnetic angle as a raw 12-bit value and in degrees
    ///
    /// Samples the RAW_ANGLE register, the unscaled and unfiltered
    /// measurement; degrees range over [0, 360).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn read(&mut self) -> Result<(u16, f32), Error<E>> {
        let raw = self.read_u12(Register::RawAngleH)?;

        Ok((raw, register_to_angle(raw)))
    }

    /// Get the 12-bit unscaled and unfiltered angle
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn raw_angle(&mut self) -> Result<u16, Error<E>> {
        self.read_u12(Register::RawAngleH)
    }

    /// Get the 12-bit angle after scaling and filtering
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn angle(&mut self) -> Result<u16, Error<E>> {
        self.read_u12(Register::AngleH)
    }

    /// Get the start position (ZPOS)
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn start_position(&mut self) -> Result<u16, Error<E>> {
        self.read_u12(Register::ZPosH)
    }

    /// Set the start position (ZPOS)
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValueOutOfRange`] if `position` exceeds 0x0FFF,
    /// [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn set_start_position(&mut self, position: u16) -> Result<(), Error<E>> {
        self.write_u12(Register::ZPosH, position)
    }

    /// Get the stop position (MPOS)
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn stop_position(&mut self) -> Result<u16, Error<E>> {
        self.read_u12(Register::MPosH)
    }

    /// Set the stop position (MPOS)
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValueOutOfRange`] if `position` exceeds 0x0FFF,
    /// [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn set_stop_position(&mut self, position: u16) -> Result<(), Error<E>> {
        self.write_u12(Register::MPosH, position)
    }

    /// Get the maximum angle (MANG)
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn max_angle(&mut self) -> Result<u16, Error<E>> {
        self.read_u12(Register::MAngH)
    }

    /// Set the maximum angle (MANG)
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValueOutOfRange`] if `angle` exceeds 0x0FFF,
    /// [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn set_max_angle(&mut self, angle: u16) -> Result<(), Error<E>> {
        self.write_u12(Register::MAngH, angle)
    }

    /// Get the watchdog state
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn watchdog(&mut self) -> Result<bool, Error<E>> {
        let conf = ConfigHighRegister(self.read_byte(Register::ConfH)?);

        Ok(conf.watchdog())
    }

    /// Enable or disable the watchdog
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn set_watchdog(&mut self, enabled: bool) -> Result<(), Error<E>> {
        self.modify_register(Register::ConfH, |v| {
            let mut conf = ConfigHighRegister(*v);
            conf.set_watchdog(enabled);
            *v = conf.0;
        })
    }

    /// Get the fast filter threshold
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn fast_filter_threshold(&mut self) -> Result<FastFilterThreshold, Error<E>> {
        let conf = ConfigHighRegister(self.read_byte(Register::ConfH)?);

        Ok(FastFilterThreshold::from_bits(conf.fast_filter_threshold()))
    }

    /// Set the fast filter threshold
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn set_fast_filter_threshold(
        &mut self,
        threshold: FastFilterThreshold,
    ) -> Result<(), Error<E>> {
        self.modify_register(Register::ConfH, |v| {
            let mut conf = ConfigHighRegister(*v);
            conf.set_fast_filter_threshold(threshold.into());
            *v = conf.0;
        })
    }

    /// Get the slow filter step response
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn slow_filter(&mut self) -> Result<SlowFilter, Error<E>> {
        let conf = ConfigHighRegister(self.read_byte(Register::ConfH)?);

        Ok(SlowFilter::from_bits(conf.slow_filter()))
    }

    /// Set the slow filter step response
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn set_slow_filter(&mut self, filter: SlowFilter) -> Result<(), Error<E>> {
        self.modify_register(Register::ConfH, |v| {
            let mut conf = ConfigHighRegister(*v);
            conf.set_slow_filter(filter.into());
            *v = conf.0;
        })
    }

    /// Get the PWM output frequency
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn pwm_frequency(&mut self) -> Result<PwmFrequency, Error<E>> {
        let conf = ConfigLowRegister(self.read_byte(Register::ConfL)?);

        Ok(PwmFrequency::from_bits(conf.pwm_frequency()))
    }

    /// Set the PWM output frequency
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn set_pwm_frequency(&mut self, frequency: PwmFrequency) -> Result<(), Error<E>> {
        self.modify_register(Register::ConfL, |v| {
            let mut conf = ConfigLowRegister(*v);
            conf.set_pwm_frequency(frequency.into());
            *v = conf.0;
        })
    }

    /// Get the OUT pin output stage
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFieldValue`] if the field holds the
    /// unassigned code, [`Error::NotInitialized`] before
    /// [`init`](Self::init), or [`Error::Io`] if the bus transfer fails
    pub fn output_stage(&mut self) -> Result<OutputStage, Error<E>> {
        let conf = ConfigLowRegister(self.read_byte(Register::ConfL)?);

        let bits = conf.output_stage();
        OutputStage::from_bits(bits).ok_or(Error::InvalidFieldValue(bits))
    }

    /// Set the OUT pin output stage
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn set_output_stage(&mut self, stage: OutputStage) -> Result<(), Error<E>> {
        self.modify_register(Register::ConfL, |v| {
            let mut conf = ConfigLowRegister(*v);
            conf.set_output_stage(stage.into());
            *v = conf.0;
        })
    }

    /// Get the hysteresis
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn hysteresis(&mut self) -> Result<Hysteresis, Error<E>> {
        let conf = ConfigLowRegister(self.read_byte(Register::ConfL)?);

        Ok(Hysteresis::from_bits(conf.hysteresis()))
    }

    /// Set the hysteresis
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn set_hysteresis(&mut self, hysteresis: Hysteresis) -> Result<(), Error<E>> {
        self.modify_register(Register::ConfL, |v| {
            let mut conf = ConfigLowRegister(*v);
            conf.set_hysteresis(hysteresis.into());
            *v = conf.0;
        })
    }

    /// Get the power mode
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn power_mode(&mut self) -> Result<PowerMode, Error<E>> {
        let conf = ConfigLowRegister(self.read_byte(Register::ConfL)?);

        Ok(PowerMode::from_bits(conf.power_mode()))
    }

    /// Set the power mode
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), Error<E>> {
        self.modify_register(Register::ConfL, |v| {
            let mut conf = ConfigLowRegister(*v);
            conf.set_power_mode(mode.into());
            *v = conf.0;
        })
    }

    /// Get the magnet status flags
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn status(&mut self) -> Result<Status, Error<E>> {
        self.read_byte(Register::Status).map(Status::new)
    }

    /// Get the automatic gain control level
    ///
    /// Useful for judging magnet placement: mid-range values indicate a
    /// well-positioned magnet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn agc(&mut self) -> Result<u8, Error<E>> {
        self.read_byte(Register::Agc)
    }

    /// Get the 12-bit CORDIC magnitude
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn magnitude(&mut self) -> Result<u16, Error<E>> {
        self.read_u12(Register::MagnitudeH)
    }

    /// Get the number of times the start position has been burned (0-3)
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn zmco(&mut self) -> Result<u8, Error<E>> {
        Ok(self.read_byte(Register::Zmco)? & 0x03)
    }

    /// Write a command to the BURN register
    ///
    /// Raw pass-through: no confirmation or read-back is performed, and
    /// the [`Angle`](BurnCommand::Angle) and
    /// [`Setting`](BurnCommand::Setting) commands are irreversible on
    /// real hardware. The caller bears full responsibility for correct
    /// sequencing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](Self::init), or
    /// [`Error::Io`] if the bus transfer fails
    pub fn set_burn(&mut self, command: BurnCommand) -> Result<(), Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Writing burn command 0x{:02X}", command as u8);

        self.write_bytes(Register::Burn.into(), &[command.into()])
    }
}
