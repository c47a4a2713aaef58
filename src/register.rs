//! Register addresses for AS5600 sensor.

/// Register addresses for AS5600
///
/// The 12-bit quantities (position, angle, magnitude) occupy a byte pair;
/// the high byte's low nibble holds bits 8-11 and the low byte bits 0-7.
/// Multi-byte reads and writes start at the high byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
#[repr(u8)]
pub enum Register {
    /// ZPOS burn counter (low two bits)
    Zmco = 0x00,
    /// Start position MSB
    ZPosH = 0x01,
    /// Start position LSB
    ZPosL = 0x02,
    /// Stop position MSB
    MPosH = 0x03,
    /// Stop position LSB
    MPosL = 0x04,
    /// Maximum angle MSB
    MAngH = 0x05,
    /// Maximum angle LSB
    MAngL = 0x06,
    /// Configuration high byte
    ConfH = 0x07,
    /// Configuration low byte
    ConfL = 0x08,
    /// Magnet status flags
    Status = 0x0B,
    /// Unfiltered angle MSB
    RawAngleH = 0x0C,
    /// Unfiltered angle LSB
    RawAngleL = 0x0D,
    /// Filtered angle MSB
    AngleH = 0x0E,
    /// Filtered angle LSB
    AngleL = 0x0F,
    /// Automatic gain control
    Agc = 0x1A,
    /// CORDIC magnitude MSB
    MagnitudeH = 0x1B,
    /// CORDIC magnitude LSB
    MagnitudeL = 0x1C,
    /// OTP programming command register
    Burn = 0xFF,
}

impl From<Register> for u8 {
    fn from(reg: Register) -> u8 {
        reg as u8
    }
}

bitfield::bitfield! {
    /// CONF high byte (0x07)
    pub struct ConfigHighRegister(u8);
    impl Debug;
    u8;
    /// Watchdog enable
    pub watchdog, set_watchdog: 5;
    /// Fast filter threshold code (see Figure 23 of the datasheet for the
    /// non-linear code ordering)
    pub fast_filter_threshold, set_fast_filter_threshold: 4, 2;
    /// Slow filter step response code
    pub slow_filter, set_slow_filter: 1, 0;
}

bitfield::bitfield! {
    /// CONF low byte (0x08)
    pub struct ConfigLowRegister(u8);
    impl Debug;
    u8;
    /// PWM frequency code
    pub pwm_frequency, set_pwm_frequency: 7, 6;
    /// OUT pin output stage code
    pub output_stage, set_output_stage: 5, 4;
    /// Hysteresis code
    pub hysteresis, set_hysteresis: 3, 2;
    /// Power mode code
    pub power_mode, set_power_mode: 1, 0;
}
