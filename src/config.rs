//! Typed values for the packed CONF register fields and the BURN command
//! register.

/// Power mode (CONF low byte, bits 0-1)
///
/// The low power modes trade angle sampling rate for supply current by
/// lengthening the sensor's internal polling period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PowerMode {
    /// Always on
    Normal = 0x00,
    /// 5 ms polling period
    LowPower1 = 0x01,
    /// 20 ms polling period
    LowPower2 = 0x02,
    /// 100 ms polling period
    LowPower3 = 0x03,
}

impl PowerMode {
    /// Decode from the two field bits
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0x00 => Self::Normal,
            0x01 => Self::LowPower1,
            0x02 => Self::LowPower2,
            _ => Self::LowPower3,
        }
    }
}

impl From<PowerMode> for u8 {
    fn from(mode: PowerMode) -> u8 {
        mode as u8
    }
}

/// Hysteresis applied to the output to suppress toggling (CONF low byte,
/// bits 2-3)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Hysteresis {
    /// Off
    Off = 0x00,
    /// 1 LSB
    Lsb1 = 0x01,
    /// 2 LSB
    Lsb2 = 0x02,
    /// 3 LSB
    Lsb3 = 0x03,
}

impl Hysteresis {
    /// Decode from the two field bits
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0x00 => Self::Off,
            0x01 => Self::Lsb1,
            0x02 => Self::Lsb2,
            _ => Self::Lsb3,
        }
    }
}

impl From<Hysteresis> for u8 {
    fn from(hysteresis: Hysteresis) -> u8 {
        hysteresis as u8
    }
}

/// OUT pin output stage (CONF low byte, bits 4-5)
///
/// The code 0b11 is not assigned by the datasheet, so decoding is
/// fallible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OutputStage {
    /// Analog, full range from 0% to 100% between GND and VDD
    AnalogFull = 0x00,
    /// Analog, reduced range from 10% to 90% between GND and VDD
    AnalogReduced = 0x01,
    /// Digital PWM
    DigitalPwm = 0x02,
}

impl OutputStage {
    /// Decode from the two field bits, `None` for the unassigned code
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0x03 {
            0x00 => Some(Self::AnalogFull),
            0x01 => Some(Self::AnalogReduced),
            0x02 => Some(Self::DigitalPwm),
            _ => None,
        }
    }
}

impl From<OutputStage> for u8 {
    fn from(stage: OutputStage) -> u8 {
        stage as u8
    }
}

/// PWM output frequency (CONF low byte, bits 6-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PwmFrequency {
    /// 115 Hz
    Hz115 = 0x00,
    /// 230 Hz
    Hz230 = 0x01,
    /// 460 Hz
    Hz460 = 0x02,
    /// 920 Hz
    Hz920 = 0x03,
}

impl PwmFrequency {
    /// Decode from the two field bits
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0x00 => Self::Hz115,
            0x01 => Self::Hz230,
            0x02 => Self::Hz460,
            _ => Self::Hz920,
        }
    }
}

impl From<PwmFrequency> for u8 {
    fn from(frequency: PwmFrequency) -> u8 {
        frequency as u8
    }
}

/// Slow filter step response (CONF high byte, bits 0-1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SlowFilter {
    /// 16x
    X16 = 0x00,
    /// 8x
    X8 = 0x01,
    /// 4x
    X4 = 0x02,
    /// 2x
    X2 = 0x03,
}

impl SlowFilter {
    /// Decode from the two field bits
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0x00 => Self::X16,
            0x01 => Self::X8,
            0x02 => Self::X4,
            _ => Self::X2,
        }
    }
}

impl From<SlowFilter> for u8 {
    fn from(filter: SlowFilter) -> u8 {
        filter as u8
    }
}

/// Fast filter threshold (CONF high byte, bits 2-4)
///
/// The numeric codes do not follow the ascending threshold order; the
/// 10 LSB threshold sits at 0b111 while 18/21/24 LSB occupy 0b100-0b110.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FastFilterThreshold {
    /// Slow filter only, fast filter disabled
    SlowFilterOnly = 0x00,
    /// 6 LSB
    Lsb6 = 0x01,
    /// 7 LSB
    Lsb7 = 0x02,
    /// 9 LSB
    Lsb9 = 0x03,
    /// 10 LSB
    Lsb10 = 0x07,
    /// 18 LSB
    Lsb18 = 0x04,
    /// 21 LSB
    Lsb21 = 0x05,
    /// 24 LSB
    Lsb24 = 0x06,
}

impl FastFilterThreshold {
    /// Decode from the three field bits
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0x00 => Self::SlowFilterOnly,
            0x01 => Self::Lsb6,
            0x02 => Self::Lsb7,
            0x03 => Self::Lsb9,
            0x07 => Self::Lsb10,
            0x04 => Self::Lsb18,
            0x05 => Self::Lsb21,
            _ => Self::Lsb24,
        }
    }
}

impl From<FastFilterThreshold> for u8 {
    fn from(threshold: FastFilterThreshold) -> u8 {
        threshold as u8
    }
}

/// Command codes accepted by the BURN register (0xFF)
///
/// `Angle` and `Setting` permanently program OTP memory on the physical
/// device. The three `LoadOtp` steps reload the OTP content into the
/// active registers and must be issued in sequence by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BurnCommand {
    /// OTP content load sequence, step 1
    LoadOtp1 = 0x01,
    /// OTP content load sequence, step 2
    LoadOtp2 = 0x11,
    /// OTP content load sequence, step 3
    LoadOtp3 = 0x10,
    /// Burn the start and stop position (ZPOS, MPOS) into OTP
    Angle = 0x80,
    /// Burn the maximum angle and configuration (MANG, CONF) into OTP
    Setting = 0x40,
}

impl From<BurnCommand> for u8 {
    fn from(command: BurnCommand) -> u8 {
        command as u8
    }
}
