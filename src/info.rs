//! Static chip and driver information.

/// Descriptive record for the sensor and this driver
///
/// Pure constants; no handle or bus access is involved.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChipInfo {
    /// Chip name
    pub chip_name: &'static str,
    /// Manufacturer name
    pub manufacturer_name: &'static str,
    /// Bus interface name
    pub interface: &'static str,
    /// Minimum supply voltage in volts
    pub supply_voltage_min_v: f32,
    /// Maximum supply voltage in volts
    pub supply_voltage_max_v: f32,
    /// Maximum current in milliamperes
    pub max_current_ma: f32,
    /// Minimum operating temperature in degrees Celsius
    pub temperature_min_c: f32,
    /// Maximum operating temperature in degrees Celsius
    pub temperature_max_c: f32,
    /// Driver version, scaled by 1000 (1000 = 1.0)
    pub driver_version: u32,
}

impl ChipInfo {
    /// Get the chip information record
    #[must_use]
    pub const fn get() -> Self {
        Self {
            chip_name: "AMS AS5600",
            manufacturer_name: "AMS",
            interface: "IIC",
            supply_voltage_min_v: 4.5,
            supply_voltage_max_v: 5.5,
            max_current_ma: 100.0,
            temperature_min_c: -40.0,
            temperature_max_c: 125.0,
            driver_version: 1000,
        }
    }
}

impl Default for ChipInfo {
    fn default() -> Self {
        Self::get()
    }
}
