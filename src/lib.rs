#![no_std]
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

mod config;
mod driver;
mod error;
mod info;
mod register;
mod status;
mod transport;
mod utils;

pub use config::{
    BurnCommand, FastFilterThreshold, Hysteresis, OutputStage, PowerMode, PwmFrequency, SlowFilter,
};
pub use driver::{ANGLE_MAX, As5600, DEVICE_ADDRESS, angle_to_register, register_to_angle};
pub use error::Error;
pub use info::ChipInfo;
pub use register::{ConfigHighRegister, ConfigLowRegister, Register};
pub use status::Status;
pub use transport::{I2cTransport, Transport};
