//! Integration tests for the AS5600 driver, using an in-memory fake
//! transport for the register logic and mocked I2C for the hardware
//! transport.

use as5600_i2c::{
    ANGLE_MAX, As5600, BurnCommand, ChipInfo, DEVICE_ADDRESS, Error, FastFilterThreshold,
    Hysteresis, I2cTransport, OutputStage, PowerMode, PwmFrequency, SlowFilter, Transport,
    angle_to_register, register_to_angle,
};
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FakeBusError;

/// Fake transport backed by a full register image.
///
/// Reads and writes behave like the device's auto-incrementing register
/// pointer; failure flags force the individual capabilities to error.
struct FakeTransport {
    registers: [u8; 256],
    open_calls: u32,
    close_calls: u32,
    write_calls: u32,
    fail_open: bool,
    fail_close: bool,
    fail_io: bool,
}

impl FakeTransport {
    fn new() -> Self {
        Self {
            registers: [0; 256],
            open_calls: 0,
            close_calls: 0,
            write_calls: 0,
            fail_open: false,
            fail_close: false,
            fail_io: false,
        }
    }
}

impl Transport for FakeTransport {
    type Error = FakeBusError;

    fn open(&mut self) -> Result<(), FakeBusError> {
        if self.fail_open {
            return Err(FakeBusError);
        }
        self.open_calls += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), FakeBusError> {
        if self.fail_close {
            return Err(FakeBusError);
        }
        self.close_calls += 1;
        Ok(())
    }

    fn read(&mut self, address: u8, register: u8, buf: &mut [u8]) -> Result<(), FakeBusError> {
        assert_eq!(address, DEVICE_ADDRESS);
        if self.fail_io {
            return Err(FakeBusError);
        }
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = self.registers[usize::from(register) + i];
        }
        Ok(())
    }

    fn write(&mut self, address: u8, register: u8, data: &[u8]) -> Result<(), FakeBusError> {
        assert_eq!(address, DEVICE_ADDRESS);
        if self.fail_io {
            return Err(FakeBusError);
        }
        self.write_calls += 1;
        for (i, byte) in data.iter().enumerate() {
            self.registers[usize::from(register) + i] = *byte;
        }
        Ok(())
    }

    fn delay_ms(&mut self, _ms: u32) {}
}

fn init_sensor(transport: FakeTransport) -> As5600<FakeTransport> {
    let mut sensor = As5600::new(transport);
    sensor.init().unwrap();
    sensor
}

#[test]
fn lifecycle_opens_and_closes_the_bus() {
    let mut sensor = init_sensor(FakeTransport::new());
    sensor.deinit().unwrap();

    let transport = sensor.release();
    assert_eq!(transport.open_calls, 1);
    assert_eq!(transport.close_calls, 1);
}

#[test]
fn init_failure_leaves_driver_uninitialized() {
    let mut transport = FakeTransport::new();
    transport.fail_open = true;

    let mut sensor = As5600::new(transport);
    assert_eq!(sensor.init(), Err(Error::InitFailed(FakeBusError)));
    assert_eq!(sensor.angle(), Err(Error::NotInitialized));
}

#[test]
fn deinit_failure_surfaces_deinit_failed() {
    let mut transport = FakeTransport::new();
    transport.fail_close = true;

    let mut sensor = init_sensor(transport);
    assert_eq!(sensor.deinit(), Err(Error::DeinitFailed(FakeBusError)));
}

#[test]
fn deinit_requires_init() {
    let mut sensor = As5600::new(FakeTransport::new());
    assert_eq!(sensor.deinit(), Err(Error::NotInitialized));
}

#[test]
fn accessors_require_init() {
    let mut sensor = As5600::new(FakeTransport::new());

    assert_eq!(sensor.read(), Err(Error::NotInitialized));
    assert_eq!(sensor.start_position(), Err(Error::NotInitialized));
    assert_eq!(sensor.set_start_position(0x123), Err(Error::NotInitialized));
    assert_eq!(sensor.status(), Err(Error::NotInitialized));
    assert_eq!(
        sensor.set_burn(BurnCommand::LoadOtp1),
        Err(Error::NotInitialized)
    );
}

#[test]
fn transfer_failure_surfaces_io() {
    let mut transport = FakeTransport::new();
    transport.fail_io = true;

    let mut sensor = init_sensor(transport);
    assert_eq!(sensor.angle(), Err(Error::Io(FakeBusError)));
    assert_eq!(sensor.set_watchdog(true), Err(Error::Io(FakeBusError)));
}

#[test]
fn twelve_bit_fields_round_trip_every_value() {
    let mut sensor = init_sensor(FakeTransport::new());

    for value in 0..ANGLE_MAX {
        sensor.set_start_position(value).unwrap();
        assert_eq!(sensor.start_position().unwrap(), value);
    }
}

#[test]
fn position_setters_write_nibble_packed_pairs() {
    let mut sensor = init_sensor(FakeTransport::new());

    sensor.set_start_position(0x123).unwrap();
    sensor.set_stop_position(0xABC).unwrap();
    sensor.set_max_angle(0xFFF).unwrap();

    let transport = sensor.release();
    assert_eq!(transport.registers[0x01..=0x02], [0x01, 0x23]);
    assert_eq!(transport.registers[0x03..=0x04], [0x0A, 0xBC]);
    assert_eq!(transport.registers[0x05..=0x06], [0x0F, 0xFF]);
}

#[test]
fn position_setters_reject_values_over_twelve_bits() {
    let mut sensor = init_sensor(FakeTransport::new());

    assert_eq!(sensor.set_start_position(0x1000), Err(Error::ValueOutOfRange));
    assert_eq!(sensor.set_stop_position(0xFFFF), Err(Error::ValueOutOfRange));
    assert_eq!(sensor.set_max_angle(0x1000), Err(Error::ValueOutOfRange));

    // No bus write may happen for a rejected value
    assert_eq!(sensor.release().write_calls, 0);
}

#[test]
fn read_converts_raw_angle_to_degrees() {
    let mut transport = FakeTransport::new();
    transport.registers[0x0C] = 0x08;
    transport.registers[0x0D] = 0x00;

    let mut sensor = init_sensor(transport);
    let (raw, degrees) = sensor.read().unwrap();

    assert_eq!(raw, 0x800);
    assert_eq!(degrees, 180.0);
}

#[test]
fn degrees_stay_below_full_turn() {
    for raw in 0..ANGLE_MAX {
        let degrees = register_to_angle(raw);
        assert!((0.0..360.0).contains(&degrees));
    }
}

#[test]
fn angle_conversion_truncates_towards_zero() {
    // 100° maps to 1137.77... register counts; the fraction is dropped
    assert_eq!(angle_to_register(100.0), 1137);
    assert_eq!(angle_to_register(0.1), 1);
    assert_eq!(angle_to_register(359.912_109_375), 0xFFF);

    // The inverse multiply is exact, so the round trip is lossy
    assert_eq!(register_to_angle(1137), 99.931_640_625);
    assert!(register_to_angle(angle_to_register(100.0)) < 100.0);
}

#[test]
fn filtered_and_unfiltered_angles_use_separate_registers() {
    let mut transport = FakeTransport::new();
    transport.registers[0x0C] = 0x0F;
    transport.registers[0x0D] = 0xFF;
    transport.registers[0x0E] = 0x01;
    transport.registers[0x0F] = 0x80;

    let mut sensor = init_sensor(transport);
    assert_eq!(sensor.raw_angle().unwrap(), 0xFFF);
    assert_eq!(sensor.angle().unwrap(), 0x180);
}

#[test]
fn conf_high_setters_preserve_sibling_bits() {
    let mut transport = FakeTransport::new();
    // Reserved bits 6-7 set, everything else clear
    transport.registers[0x07] = 0xC0;

    let mut sensor = init_sensor(transport);
    sensor.set_watchdog(true).unwrap();
    sensor
        .set_fast_filter_threshold(FastFilterThreshold::Lsb10)
        .unwrap();
    sensor.set_slow_filter(SlowFilter::X4).unwrap();

    assert!(sensor.watchdog().unwrap());
    assert_eq!(
        sensor.fast_filter_threshold().unwrap(),
        FastFilterThreshold::Lsb10
    );
    assert_eq!(sensor.slow_filter().unwrap(), SlowFilter::X4);

    // watchdog | threshold code 0b111 | slow filter code 0b10, reserved intact
    assert_eq!(
        sensor.release().registers[0x07],
        0xC0 | (1 << 5) | (0b111 << 2) | 0b10
    );
}

#[test]
fn conf_low_setters_preserve_sibling_fields() {
    let mut sensor = init_sensor(FakeTransport::new());

    sensor.set_pwm_frequency(PwmFrequency::Hz460).unwrap();
    sensor.set_output_stage(OutputStage::DigitalPwm).unwrap();
    sensor.set_hysteresis(Hysteresis::Off).unwrap();

    // The scenario from the field-independence requirement: changing the
    // power mode must not disturb the hysteresis sharing its byte
    sensor.set_power_mode(PowerMode::LowPower2).unwrap();

    assert_eq!(sensor.power_mode().unwrap(), PowerMode::LowPower2);
    assert_eq!(sensor.hysteresis().unwrap(), Hysteresis::Off);
    assert_eq!(sensor.pwm_frequency().unwrap(), PwmFrequency::Hz460);
    assert_eq!(sensor.output_stage().unwrap(), OutputStage::DigitalPwm);

    assert_eq!(
        sensor.release().registers[0x08],
        (0b10 << 6) | (0b10 << 4) | (0b00 << 2) | 0b10
    );
}

#[test]
fn fast_filter_threshold_codes_are_not_sequential() {
    let cases = [
        (FastFilterThreshold::SlowFilterOnly, 0b000),
        (FastFilterThreshold::Lsb6, 0b001),
        (FastFilterThreshold::Lsb7, 0b010),
        (FastFilterThreshold::Lsb9, 0b011),
        (FastFilterThreshold::Lsb10, 0b111),
        (FastFilterThreshold::Lsb18, 0b100),
        (FastFilterThreshold::Lsb21, 0b101),
        (FastFilterThreshold::Lsb24, 0b110),
    ];

    let mut sensor = init_sensor(FakeTransport::new());
    let mut buf = [0u8; 1];

    for (threshold, code) in cases {
        sensor.set_fast_filter_threshold(threshold).unwrap();
        assert_eq!(sensor.fast_filter_threshold().unwrap(), threshold);

        sensor.read_raw(0x07, &mut buf).unwrap();
        assert_eq!((buf[0] >> 2) & 0b111, code);
    }
}

#[test]
fn output_stage_rejects_unassigned_code() {
    let mut transport = FakeTransport::new();
    transport.registers[0x08] = 0b0011_0000;

    let mut sensor = init_sensor(transport);
    assert_eq!(sensor.output_stage(), Err(Error::InvalidFieldValue(0b11)));
}

#[test]
fn status_flags_decode_independently() {
    let mut transport = FakeTransport::new();
    transport.registers[0x0B] = 1 << 5;

    let mut sensor = init_sensor(transport);
    let status = sensor.status().unwrap();
    assert!(status.magnet_detected());
    assert!(!status.magnet_too_weak());
    assert!(!status.magnet_too_strong());
    assert!(status.magnet_ok());

    sensor.write_raw(0x0B, &[(1 << 5) | (1 << 4) | (1 << 3)]).unwrap();
    let status = sensor.status().unwrap();
    assert!(status.magnet_detected());
    assert!(status.magnet_too_weak());
    assert!(status.magnet_too_strong());
    assert!(!status.magnet_ok());

    // Device not ready: all flags may be simultaneously unset
    sensor.write_raw(0x0B, &[0x00]).unwrap();
    let status = sensor.status().unwrap();
    assert!(!status.magnet_detected());
    assert!(!status.magnet_ok());
}

#[test]
fn reads_agc_and_magnitude() {
    let mut transport = FakeTransport::new();
    transport.registers[0x1A] = 128;
    transport.registers[0x1B] = 0x0A;
    transport.registers[0x1C] = 0xBC;

    let mut sensor = init_sensor(transport);
    assert_eq!(sensor.agc().unwrap(), 128);
    assert_eq!(sensor.magnitude().unwrap(), 0xABC);
}

#[test]
fn zmco_masks_the_burn_counter() {
    let mut transport = FakeTransport::new();
    transport.registers[0x00] = 0b1111_0111;

    let mut sensor = init_sensor(transport);
    assert_eq!(sensor.zmco().unwrap(), 3);
}

#[test]
fn burn_commands_pass_through_unmodified() {
    let mut sensor = init_sensor(FakeTransport::new());
    let mut buf = [0u8; 1];

    for (command, code) in [
        (BurnCommand::LoadOtp1, 0x01),
        (BurnCommand::LoadOtp2, 0x11),
        (BurnCommand::LoadOtp3, 0x10),
        (BurnCommand::Angle, 0x80),
        (BurnCommand::Setting, 0x40),
    ] {
        sensor.set_burn(command).unwrap();
        sensor.read_raw(0xFF, &mut buf).unwrap();
        assert_eq!(buf[0], code);
    }

    assert_eq!(sensor.release().write_calls, 5);
}

#[test]
fn raw_register_escape_hatch_round_trips() {
    let mut sensor = init_sensor(FakeTransport::new());

    sensor.write_raw(0x20, &[0xAA, 0x55]).unwrap();

    let mut buf = [0u8; 2];
    sensor.read_raw(0x20, &mut buf).unwrap();
    assert_eq!(buf, [0xAA, 0x55]);
}

#[test]
fn chip_info_needs_no_handle() {
    let info = ChipInfo::get();

    assert_eq!(info.chip_name, "AMS AS5600");
    assert_eq!(info.manufacturer_name, "AMS");
    assert_eq!(info.interface, "IIC");
    assert_eq!(info.supply_voltage_min_v, 4.5);
    assert_eq!(info.supply_voltage_max_v, 5.5);
    assert_eq!(info.max_current_ma, 100.0);
    assert_eq!(info.temperature_min_c, -40.0);
    assert_eq!(info.temperature_max_c, 125.0);
    assert_eq!(info.driver_version, 1000);
    assert_eq!(ChipInfo::default(), info);
}

#[test]
fn full_session_against_working_fakes() {
    let mut sensor = init_sensor(FakeTransport::new());

    sensor.set_start_position(0x123).unwrap();
    assert_eq!(sensor.start_position().unwrap(), 0x123);

    sensor.set_hysteresis(Hysteresis::Off).unwrap();
    sensor.set_power_mode(PowerMode::LowPower2).unwrap();
    assert_eq!(sensor.power_mode().unwrap(), PowerMode::LowPower2);
    assert_eq!(sensor.hysteresis().unwrap(), Hysteresis::Off);

    sensor.deinit().unwrap();
    assert_eq!(sensor.angle(), Err(Error::NotInitialized));
}

#[test]
fn i2c_transport_reads_via_write_read() {
    let expectations = [I2cTransaction::write_read(
        DEVICE_ADDRESS >> 1,
        vec![0x0C],
        vec![0x08, 0x00],
    )];

    let i2c = I2cMock::new(&expectations);
    let mut transport = I2cTransport::new(i2c, NoopDelay::new());

    let mut buf = [0u8; 2];
    transport.read(DEVICE_ADDRESS, 0x0C, &mut buf).unwrap();
    assert_eq!(buf, [0x08, 0x00]);

    let (mut i2c, _) = transport.release();
    i2c.done();
}

#[test]
fn i2c_transport_writes_register_then_payload() {
    let expectations = [
        I2cTransaction::transaction_start(DEVICE_ADDRESS >> 1),
        I2cTransaction::write(DEVICE_ADDRESS >> 1, vec![0x01]),
        I2cTransaction::write(DEVICE_ADDRESS >> 1, vec![0x01, 0x23]),
        I2cTransaction::transaction_end(DEVICE_ADDRESS >> 1),
    ];

    let i2c = I2cMock::new(&expectations);
    let mut transport = I2cTransport::new(i2c, NoopDelay::new());

    transport.write(DEVICE_ADDRESS, 0x01, &[0x01, 0x23]).unwrap();

    let (mut i2c, _) = transport.release();
    i2c.done();
}

#[test]
fn driver_over_i2c_transport_reads_start_position() {
    let expectations = [I2cTransaction::write_read(
        DEVICE_ADDRESS >> 1,
        vec![0x01],
        vec![0x01, 0x23],
    )];

    let i2c = I2cMock::new(&expectations);
    let mut sensor = As5600::new(I2cTransport::new(i2c, NoopDelay::new()));

    sensor.init().unwrap();
    assert_eq!(sensor.start_position().unwrap(), 0x123);

    let (mut i2c, _) = sensor.release().release();
    i2c.done();
}
