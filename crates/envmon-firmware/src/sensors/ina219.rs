//! INA219 bus voltage and current monitor, driven through raw register reads.
//!
//! The board uses a 0.1 Ω shunt and expects at most 400 mA, so the chip is
//! set to the 16 V bus range and the ±40 mV shunt range. Current is derived
//! from the shunt voltage directly; the calibration register is unused.

use embedded_hal::i2c::I2c;
use envmon_core::sensors::PowerReading;
use envmon_core::{Sensor, SensorError};
use log::{debug, error};

const ADDRESS: u8 = 0x40;

const REG_CONFIG: u8 = 0x00;
const REG_SHUNT_VOLTAGE: u8 = 0x01;
const REG_BUS_VOLTAGE: u8 = 0x02;

/// 16 V range, gain /1, 12-bit bus and shunt ADC, continuous conversion.
const CONFIG_16V_40MV: u16 = (0b0011 << 7) | (0b0011 << 3) | 0b111;

const SHUNT_OHMS: f32 = 0.1;
const SHUNT_LSB_UV: f32 = 10.0;
const BUS_LSB_MV: f32 = 4.0;

pub struct Ina219<I> {
    i2c: I,
}

impl<I: I2c> Ina219<I> {
    /// Write the configuration and read it back; fails when nothing answers
    /// at 0x40 or the readback does not match.
    pub fn probe(mut i2c: I) -> Result<Self, SensorError> {
        let [hi, lo] = CONFIG_16V_40MV.to_be_bytes();
        if let Err(e) = i2c.write(ADDRESS, &[REG_CONFIG, hi, lo]) {
            debug!("INA219 config write failed: {:?}", e);
            return Err(SensorError::NotDetected { sensor: "INA219" });
        }

        let mut monitor = Self { i2c };
        match monitor.read_register(REG_CONFIG) {
            Ok(config) if config == CONFIG_16V_40MV => Ok(monitor),
            Ok(config) => {
                debug!("INA219 config readback {:#06x}", config);
                Err(SensorError::NotDetected { sensor: "INA219" })
            }
            Err(e) => Err(e),
        }
    }

    fn read_register(&mut self, register: u8) -> Result<u16, SensorError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(ADDRESS, &[register], &mut buf)
            .map_err(|e| {
                error!("INA219 read of register {:#04x} failed: {:?}", register, e);
                SensorError::ReadFailed {
                    sensor: "INA219",
                    operation: "read_register",
                    details: "I2C write_read transfer failed",
                }
            })?;
        Ok(u16::from_be_bytes(buf))
    }
}

impl<I: I2c> Sensor for Ina219<I> {
    type Reading = PowerReading;

    fn name(&self) -> &'static str {
        "INA219"
    }

    fn read(&mut self) -> Result<PowerReading, SensorError> {
        let shunt_raw = self.read_register(REG_SHUNT_VOLTAGE)? as i16;
        let bus_raw = self.read_register(REG_BUS_VOLTAGE)?;

        // Bus voltage sits in bits 15..3; the low bits are status flags.
        let voltage_v = f32::from(bus_raw >> 3) * BUS_LSB_MV / 1000.0;
        let shunt_uv = f32::from(shunt_raw) * SHUNT_LSB_UV;
        let current_ma = shunt_uv / SHUNT_OHMS / 1000.0;

        Ok(PowerReading {
            voltage_v,
            current_ma,
            power_mw: voltage_v * current_ma,
        })
    }
}
