use ::bme280::i2c::BME280;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use envmon_core::sensors::EnvironmentalReading;
use envmon_core::{Sensor, SensorError};
use log::{debug, error};

/// BME280 at the primary address (0x76).
pub struct Bme280Sensor<I, D> {
    sensor: BME280<I>,
    delay: D,
}

impl<I: I2c, D: DelayNs> Bme280Sensor<I, D> {
    /// Load calibration data; fails when no BME280 answers.
    pub fn probe(i2c: I, mut delay: D) -> Result<Self, SensorError> {
        let mut sensor = BME280::new_primary(i2c);
        sensor.init(&mut delay).map_err(|e| {
            debug!("BME280 init failed: {:?}", e);
            SensorError::NotDetected { sensor: "BME280" }
        })?;

        Ok(Self { sensor, delay })
    }
}

impl<I: I2c, D: DelayNs> Sensor for Bme280Sensor<I, D> {
    type Reading = EnvironmentalReading;

    fn name(&self) -> &'static str {
        "BME280"
    }

    fn read(&mut self) -> Result<EnvironmentalReading, SensorError> {
        self.sensor
            .measure(&mut self.delay)
            .map(|m| EnvironmentalReading {
                temperature_c: m.temperature,
                humidity_pct: m.humidity,
                // The driver reports pascals.
                pressure_hpa: m.pressure / 100.0,
            })
            .map_err(|e| {
                error!("BME280 measure failed: {:?}", e);
                SensorError::ReadFailed {
                    sensor: "BME280",
                    operation: "measure",
                    details: "Forced-mode conversion or bus transfer failed",
                }
            })
    }
}
