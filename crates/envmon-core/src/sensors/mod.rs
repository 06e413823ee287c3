//! Sensor collaborators consumed by the screens.
//!
//! Register-level protocols live with the platform (firmware or simulator);
//! the core only sees a blocking [`Sensor::read`] that returns physical
//! values or a [`SensorError`]. Which sensors exist is decided once at
//! startup by the probes in [`probe`].

mod hub;
pub mod probe;

pub use hub::SensorHub;
pub use probe::{DetectedEnvironmental, EnvironmentalKind, NotFitted};

use thiserror_no_std::Error;

/// Why a sensor could not deliver a reading.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    #[error("{sensor} not detected")]
    NotDetected { sensor: &'static str },

    #[error("{sensor} failed to {operation}: {details}")]
    ReadFailed {
        sensor: &'static str,
        operation: &'static str,
        details: &'static str,
    },

    #[error("{sensor} timed out during {operation}")]
    Timeout {
        sensor: &'static str,
        operation: &'static str,
    },
}

impl SensorError {
    /// Name of the sensor that failed.
    pub const fn sensor(&self) -> &'static str {
        match self {
            Self::NotDetected { sensor }
            | Self::ReadFailed { sensor, .. }
            | Self::Timeout { sensor, .. } => sensor,
        }
    }
}

/// Temperature, humidity and pressure from a BME280/BME680-class sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentalReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub pressure_hpa: f32,
}

impl EnvironmentalReading {
    /// Whole degrees, truncated toward zero, as stored in the trend history.
    ///
    /// `None` for NaN or infinite temperatures, which have no whole value.
    pub fn temperature_whole_degrees(&self) -> Option<i32> {
        self.temperature_c.is_finite().then_some(self.temperature_c as i32)
    }
}

/// Bus voltage, current and power from an INA219-class monitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerReading {
    pub voltage_v: f32,
    pub current_ma: f32,
    pub power_mw: f32,
}

/// A sensor that produces typed readings on demand.
pub trait Sensor {
    type Reading;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn read(&mut self) -> Result<Self::Reading, SensorError>;
}

impl<T: Sensor + ?Sized> Sensor for &mut T {
    type Reading = T::Reading;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn read(&mut self) -> Result<Self::Reading, SensorError> {
        (**self).read()
    }
}
