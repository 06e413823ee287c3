//! One-shot capability probes run during startup.
//!
//! Each probe tries to bring a sensor up exactly once and hands back an
//! immutable selection. A sensor that is missing at boot stays missing; the
//! screens render it as "not fitted" instead of retrying every tick.

use log::{info, warn};

use super::{EnvironmentalReading, Sensor, SensorError};

/// Which environmental sensor family answered the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentalKind {
    Bme680,
    Bme280,
}

impl EnvironmentalKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bme680 => "BME680",
            Self::Bme280 => "BME280",
        }
    }
}

/// The environmental sensor chosen at startup.
///
/// BME680 is preferred; BME280 is the fallback.
pub enum DetectedEnvironmental<A, B> {
    Bme680(A),
    Bme280(B),
}

impl<A, B> DetectedEnvironmental<A, B>
where
    A: Sensor<Reading = EnvironmentalReading>,
    B: Sensor<Reading = EnvironmentalReading>,
{
    /// Try the BME680 first, then the BME280. `None` when neither answers.
    ///
    /// Each constructor is called at most once; the BME280 one is skipped
    /// when the BME680 comes up.
    pub fn probe(
        bme680: impl FnOnce() -> Result<A, SensorError>,
        bme280: impl FnOnce() -> Result<B, SensorError>,
    ) -> Option<Self> {
        match bme680() {
            Ok(sensor) => {
                info!("BME680 initialized");
                return Some(Self::Bme680(sensor));
            }
            Err(e) => warn!("BME680 unavailable: {}", e),
        }

        match bme280() {
            Ok(sensor) => {
                info!("BME280 initialized");
                Some(Self::Bme280(sensor))
            }
            Err(e) => {
                warn!("BME280 unavailable: {}", e);
                info!("No environmental sensor fitted");
                None
            }
        }
    }

    pub fn kind(&self) -> EnvironmentalKind {
        match self {
            Self::Bme680(_) => EnvironmentalKind::Bme680,
            Self::Bme280(_) => EnvironmentalKind::Bme280,
        }
    }
}

impl<A, B> Sensor for DetectedEnvironmental<A, B>
where
    A: Sensor<Reading = EnvironmentalReading>,
    B: Sensor<Reading = EnvironmentalReading>,
{
    type Reading = EnvironmentalReading;

    fn name(&self) -> &'static str {
        match self {
            Self::Bme680(sensor) => sensor.name(),
            Self::Bme280(sensor) => sensor.name(),
        }
    }

    fn read(&mut self) -> Result<EnvironmentalReading, SensorError> {
        match self {
            Self::Bme680(sensor) => sensor.read(),
            Self::Bme280(sensor) => sensor.read(),
        }
    }
}

/// Probe an optional sensor once. `None` disables the feature for good.
pub fn probe_optional<S: Sensor>(
    name: &'static str,
    init: impl FnOnce() -> Result<S, SensorError>,
) -> Option<S> {
    match init() {
        Ok(sensor) => {
            info!("{} initialized", name);
            Some(sensor)
        }
        Err(e) => {
            info!("{} not fitted: {}", name, e);
            None
        }
    }
}

/// Placeholder for a sensor slot a board cannot populate.
///
/// Uninhabited, so a probe for it can only fail.
#[derive(Debug)]
pub enum NotFitted {}

impl Sensor for NotFitted {
    type Reading = EnvironmentalReading;

    fn name(&self) -> &'static str {
        match *self {}
    }

    fn read(&mut self) -> Result<EnvironmentalReading, SensorError> {
        match *self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct Fixed(&'static str, f32);

    impl Sensor for Fixed {
        type Reading = EnvironmentalReading;

        fn name(&self) -> &'static str {
            self.0
        }

        fn read(&mut self) -> Result<EnvironmentalReading, SensorError> {
            Ok(EnvironmentalReading {
                temperature_c: self.1,
                humidity_pct: 45.0,
                pressure_hpa: 1013.0,
            })
        }
    }

    fn missing(sensor: &'static str) -> Result<Fixed, SensorError> {
        Err(SensorError::NotDetected { sensor })
    }

    #[test]
    fn test_prefers_bme680() {
        let fallback_tried = Cell::new(false);
        let detected = DetectedEnvironmental::probe(
            || Ok(Fixed("BME680", 21.0)),
            || {
                fallback_tried.set(true);
                Ok(Fixed("BME280", 19.0))
            },
        )
        .expect("a sensor should be selected");

        assert_eq!(detected.kind(), EnvironmentalKind::Bme680);
        assert!(!fallback_tried.get(), "BME280 must not be probed");
    }

    #[test]
    fn test_falls_back_to_bme280() {
        let mut detected =
            DetectedEnvironmental::probe(|| missing("BME680"), || Ok(Fixed("BME280", 19.5)))
                .unwrap();

        assert_eq!(detected.kind(), EnvironmentalKind::Bme280);
        assert_eq!(detected.name(), "BME280");
        assert_eq!(detected.read().unwrap().temperature_c, 19.5);
    }

    #[test]
    fn test_none_when_nothing_answers() {
        let detected = DetectedEnvironmental::probe(|| missing("BME680"), || missing("BME280"));
        assert!(detected.is_none());
    }

    #[test]
    fn test_probe_runs_constructors_once() {
        let calls = Cell::new(0);
        let _ = DetectedEnvironmental::probe(
            || {
                calls.set(calls.get() + 1);
                missing("BME680")
            },
            || {
                calls.set(calls.get() + 1);
                missing("BME280")
            },
        );
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_not_fitted_slot_falls_through() {
        let detected = DetectedEnvironmental::<NotFitted, Fixed>::probe(
            || Err(SensorError::NotDetected { sensor: "BME680" }),
            || Ok(Fixed("BME280", 20.0)),
        );
        assert_eq!(
            detected.map(|d| d.kind()),
            Some(EnvironmentalKind::Bme280)
        );
    }

    #[test]
    fn test_probe_optional() {
        assert!(probe_optional("INA219", || missing("INA219")).is_none());
        assert!(probe_optional("INA219", || Ok(Fixed("INA219", 0.0))).is_some());
    }
}
