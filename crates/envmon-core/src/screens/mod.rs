//! The four screens of the monitor rotation.
//!
//! A screen is a plain render function: it clears the surface, draws its
//! title and body from the current sensor state, then presents. Sensor
//! failures are turned into on-screen text here and never reach the
//! scheduler. Only surface errors are returned.

pub mod constants;
mod distance;
mod environment;
mod graph;
mod power;

use crate::config::MonitorConfig;
use crate::ranging::RangeFinder;
use crate::sensors::{EnvironmentalReading, PowerReading, Sensor, SensorHub};
use crate::surface::Surface;

use constants::{
    DISPLAY_WIDTH_PX, DISTANCE_TITLE_X, ENV_TITLE_X, GRAPH_TITLE_X, POWER_TITLE_X, TITLE_Y,
};

/// Identifies a screen in the rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenId {
    Environment,
    Distance,
    Power,
    TemperatureGraph,
}

impl ScreenId {
    /// Display order, starting with the screen shown after the splash.
    pub const ROTATION: [ScreenId; 4] = [
        Self::Environment,
        Self::Distance,
        Self::Power,
        Self::TemperatureGraph,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Environment => "ENV MONITOR",
            Self::Distance => "DISTANCE",
            Self::Power => "POWER",
            Self::TemperatureGraph => "TEMP GRAPH",
        }
    }

    const fn title_x(self) -> i32 {
        match self {
            Self::Environment => ENV_TITLE_X,
            Self::Distance => DISTANCE_TITLE_X,
            Self::Power => POWER_TITLE_X,
            Self::TemperatureGraph => GRAPH_TITLE_X,
        }
    }
}

/// Render one full frame of `screen`.
///
/// The environment screen is the only one that writes to the temperature
/// history; the graph screen only reads it.
pub fn render<S, E, R, P>(
    screen: ScreenId,
    surface: &mut S,
    sensors: &mut SensorHub<E, R, P>,
    config: &MonitorConfig,
) -> Result<(), S::Error>
where
    S: Surface,
    E: Sensor<Reading = EnvironmentalReading>,
    R: RangeFinder,
    P: Sensor<Reading = PowerReading>,
{
    surface.clear()?;
    surface.draw_text(screen.title(), screen.title_x(), TITLE_Y)?;

    match screen {
        ScreenId::Environment => environment::draw(
            surface,
            sensors.environmental.as_mut(),
            &mut sensors.temperature_history,
        )?,
        ScreenId::Distance => distance::draw(surface, &mut sensors.ranger, config.max_distance_cm)?,
        ScreenId::Power => power::draw(surface, sensors.power.as_mut(), config.max_power_mw)?,
        ScreenId::TemperatureGraph => graph::draw(surface, &sensors.temperature_history)?,
    }

    surface.present()
}

/// Boot message, shown before the capability probes run.
pub fn show_initializing<S: Surface>(surface: &mut S) -> Result<(), S::Error> {
    show_message(surface, constants::INIT_TEXT, constants::INIT_POS)
}

/// Show a single line of text on an otherwise blank display.
pub fn show_message<S: Surface>(
    surface: &mut S,
    text: &str,
    at: (i32, i32),
) -> Result<(), S::Error> {
    surface.clear()?;
    surface.draw_text(text, at.0, at.1)?;
    surface.present()
}

/// Blank the display.
pub fn blank<S: Surface>(surface: &mut S) -> Result<(), S::Error> {
    surface.clear()?;
    surface.present()
}

/// Width of a horizontal bar showing `value` out of `full_scale`.
///
/// Negative values draw nothing; anything at or above `full_scale` fills
/// the display width.
pub(crate) fn bar_width(value: f32, full_scale: f32) -> u32 {
    if full_scale.is_nan() || full_scale <= 0.0 {
        return 0;
    }
    let clamped = value.clamp(0.0, full_scale);
    (clamped * DISPLAY_WIDTH_PX as f32 / full_scale) as u32
}


/// Sensor doubles shared by the screen and monitor tests.
#[cfg(test)]
pub(crate) mod doubles {
    use crate::ranging::{Distance, EchoEdge, RangeFinder, RangingResult};
    use crate::sensors::{EnvironmentalReading, PowerReading, Sensor, SensorError};

    pub struct FixedEnv(pub f32);

    impl Sensor for FixedEnv {
        type Reading = EnvironmentalReading;

        fn name(&self) -> &'static str {
            "BME280"
        }

        fn read(&mut self) -> Result<EnvironmentalReading, SensorError> {
            Ok(EnvironmentalReading {
                temperature_c: self.0,
                humidity_pct: 45.3,
                pressure_hpa: 1013.4,
            })
        }
    }

    pub struct BrokenEnv;

    impl Sensor for BrokenEnv {
        type Reading = EnvironmentalReading;

        fn name(&self) -> &'static str {
            "BME680"
        }

        fn read(&mut self) -> Result<EnvironmentalReading, SensorError> {
            Err(SensorError::ReadFailed {
                sensor: "BME680",
                operation: "read measurement",
                details: "bus error",
            })
        }
    }

    pub struct FixedPower(pub PowerReading);

    impl Sensor for FixedPower {
        type Reading = PowerReading;

        fn name(&self) -> &'static str {
            "INA219"
        }

        fn read(&mut self) -> Result<PowerReading, SensorError> {
            Ok(self.0)
        }
    }

    pub struct BrokenPower;

    impl Sensor for BrokenPower {
        type Reading = PowerReading;

        fn name(&self) -> &'static str {
            "INA219"
        }

        fn read(&mut self) -> Result<PowerReading, SensorError> {
            Err(SensorError::Timeout {
                sensor: "INA219",
                operation: "read bus voltage",
            })
        }
    }

    /// Range finder that always reports the same echo pulse, or none.
    pub struct FixedEcho(pub Option<u32>);

    impl RangeFinder for FixedEcho {
        type Error = ();

        fn measure(&mut self) -> Result<RangingResult, ()> {
            Ok(match self.0 {
                Some(width) => RangingResult::Distance(Distance::from_pulse_width(width)),
                None => RangingResult::NoEcho(EchoEdge::Rising),
            })
        }
    }

    pub struct FaultyLine;

    impl RangeFinder for FaultyLine {
        type Error = ();

        fn measure(&mut self) -> Result<RangingResult, ()> {
            Err(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::doubles::*;
    use super::recording::{DrawOp, RecordingSurface};
    use super::*;
    use crate::sensors::NotFitted;

    #[test]
    fn test_bar_width_scaling() {
        assert_eq!(bar_width(50.0, 100.0), 64);
        assert_eq!(bar_width(100.0, 100.0), 128);
        assert_eq!(bar_width(250.0, 100.0), 128);
        assert_eq!(bar_width(-5.0, 1000.0), 0);
        assert_eq!(bar_width(19.99, 100.0), 25);
        assert_eq!(bar_width(10.0, 0.0), 0);
    }

    #[test]
    fn test_every_screen_clears_titles_and_presents() {
        let mut sensors = SensorHub::new(
            Some(FixedEnv(21.0)),
            FixedEcho(Some(1166)),
            None::<BrokenPower>,
        );
        let config = MonitorConfig::default();

        for screen in ScreenId::ROTATION {
            let mut surface = RecordingSurface::new();
            render(screen, &mut surface, &mut sensors, &config).unwrap();

            assert_eq!(surface.ops.first(), Some(&DrawOp::Clear), "{:?}", screen);
            assert_eq!(surface.ops.last(), Some(&DrawOp::Present), "{:?}", screen);
            assert_eq!(surface.presents(), 1);
            assert_eq!(surface.texts()[0], screen.title());
        }
    }

    #[test]
    fn test_titles_positions() {
        let mut sensors = SensorHub::new(None::<NotFitted>, FixedEcho(None), None::<BrokenPower>);
        let config = MonitorConfig::default();
        let expected = [
            (ScreenId::Environment, 20),
            (ScreenId::Distance, 30),
            (ScreenId::Power, 40),
            (ScreenId::TemperatureGraph, 25),
        ];

        for (screen, x) in expected {
            let mut surface = RecordingSurface::new();
            render(screen, &mut surface, &mut sensors, &config).unwrap();
            assert!(surface.has_text_at(screen.title(), x, 0), "{:?}", screen);
        }
    }

    #[test]
    fn test_environment_feeds_graph() {
        let mut sensors = SensorHub::new(
            Some(FixedEnv(21.7)),
            FixedEcho(None),
            None::<BrokenPower>,
        );
        let config = MonitorConfig::default();
        let mut surface = RecordingSurface::new();

        render(ScreenId::TemperatureGraph, &mut surface, &mut sensors, &config).unwrap();
        assert!(surface.texts().contains(&"Collecting"));

        render(ScreenId::Environment, &mut surface, &mut sensors, &config).unwrap();
        render(ScreenId::Environment, &mut surface, &mut sensors, &config).unwrap();
        assert_eq!(sensors.temperature_history.len(), 2);

        surface.take();
        render(ScreenId::TemperatureGraph, &mut surface, &mut sensors, &config).unwrap();
        assert!(!surface.texts().contains(&"Collecting"));
        assert_eq!(surface.lines().len(), 1);
    }

    #[test]
    fn test_initializing_message_is_top_left() {
        let mut surface = RecordingSurface::new();
        show_initializing(&mut surface).unwrap();
        assert_eq!(
            surface.ops,
            [
                DrawOp::Clear,
                DrawOp::Text("Initializing...".into(), 0, 0),
                DrawOp::Present,
            ]
        );
    }

    #[test]
    fn test_show_message_and_blank() {
        let mut surface = RecordingSurface::new();
        show_message(&mut surface, constants::SPLASH_TEXT, constants::SPLASH_POS).unwrap();
        blank(&mut surface).unwrap();

        assert_eq!(
            surface.ops,
            [
                DrawOp::Clear,
                DrawOp::Text("Ready!".into(), 40, 28),
                DrawOp::Present,
                DrawOp::Clear,
                DrawOp::Present,
            ]
        );
    }
}
