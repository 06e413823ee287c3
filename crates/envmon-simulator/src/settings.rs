//! Simulator settings, loaded from an optional TOML file.
//!
//! ```toml
//! [monitor]
//! screen_duration_ms = 3000
//!
//! [hardware]
//! environmental = "bme280"
//! power_sensor = false
//! fail_every = 7
//!
//! [display]
//! snapshot_png = "last-frame.png"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use envmon_core::MonitorConfig;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorSettings {
    pub monitor: MonitorConfig,
    pub hardware: HardwareSettings,
    pub display: DisplaySettings,
}

/// Which environmental sensor the simulated board has fitted.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentalChoice {
    Bme680,
    Bme280,
    None,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HardwareSettings {
    pub environmental: EnvironmentalChoice,
    pub power_sensor: bool,
    /// Every Nth sensor read fails. 0 disables failure injection.
    pub fail_every: u32,
    /// Closest and farthest point of the simulated target's sweep.
    pub distance_min_cm: f32,
    pub distance_max_cm: f32,
    pub sweep_period_s: f32,
    /// Targets beyond this produce no echo.
    pub echo_range_cm: f32,
}

impl Default for HardwareSettings {
    fn default() -> Self {
        Self {
            environmental: EnvironmentalChoice::Bme680,
            power_sensor: true,
            fail_every: 0,
            distance_min_cm: 3.0,
            distance_max_cm: 140.0,
            sweep_period_s: 40.0,
            echo_range_cm: 120.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySettings {
    /// Draw every presented frame to stdout.
    pub terminal: bool,
    /// Write the last rotation frame here on exit.
    pub snapshot_png: Option<PathBuf>,
    /// Pixel scale of the PNG snapshot.
    pub scale: u32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            terminal: true,
            snapshot_png: None,
            scale: 2,
        }
    }
}

impl SimulatorSettings {
    /// Defaults when `path` is `None`, otherwise parse and validate the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            None => Self::default(),
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read settings from {}", path.display()))?;
                toml::from_str(&content)
                    .with_context(|| format!("Failed to parse settings from {}", path.display()))?
            }
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.monitor
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid [monitor] settings: {}", e))?;

        let hw = &self.hardware;
        if !(hw.distance_min_cm >= 0.0 && hw.distance_min_cm < hw.distance_max_cm) {
            anyhow::bail!(
                "distance sweep must satisfy 0 <= min < max (got {} .. {})",
                hw.distance_min_cm,
                hw.distance_max_cm
            );
        }
        if !(hw.sweep_period_s > 0.0) {
            anyhow::bail!("sweep_period_s must be positive (got {})", hw.sweep_period_s);
        }
        if self.display.scale == 0 {
            anyhow::bail!("display scale must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let settings = SimulatorSettings::load(None).unwrap();
        assert_eq!(settings, SimulatorSettings::default());
        assert_eq!(settings.monitor.screen_duration_ms, 3_000);
        assert_eq!(settings.hardware.environmental, EnvironmentalChoice::Bme680);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: SimulatorSettings = toml::from_str(
            r#"
            [monitor]
            screen_duration_ms = 5000

            [hardware]
            environmental = "none"
            fail_every = 3
            "#,
        )
        .unwrap();

        assert_eq!(settings.monitor.screen_duration_ms, 5_000);
        assert_eq!(settings.monitor.tick_interval_ms, 500);
        assert_eq!(settings.hardware.environmental, EnvironmentalChoice::None);
        assert_eq!(settings.hardware.fail_every, 3);
        assert!(settings.hardware.power_sensor);
        assert!(settings.display.terminal);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result: Result<SimulatorSettings, _> = toml::from_str("[hardware]\nsonar = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[display]\nterminal = false\nsnapshot_png = \"frame.png\"").unwrap();

        let settings = SimulatorSettings::load(Some(file.path())).unwrap();
        assert!(!settings.display.terminal);
        assert_eq!(settings.display.snapshot_png, Some(PathBuf::from("frame.png")));
    }

    #[test]
    fn test_invalid_monitor_config_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[monitor]\ntick_interval_ms = 4000").unwrap();

        let err = SimulatorSettings::load(Some(file.path())).unwrap_err();
        assert!(format!("{:#}", err).contains("tick interval"));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = SimulatorSettings::load(Some(Path::new("/nonexistent/envmon.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/envmon.toml"));
    }

    #[test]
    fn test_rejects_inverted_sweep() {
        let mut settings = SimulatorSettings::default();
        settings.hardware.distance_min_cm = 50.0;
        settings.hardware.distance_max_cm = 10.0;
        assert!(settings.validate().is_err());
    }
}
