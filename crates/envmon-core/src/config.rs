//! Runtime configuration for the monitor.
//!
//! Every field has a default, so a partial TOML/JSON document (or none at
//! all) yields a usable configuration. Call [`MonitorConfig::validate`]
//! before handing a deserialized value to the monitor.

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::ranging::DEFAULT_ECHO_TIMEOUT_US;

/// Default time each screen stays on the display.
pub const DEFAULT_SCREEN_DURATION_MS: u32 = 3_000;

/// Default sleep between scheduler ticks.
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 500;

/// Default hold time for the startup and shutdown messages.
pub const DEFAULT_MESSAGE_HOLD_MS: u32 = 1_000;

/// Longest echo timeout accepted; beyond this the loop would stall visibly.
pub const MAX_ECHO_TIMEOUT_US: u32 = 60_000;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    pub screen_duration_ms: u32,
    pub tick_interval_ms: u32,
    pub echo_timeout_us: u32,
    pub splash_ms: u32,
    pub goodbye_ms: u32,
    /// Distance that fills the distance bar completely.
    pub max_distance_cm: f32,
    /// Power that fills the power bar completely.
    pub max_power_mw: f32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            screen_duration_ms: DEFAULT_SCREEN_DURATION_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            echo_timeout_us: DEFAULT_ECHO_TIMEOUT_US,
            splash_ms: DEFAULT_MESSAGE_HOLD_MS,
            goodbye_ms: DEFAULT_MESSAGE_HOLD_MS,
            max_distance_cm: 100.0,
            max_power_mw: 1_000.0,
        }
    }
}

/// A configuration value the monitor cannot run with.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("tick interval {tick_ms} ms must be shorter than screen duration {screen_ms} ms")]
    TickNotShorterThanScreen { tick_ms: u32, screen_ms: u32 },

    #[error("echo timeout {0} us is above the 60000 us limit")]
    EchoTimeoutTooLong(u32),

    #[error("{field} must be a positive finite number")]
    NotPositive { field: &'static str },
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("screen_duration_ms", self.screen_duration_ms),
            ("tick_interval_ms", self.tick_interval_ms),
            ("echo_timeout_us", self.echo_timeout_us),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero { field });
            }
        }

        if self.tick_interval_ms >= self.screen_duration_ms {
            return Err(ConfigError::TickNotShorterThanScreen {
                tick_ms: self.tick_interval_ms,
                screen_ms: self.screen_duration_ms,
            });
        }

        if self.echo_timeout_us > MAX_ECHO_TIMEOUT_US {
            return Err(ConfigError::EchoTimeoutTooLong(self.echo_timeout_us));
        }

        for (field, value) in [
            ("max_distance_cm", self.max_distance_cm),
            ("max_power_mw", self.max_power_mw),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = MonitorConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.screen_duration_ms, 3_000);
        assert_eq!(config.tick_interval_ms, 500);
        assert_eq!(config.echo_timeout_us, 30_000);
    }

    #[test]
    fn test_rejects_zero_durations() {
        let config = MonitorConfig {
            tick_interval_ms: 0,
            ..MonitorConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Zero {
                field: "tick_interval_ms"
            })
        );

        let config = MonitorConfig {
            echo_timeout_us: 0,
            ..MonitorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Zero { .. })));
    }

    #[test]
    fn test_rejects_inverted_intervals() {
        let config = MonitorConfig {
            screen_duration_ms: 500,
            tick_interval_ms: 500,
            ..MonitorConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TickNotShorterThanScreen {
                tick_ms: 500,
                screen_ms: 500
            })
        );
    }

    #[test]
    fn test_echo_timeout_bounds() {
        let at_limit = MonitorConfig {
            echo_timeout_us: MAX_ECHO_TIMEOUT_US,
            ..MonitorConfig::default()
        };
        assert!(at_limit.validate().is_ok());

        let over = MonitorConfig {
            echo_timeout_us: MAX_ECHO_TIMEOUT_US + 1,
            ..MonitorConfig::default()
        };
        assert_eq!(
            over.validate(),
            Err(ConfigError::EchoTimeoutTooLong(MAX_ECHO_TIMEOUT_US + 1))
        );
    }

    #[test]
    fn test_rejects_non_positive_bar_maxima() {
        let config = MonitorConfig {
            max_power_mw: 0.0,
            ..MonitorConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "max_power_mw"
            })
        );

        let config = MonitorConfig {
            max_distance_cm: f32::NAN,
            ..MonitorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
