//! Hardware-independent core library for envmon
//!
//! This crate contains the platform-agnostic parts of the envmon
//! environmental monitor: the bridged-pin HC-SR04 ranging driver, the
//! temperature history, the screen scheduler, the screens themselves, and
//! the sensor and drawing-surface traits they are written against.
//!
//! It is `#![no_std]` and allocation-free so it compiles on both embedded
//! targets (ESP32-S3) and desktop hosts (for the simulator and tests).

#![no_std]

pub mod config;
pub mod framebuffer;
pub mod history;
pub mod monitor;
pub mod ranging;
pub mod scheduler;
pub mod screens;
pub mod sensors;
pub mod surface;
pub mod timing;

pub use config::{ConfigError, MonitorConfig};
pub use monitor::Monitor;
pub use ranging::{BridgedRanger, DualMode, RangeFinder, RangingResult};
pub use screens::ScreenId;
pub use sensors::{Sensor, SensorError, SensorHub};
pub use surface::{GraphicsSurface, Surface};
