//! ESP32-S3 firmware-specific modules for envmon
//!
//! This crate contains hardware-specific code that cannot compile on desktop
//! targets: GPIO register manipulation for the bridged ranging line, the
//! esp-hal backed clocks, and register-level drivers for the I2C sensors.

#![no_std]

pub mod clock;
pub mod dual_mode_pin;
pub mod sensors;
