//! Monotonic clocks backed by the esp-hal system timer.
//!
//! The system timer counts in 64 bits; the core expects free-running `u32`
//! counters, so readings are truncated and wrap like any other tick counter.

use envmon_core::timing::{MicrosClock, MillisClock};
use esp_hal::time::Instant;

#[derive(Debug, Clone, Copy, Default)]
pub struct EspClock;

impl MicrosClock for EspClock {
    #[inline]
    fn now_us(&mut self) -> u32 {
        Instant::now().duration_since_epoch().as_micros() as u32
    }
}

impl MillisClock for EspClock {
    #[inline]
    fn now_ms(&mut self) -> u32 {
        Instant::now().duration_since_epoch().as_millis() as u32
    }
}
