//! Simulated board: host clocks, a bridged HC-SR04 line, and I2C sensors.
//!
//! Everything here runs against the real wall clock so the core's busy
//! polls and delays behave as they would on the device.

use std::convert::Infallible;
use std::f32::consts::TAU;
use std::thread;
use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use envmon_core::ranging::DualMode;
use envmon_core::sensors::probe::EnvironmentalKind;
use envmon_core::sensors::{EnvironmentalReading, PowerReading, Sensor, SensorError};
use envmon_core::timing::{MicrosClock, MillisClock};
use log::debug;

use crate::settings::{EnvironmentalChoice, HardwareSettings};

// ---------------------------------------------------------------------------
// Clocks and delays
// ---------------------------------------------------------------------------

/// Free-running counters derived from one host `Instant`.
///
/// The `as u32` truncation makes both counters wrap like the hardware ones.
#[derive(Debug, Clone, Copy)]
pub struct HostClock {
    epoch: Instant,
}

impl HostClock {
    pub fn new(epoch: Instant) -> Self {
        Self { epoch }
    }
}

/// Time source for the simulated board: a µs counter for echo edges and
/// seconds since power-up for slowly varying signals.
pub trait BoardClock: MicrosClock {
    fn seconds(&self) -> f32;
}

impl BoardClock for HostClock {
    fn seconds(&self) -> f32 {
        self.epoch.elapsed().as_secs_f32()
    }
}

impl MicrosClock for HostClock {
    fn now_us(&mut self) -> u32 {
        self.epoch.elapsed().as_micros() as u32
    }
}

impl MillisClock for HostClock {
    fn now_ms(&mut self) -> u32 {
        self.epoch.elapsed().as_millis() as u32
    }
}

/// Spins for sub-millisecond waits, sleeps for anything longer.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostDelay;

impl DelayNs for HostDelay {
    fn delay_ns(&mut self, ns: u32) {
        let wait = Duration::from_nanos(u64::from(ns));
        if wait >= Duration::from_millis(1) {
            thread::sleep(wait);
            return;
        }
        let start = Instant::now();
        while start.elapsed() < wait {
            std::hint::spin_loop();
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

// ---------------------------------------------------------------------------
// Target sweep
// ---------------------------------------------------------------------------

/// Triangle wave between `distance_min_cm` and `distance_max_cm`.
fn swept_distance_cm(hw: &HardwareSettings, t_secs: f32) -> f32 {
    let phase = (t_secs / hw.sweep_period_s).fract();
    let tri = if phase < 0.5 { phase * 2.0 } else { 2.0 - phase * 2.0 };
    hw.distance_min_cm + tri * (hw.distance_max_cm - hw.distance_min_cm)
}

/// Echo pulse the module would produce for a target at `cm`, if any.
fn echo_width_us(cm: f32, range_cm: f32) -> Option<u32> {
    (cm <= range_cm).then(|| (cm / envmon_core::ranging::CM_PER_ECHO_US) as u32)
}

// ---------------------------------------------------------------------------
// Bridged trigger/echo line
// ---------------------------------------------------------------------------

/// Time the simulated module spends on its 40 kHz burst before raising echo.
const BURST_US: u32 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineMode {
    Output,
    Input,
}

/// A GPIO line wired to a simulated HC-SR04 with TRIG and ECHO bridged.
///
/// A trigger pulse arms the module; once the line is released to input,
/// echo goes high after [`BURST_US`] and stays high for the round-trip time
/// of the current target distance.
pub struct SimulatedEchoLine<C = HostClock> {
    clock: C,
    hardware: HardwareSettings,
    mode: LineMode,
    driven_high: bool,
    triggered: bool,
    echo: Option<(u32, Option<u32>)>,
}

impl<C: BoardClock> SimulatedEchoLine<C> {
    pub fn new(clock: C, hardware: HardwareSettings) -> Self {
        Self {
            clock,
            hardware,
            mode: LineMode::Input,
            driven_high: false,
            triggered: false,
            echo: None,
        }
    }
}

impl<C> ErrorType for SimulatedEchoLine<C> {
    type Error = Infallible;
}

impl<C: BoardClock> DualMode for SimulatedEchoLine<C> {
    fn set_as_output(&mut self) {
        self.mode = LineMode::Output;
        self.echo = None;
    }

    fn set_as_input(&mut self) {
        self.mode = LineMode::Input;
        if !std::mem::take(&mut self.triggered) {
            return;
        }

        let now = self.clock.now_us();
        let cm = swept_distance_cm(&self.hardware, self.clock.seconds());
        let width = echo_width_us(cm, self.hardware.echo_range_cm);
        debug!("Simulated target at {:.1} cm, echo {:?} us", cm, width);
        self.echo = Some((now.wrapping_add(BURST_US), width));
    }
}

impl<C: BoardClock> OutputPin for SimulatedEchoLine<C> {
    fn set_low(&mut self) -> Result<(), Infallible> {
        if self.mode == LineMode::Output && self.driven_high {
            self.triggered = true;
        }
        self.driven_high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.driven_high = true;
        Ok(())
    }
}

impl<C: BoardClock> InputPin for SimulatedEchoLine<C> {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        if self.mode == LineMode::Output {
            return Ok(self.driven_high);
        }
        let Some((rise, width)) = self.echo else {
            return Ok(false);
        };
        let Some(width) = width else {
            return Ok(false);
        };

        // Signed distance from the rising edge, wrap-safe.
        let since_rise = self.clock.now_us().wrapping_sub(rise) as i32;
        Ok(since_rise >= 0 && (since_rise as u32) < width)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

// ---------------------------------------------------------------------------
// I2C sensors
// ---------------------------------------------------------------------------

/// Counts reads and fails every `fail_every`th one.
#[derive(Debug)]
struct FailureInjector {
    fail_every: u32,
    reads: u32,
}

impl FailureInjector {
    fn new(fail_every: u32) -> Self {
        Self {
            fail_every,
            reads: 0,
        }
    }

    fn next_fails(&mut self) -> bool {
        self.reads = self.reads.wrapping_add(1);
        self.fail_every != 0 && self.reads % self.fail_every == 0
    }
}

/// BME680 or BME280 with slowly drifting readings.
#[derive(Debug)]
pub struct SimulatedEnvironmental {
    kind: EnvironmentalKind,
    clock: HostClock,
    failures: FailureInjector,
}

impl SimulatedEnvironmental {
    /// Answers only if the settings say this part is fitted.
    pub fn probe(
        kind: EnvironmentalKind,
        clock: HostClock,
        hardware: &HardwareSettings,
    ) -> Result<Self, SensorError> {
        let fitted = matches!(
            (kind, hardware.environmental),
            (EnvironmentalKind::Bme680, EnvironmentalChoice::Bme680)
                | (EnvironmentalKind::Bme280, EnvironmentalChoice::Bme280)
        );
        if !fitted {
            return Err(SensorError::NotDetected {
                sensor: kind.label(),
            });
        }

        Ok(Self {
            kind,
            clock,
            failures: FailureInjector::new(hardware.fail_every),
        })
    }
}

impl Sensor for SimulatedEnvironmental {
    type Reading = EnvironmentalReading;

    fn name(&self) -> &'static str {
        self.kind.label()
    }

    fn read(&mut self) -> Result<EnvironmentalReading, SensorError> {
        if self.failures.next_fails() {
            return Err(SensorError::ReadFailed {
                sensor: self.kind.label(),
                operation: "read measurement",
                details: "injected failure",
            });
        }

        let t = self.clock.seconds();
        Ok(EnvironmentalReading {
            temperature_c: 23.0 + 3.0 * (t * TAU / 60.0).sin() + 0.5 * (t / 7.0).cos(),
            humidity_pct: 50.0 + 10.0 * (t * TAU / 90.0).sin(),
            pressure_hpa: 1013.0 + 4.0 * (t * TAU / 300.0).sin(),
        })
    }
}

/// INA219 on a load that pulses every few seconds.
#[derive(Debug)]
pub struct SimulatedPowerMonitor {
    clock: HostClock,
    failures: FailureInjector,
}

impl SimulatedPowerMonitor {
    pub fn probe(clock: HostClock, hardware: &HardwareSettings) -> Result<Self, SensorError> {
        if !hardware.power_sensor {
            return Err(SensorError::NotDetected { sensor: "INA219" });
        }
        Ok(Self {
            clock,
            failures: FailureInjector::new(hardware.fail_every),
        })
    }
}

impl Sensor for SimulatedPowerMonitor {
    type Reading = PowerReading;

    fn name(&self) -> &'static str {
        "INA219"
    }

    fn read(&mut self) -> Result<PowerReading, SensorError> {
        if self.failures.next_fails() {
            return Err(SensorError::Timeout {
                sensor: "INA219",
                operation: "read current",
            });
        }

        let t = self.clock.seconds();
        let voltage_v = 5.0 - 0.05 * (t * TAU / 11.0).sin();
        let current_ma = 120.0 + 80.0 * (t * TAU / 13.0).sin();
        Ok(PowerReading {
            voltage_v,
            current_ma,
            power_mw: voltage_v * current_ma,
        })
    }
}
