//! HC-SR04 ultrasonic ranging over a single bridged trigger/echo line.
//!
//! With the module's TRIG and ECHO pads soldered together, one GPIO line
//! first drives the 10 µs trigger pulse and is then switched to input to time
//! the echo pulse. The line must be flipped to input before the module raises
//! echo, which happens after it has emitted its 40 kHz burst; that window is
//! captured by [`MAX_MODE_SWITCH_LATENCY_US`].
//!
//! Every wait is a bounded busy-poll against a [`MicrosClock`]; a missing or
//! stuck echo produces [`RangingResult::NoEcho`] instead of blocking.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use log::{debug, warn};

use crate::timing::{MicrosClock, deadline_passed, ticks_elapsed};

/// Low time before the trigger pulse, establishing a known baseline.
pub const TRIGGER_SETTLE_US: u32 = 2;

/// Trigger pulse width required by the HC-SR04 timing contract.
pub const TRIGGER_PULSE_US: u32 = 10;

/// Default deadline for each echo edge (~5 m round trip).
pub const DEFAULT_ECHO_TIMEOUT_US: u32 = 30_000;

/// Longest tolerable gap between releasing the trigger and listening.
///
/// The module sends 8 cycles at 40 kHz (200 µs) before echo goes high. A
/// direction switch slower than this can miss the rising edge entirely.
pub const MAX_MODE_SWITCH_LATENCY_US: u32 = 200;

/// Speed of sound at ~20 °C.
pub const SPEED_OF_SOUND_CM_PER_US: f32 = 0.0343;

/// One-way centimeters per microsecond of echo (the pulse covers the round trip).
pub const CM_PER_ECHO_US: f32 = SPEED_OF_SOUND_CM_PER_US / 2.0;

const CM_PER_INCH: f32 = 2.54;

/// Converts an echo pulse width to a one-way distance in centimeters.
#[inline]
pub fn distance_cm(pulse_width_us: u32) -> f32 {
    pulse_width_us as f32 * CM_PER_ECHO_US
}

/// A GPIO line whose direction can be changed at runtime.
pub trait DualMode {
    /// Enable the output driver.
    fn set_as_output(&mut self);

    /// Disable the output driver so the line can be read.
    fn set_as_input(&mut self);
}

/// Which echo edge a measurement gave up waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoEdge {
    /// Echo never went high: nothing in range, or the switch was too slow.
    Rising,
    /// Echo never went low: the module is stuck or misbehaving.
    Falling,
}

/// A successful range measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance {
    centimeters: f32,
    pulse_width_us: u32,
}

impl Distance {
    pub fn from_pulse_width(pulse_width_us: u32) -> Self {
        Self {
            centimeters: distance_cm(pulse_width_us),
            pulse_width_us,
        }
    }

    pub fn centimeters(&self) -> f32 {
        self.centimeters
    }

    pub fn inches(&self) -> f32 {
        self.centimeters / CM_PER_INCH
    }

    pub fn pulse_width_us(&self) -> u32 {
        self.pulse_width_us
    }

    pub fn proximity(&self) -> Proximity {
        Proximity::classify(self.centimeters)
    }
}

/// Coarse distance bands shown under the distance bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proximity {
    VeryClose,
    Close,
    Near,
    Far,
}

impl Proximity {
    pub fn classify(centimeters: f32) -> Self {
        if centimeters < 10.0 {
            Self::VeryClose
        } else if centimeters < 30.0 {
            Self::Close
        } else if centimeters < 50.0 {
            Self::Near
        } else {
            Self::Far
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryClose => "VERY CLOSE!",
            Self::Close => "CLOSE",
            Self::Near => "NEAR",
            Self::Far => "FAR",
        }
    }
}

/// Outcome of one trigger-and-listen cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangingResult {
    Distance(Distance),
    NoEcho(EchoEdge),
}

impl RangingResult {
    pub fn distance(&self) -> Option<Distance> {
        match self {
            Self::Distance(d) => Some(*d),
            Self::NoEcho(_) => None,
        }
    }
}

/// Anything that can produce a single range reading on demand.
pub trait RangeFinder {
    type Error: core::fmt::Debug;

    fn measure(&mut self) -> Result<RangingResult, Self::Error>;
}

/// HC-SR04 driver for a module with TRIG and ECHO bridged onto one line.
///
/// The driver owns the line for its whole lifetime, so no other code can
/// touch it mid-measurement.
pub struct BridgedRanger<P, C, D> {
    pin: P,
    clock: C,
    delay: D,
    echo_timeout_us: u32,
}

impl<P, C, D> BridgedRanger<P, C, D>
where
    P: OutputPin + InputPin + DualMode,
    C: MicrosClock,
    D: DelayNs,
{
    pub fn new(pin: P, clock: C, delay: D) -> Self {
        Self {
            pin,
            clock,
            delay,
            echo_timeout_us: DEFAULT_ECHO_TIMEOUT_US,
        }
    }

    /// Override the per-edge echo deadline.
    pub fn with_echo_timeout(mut self, echo_timeout_us: u32) -> Self {
        self.echo_timeout_us = echo_timeout_us;
        self
    }

    pub fn echo_timeout_us(&self) -> u32 {
        self.echo_timeout_us
    }

    /// Give back the line, clock and delay.
    pub fn release(self) -> (P, C, D) {
        (self.pin, self.clock, self.delay)
    }

    /// Drive the line low, then a single trigger pulse, leaving it low.
    fn send_trigger(&mut self) -> Result<(), <P as ErrorType>::Error> {
        self.pin.set_as_output();
        self.pin.set_low()?;
        self.delay.delay_us(TRIGGER_SETTLE_US);
        self.pin.set_high()?;
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.pin.set_low()
    }

    /// Poll until the line reads `high`, or `echo_timeout_us` after `since`.
    ///
    /// Returns the timestamp at which the level was observed.
    fn wait_for_level(
        &mut self,
        high: bool,
        since: u32,
    ) -> Result<Option<u32>, <P as ErrorType>::Error> {
        loop {
            if self.pin.is_high()? == high {
                return Ok(Some(self.clock.now_us()));
            }
            if deadline_passed(self.clock.now_us(), since, self.echo_timeout_us) {
                return Ok(None);
            }
        }
    }

    /// Run one trigger-and-listen cycle.
    ///
    /// Timeouts are reported as [`RangingResult::NoEcho`]; only a GPIO fault
    /// returns `Err`. No retries are attempted.
    pub fn measure(&mut self) -> Result<RangingResult, <P as ErrorType>::Error> {
        self.send_trigger()?;
        let trigger_released = self.clock.now_us();

        self.pin.set_as_input();
        let listen_start = self.clock.now_us();

        let switch_latency_us = ticks_elapsed(listen_start, trigger_released);
        if switch_latency_us > MAX_MODE_SWITCH_LATENCY_US {
            warn!(
                "Echo line took {} us to switch to input (limit {} us), rising edge may be missed",
                switch_latency_us, MAX_MODE_SWITCH_LATENCY_US
            );
        }

        let Some(pulse_start) = self.wait_for_level(true, listen_start)? else {
            debug!("No echo within {} us", self.echo_timeout_us);
            return Ok(RangingResult::NoEcho(EchoEdge::Rising));
        };

        let Some(pulse_end) = self.wait_for_level(false, pulse_start)? else {
            debug!("Echo held high past {} us", self.echo_timeout_us);
            return Ok(RangingResult::NoEcho(EchoEdge::Falling));
        };

        let distance = Distance::from_pulse_width(ticks_elapsed(pulse_end, pulse_start));
        debug!(
            "Echo pulse {} us -> {} cm",
            distance.pulse_width_us(),
            distance.centimeters()
        );
        Ok(RangingResult::Distance(distance))
    }
}

impl<P, C, D> RangeFinder for BridgedRanger<P, C, D>
where
    P: OutputPin + InputPin + DualMode,
    <P as ErrorType>::Error: core::fmt::Debug,
    C: MicrosClock,
    D: DelayNs,
{
    type Error = <P as ErrorType>::Error;

    fn measure(&mut self) -> Result<RangingResult, Self::Error> {
        BridgedRanger::measure(self)
    }
}
