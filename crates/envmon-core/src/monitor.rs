//! The monitor application: splash, screen rotation, shutdown.
//!
//! [`Monitor`] ties the scheduler, the sensors and the surface together.
//! Platform front-ends build the collaborators, probe sensors, and then call
//! [`Monitor::splash`], [`Monitor::run`] and [`Monitor::shutdown`] in order.

use embedded_hal::delay::DelayNs;
use log::{error, info};

use crate::config::{ConfigError, MonitorConfig};
use crate::ranging::RangeFinder;
use crate::scheduler::{ScreenSet, Scheduler, TickOutcome};
use crate::screens::constants::{GOODBYE_POS, GOODBYE_TEXT, SPLASH_POS, SPLASH_TEXT};
use crate::screens::{self, ScreenId};
use crate::sensors::{EnvironmentalReading, PowerReading, Sensor, SensorHub};
use crate::surface::Surface;
use crate::timing::MillisClock;

pub struct Monitor<S, E, R, P> {
    surface: S,
    sensors: SensorHub<E, R, P>,
    scheduler: Scheduler<ScreenId, 4>,
    config: MonitorConfig,
}

impl<S, E, R, P> Monitor<S, E, R, P>
where
    S: Surface,
    E: Sensor<Reading = EnvironmentalReading>,
    R: RangeFinder,
    P: Sensor<Reading = PowerReading>,
{
    /// Build a monitor showing the first screen from `now_ms`.
    pub fn new(
        surface: S,
        sensors: SensorHub<E, R, P>,
        config: MonitorConfig,
        now_ms: u32,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let scheduler = Scheduler::new(
            ScreenSet::new(ScreenId::ROTATION),
            config.screen_duration_ms,
            now_ms,
        );

        Ok(Self {
            surface,
            sensors,
            scheduler,
            config,
        })
    }

    pub fn sensors(&self) -> &SensorHub<E, R, P> {
        &self.sensors
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn active_screen(&self) -> ScreenId {
        self.scheduler.active()
    }

    pub fn scheduler(&self) -> &Scheduler<ScreenId, 4> {
        &self.scheduler
    }

    /// Show the startup message and hold it.
    pub fn splash(&mut self, delay: &mut impl DelayNs) {
        if let Err(e) = screens::show_message(&mut self.surface, SPLASH_TEXT, SPLASH_POS) {
            error!("Failed to draw splash: {:?}", e);
        }
        delay.delay_ms(self.config.splash_ms);
    }

    /// One scheduler step at `now_ms`.
    ///
    /// Draw failures are logged and swallowed; the next tick redraws anyway.
    pub fn tick(&mut self, now_ms: u32) -> TickOutcome {
        let Self {
            surface,
            sensors,
            scheduler,
            config,
        } = self;

        scheduler.tick(now_ms, |screen| {
            if let Err(e) = screens::render(screen, surface, sensors, config) {
                error!("Failed to draw {:?} screen: {:?}", screen, e);
            }
        })
    }

    /// Rotate screens until `should_stop` returns true.
    ///
    /// The stop flag is only checked between ticks, so a tick in progress
    /// always completes. The first screen's time slice starts here, not at
    /// construction, so the splash hold does not eat into it.
    pub fn run<C, D>(
        &mut self,
        clock: &mut C,
        delay: &mut D,
        mut should_stop: impl FnMut() -> bool,
    ) where
        C: MillisClock,
        D: DelayNs,
    {
        self.scheduler.reset(clock.now_ms());
        info!(
            "Rotating {} screens every {} ms",
            ScreenId::ROTATION.len(),
            self.config.screen_duration_ms
        );

        while !should_stop() {
            self.tick(clock.now_ms());
            delay.delay_ms(self.config.tick_interval_ms);
        }

        info!("Stop requested");
    }

    /// Best-effort goodbye: message, hold, then a blank display.
    pub fn shutdown(&mut self, delay: &mut impl DelayNs) {
        if let Err(e) = screens::show_message(&mut self.surface, GOODBYE_TEXT, GOODBYE_POS) {
            error!("Failed to draw goodbye: {:?}", e);
        }
        delay.delay_ms(self.config.goodbye_ms);
        if let Err(e) = screens::blank(&mut self.surface) {
            error!("Failed to blank display: {:?}", e);
        }
    }
}
