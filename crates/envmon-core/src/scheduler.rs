//! Time-sliced rotation through a fixed set of screens.
//!
//! The scheduler owns the only mutable UI state: which screen is active and
//! when it became active. Rendering is supplied by the caller on every tick,
//! so the rotation logic can be driven with synthetic timestamps.

use log::debug;

use crate::timing::{has_elapsed, ticks_elapsed};

/// Ordered, non-empty list of screens with exactly one active.
#[derive(Debug, Clone)]
pub struct ScreenSet<T, const N: usize> {
    screens: [T; N],
    active: usize,
}

impl<T: Copy, const N: usize> ScreenSet<T, N> {
    /// Build a set whose first entry is active.
    pub const fn new(screens: [T; N]) -> Self {
        const { assert!(N > 0, "a screen set needs at least one screen") };
        Self { screens, active: 0 }
    }

    pub fn active(&self) -> T {
        self.screens[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub fn screens(&self) -> &[T] {
        &self.screens
    }

    /// Make the next screen active, wrapping to the first. Returns the new index.
    pub fn advance(&mut self) -> usize {
        self.active = (self.active + 1) % N;
        self.active
    }

    fn rewind(&mut self) {
        self.active = 0;
    }
}

/// What a tick did to the rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Stayed,
    Advanced { from: usize, to: usize },
}

/// Round-robin scheduler advancing once `screen_duration_ms` has passed.
pub struct Scheduler<T, const N: usize> {
    screens: ScreenSet<T, N>,
    screen_duration_ms: u32,
    last_transition_ms: u32,
}

impl<T: Copy, const N: usize> Scheduler<T, N> {
    /// Start at the first screen, counting its time from `now_ms`.
    pub fn new(screens: ScreenSet<T, N>, screen_duration_ms: u32, now_ms: u32) -> Self {
        let mut screens = screens;
        screens.rewind();
        Self {
            screens,
            screen_duration_ms,
            last_transition_ms: now_ms,
        }
    }

    pub fn active(&self) -> T {
        self.screens.active()
    }

    pub fn active_index(&self) -> usize {
        self.screens.active_index()
    }

    pub fn screens(&self) -> &ScreenSet<T, N> {
        &self.screens
    }

    pub fn screen_duration_ms(&self) -> u32 {
        self.screen_duration_ms
    }

    /// Milliseconds the active screen has been shown as of `now_ms`.
    pub fn time_on_screen(&self, now_ms: u32) -> u32 {
        ticks_elapsed(now_ms, self.last_transition_ms)
    }

    /// Unconditionally move to the next screen.
    pub fn advance(&mut self) -> usize {
        self.screens.advance()
    }

    /// Back to the first screen, restarting its time slice at `now_ms`.
    pub fn reset(&mut self, now_ms: u32) {
        self.screens.rewind();
        self.last_transition_ms = now_ms;
    }

    /// Advance if the active screen's slice has run out at `now_ms`.
    pub fn poll(&mut self, now_ms: u32) -> TickOutcome {
        if !has_elapsed(now_ms, self.last_transition_ms, self.screen_duration_ms) {
            return TickOutcome::Stayed;
        }

        let from = self.screens.active_index();
        let to = self.screens.advance();
        self.last_transition_ms = now_ms;
        debug!("Screen {} -> {} at {} ms", from, to, now_ms);
        TickOutcome::Advanced { from, to }
    }

    /// One scheduler step: rotate if due, then render whichever screen is active.
    pub fn tick(&mut self, now_ms: u32, render: impl FnOnce(T)) -> TickOutcome {
        let outcome = self.poll(now_ms);
        render(self.screens.active());
        outcome
    }
}
