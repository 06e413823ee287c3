use std::cell::Cell;
use std::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use envmon_core::history::{GraphRange, HistoryBuffer};
use envmon_core::ranging::{
    BridgedRanger, DualMode, EchoEdge, RangingResult, TRIGGER_PULSE_US, TRIGGER_SETTLE_US,
    distance_cm,
};
use envmon_core::scheduler::{ScreenSet, Scheduler, TickOutcome};
use envmon_core::timing::{MicrosClock, has_elapsed, ticks_elapsed};
use proptest::prelude::*;

struct Clock<'a>(&'a Cell<u32>);

impl MicrosClock for Clock<'_> {
    fn now_us(&mut self) -> u32 {
        let t = self.0.get();
        self.0.set(t.wrapping_add(1));
        t
    }
}

struct Delay<'a>(&'a Cell<u32>);

impl DelayNs for Delay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.0.set(self.0.get().wrapping_add(ns.div_ceil(1_000)));
    }
}

/// A line whose echo never arrives.
struct DeadLine;

impl ErrorType for DeadLine {
    type Error = Infallible;
}

impl OutputPin for DeadLine {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

impl InputPin for DeadLine {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(false)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(true)
    }
}

impl DualMode for DeadLine {
    fn set_as_output(&mut self) {}

    fn set_as_input(&mut self) {}
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_distance_is_linear_and_non_negative(width in any::<u32>()) {
        let cm = distance_cm(width);
        prop_assert!(cm >= 0.0);
        let expected = width as f64 * 0.01715;
        prop_assert!(
            (cm as f64 - expected).abs() <= expected * 1e-6 + 1e-6,
            "{} us -> {} cm, expected {}",
            width,
            cm,
            expected
        );
    }

    #[test]
    fn test_elapsed_survives_wrap(since in any::<u32>(), delta in any::<u32>()) {
        let now = since.wrapping_add(delta);
        prop_assert_eq!(ticks_elapsed(now, since), delta);
        prop_assert!(has_elapsed(now, since, delta));
    }

    #[test]
    fn test_history_keeps_newest_in_order(samples in prop::collection::vec(any::<i32>(), 0..100)) {
        let mut history = HistoryBuffer::<32>::new();
        for &s in &samples {
            history.append(s);
        }

        let snapshot = history.snapshot();
        let kept = samples.len().min(32);
        prop_assert_eq!(snapshot.len(), kept);
        prop_assert_eq!(snapshot.as_slice(), &samples[samples.len() - kept..]);
    }

    #[test]
    fn test_graph_range_never_zero_span(samples in prop::collection::vec(-60i32..85, 0..40)) {
        match GraphRange::of(samples.iter().copied()) {
            GraphRange::Insufficient => prop_assert!(samples.len() < 2),
            GraphRange::Span { min, max, span } => {
                prop_assert!(samples.len() >= 2);
                prop_assert!(span >= 1);
                prop_assert!(min <= max);
            }
        }
    }

    #[test]
    fn test_advance_returns_to_start(start in 0usize..8, extra in 0usize..3) {
        let mut set = ScreenSet::new([0u8, 1, 2, 3, 4, 5, 6, 7]);
        for _ in 0..start {
            set.advance();
        }
        for _ in 0..(set.len() * (extra + 1)) {
            set.advance();
        }
        prop_assert_eq!(set.active_index(), start);
    }

    #[test]
    fn test_scheduler_holds_each_screen_for_its_slice(
        start in any::<u32>(),
        duration in 1u32..10_000,
        tick in 1u32..1_000,
    ) {
        let mut scheduler = Scheduler::new(ScreenSet::new([0u8, 1, 2]), duration, start);
        let mut now = start;
        let mut last_change = start;

        for _ in 0..200 {
            now = now.wrapping_add(tick);
            if let TickOutcome::Advanced { .. } = scheduler.poll(now) {
                prop_assert!(now.wrapping_sub(last_change) >= duration);
                prop_assert!(now.wrapping_sub(last_change) < duration + tick);
                last_change = now;
            }
        }
    }

    #[test]
    fn test_missing_echo_gives_up_on_time(start in any::<u32>(), timeout in 1u32..60_000) {
        let now = Cell::new(start);
        let mut ranger = BridgedRanger::new(DeadLine, Clock(&now), Delay(&now))
            .with_echo_timeout(timeout);

        let result = ranger.measure();
        prop_assert_eq!(result, Ok(RangingResult::NoEcho(EchoEdge::Rising)));

        let spent = now.get().wrapping_sub(start);
        let trigger = TRIGGER_SETTLE_US + TRIGGER_PULSE_US;
        prop_assert!(spent > timeout);
        prop_assert!(
            spent <= trigger + timeout + 8,
            "spent {} us for a {} us timeout",
            spent,
            timeout
        );
    }
}
