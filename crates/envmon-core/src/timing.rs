//! Monotonic clock sources and wraparound-safe elapsed time.
//!
//! Both the ranging driver (microseconds) and the screen scheduler
//! (milliseconds) read free-running `u32` counters that wrap silently. Every
//! elapsed-time computation in the crate goes through [`ticks_elapsed`], which
//! uses modular subtraction so a wrap between two readings still yields the
//! true distance, as long as the real interval is shorter than one full
//! counter period (about 71 minutes at 1 MHz, 49 days at 1 kHz).

/// Free-running microsecond counter.
pub trait MicrosClock {
    /// Current counter value. Wraps at `u32::MAX`.
    fn now_us(&mut self) -> u32;
}

/// Free-running millisecond counter.
pub trait MillisClock {
    /// Current counter value. Wraps at `u32::MAX`.
    fn now_ms(&mut self) -> u32;
}

impl<T: MicrosClock + ?Sized> MicrosClock for &mut T {
    fn now_us(&mut self) -> u32 {
        (**self).now_us()
    }
}

impl<T: MillisClock + ?Sized> MillisClock for &mut T {
    fn now_ms(&mut self) -> u32 {
        (**self).now_ms()
    }
}

/// Ticks between `since` and `now`, correct across a single counter wrap.
#[inline]
pub const fn ticks_elapsed(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

/// Whether at least `duration` ticks separate `since` and `now`.
#[inline]
pub const fn has_elapsed(now: u32, since: u32, duration: u32) -> bool {
    ticks_elapsed(now, since) >= duration
}

/// Whether strictly more than `limit` ticks separate `since` and `now`.
///
/// Used for polling deadlines: a wait that has lasted exactly `limit` ticks
/// is still within its window.
#[inline]
pub const fn deadline_passed(now: u32, since: u32, limit: u32) -> bool {
    ticks_elapsed(now, since) > limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_without_wrap() {
        assert_eq!(ticks_elapsed(1_500, 1_000), 500);
        assert_eq!(ticks_elapsed(7, 7), 0);
    }

    #[test]
    fn test_elapsed_across_wrap() {
        let since = u32::MAX - 99;
        let now = 400;
        assert_eq!(
            ticks_elapsed(now, since),
            500,
            "100 ticks before the wrap plus 400 after"
        );
    }

    #[test]
    fn test_elapsed_at_exact_wrap() {
        assert_eq!(ticks_elapsed(0, u32::MAX), 1);
    }

    #[test]
    fn test_has_elapsed_is_inclusive() {
        assert!(!has_elapsed(2_999, 0, 3_000));
        assert!(has_elapsed(3_000, 0, 3_000));
        assert!(has_elapsed(3_001, 0, 3_000));
    }

    #[test]
    fn test_deadline_is_exclusive() {
        assert!(!deadline_passed(30_000, 0, 30_000));
        assert!(deadline_passed(30_001, 0, 30_000));
    }

    #[test]
    fn test_deadline_across_wrap() {
        let start = u32::MAX - 10;
        assert!(!deadline_passed(start.wrapping_add(25), start, 30));
        assert!(deadline_passed(start.wrapping_add(31), start, 30));
    }
}
