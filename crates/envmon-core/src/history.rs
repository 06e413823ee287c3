//! Fixed-capacity sliding window over integer samples.
//!
//! Backs the temperature trend: the environment screen appends one whole
//! degree per successful reading and the graph screen reads a snapshot.

use heapless::{Deque, Vec};

/// Number of temperature samples kept for the trend graph.
pub const TEMPERATURE_HISTORY_LEN: usize = 32;

/// Temperature history as used by the monitor screens.
pub type TemperatureHistory = HistoryBuffer<TEMPERATURE_HISTORY_LEN>;

/// FIFO of the most recent `N` samples. Index 0 of a snapshot is the oldest.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<const N: usize> {
    samples: Deque<i32, N>,
}

impl<const N: usize> Default for HistoryBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> HistoryBuffer<N> {
    pub const fn new() -> Self {
        Self {
            samples: Deque::new(),
        }
    }

    /// Append a sample, evicting the oldest one when full.
    pub fn append(&mut self, sample: i32) {
        if self.samples.is_full() {
            self.samples.pop_front();
        }
        // Cannot fail: a slot was freed above when the deque was full.
        self.samples.push_back(sample).ok();
    }

    /// Copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<i32, N> {
        self.samples.iter().copied().collect()
    }

    /// Iterate oldest to newest without copying.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.samples.iter().copied()
    }

    pub fn latest(&self) -> Option<i32> {
        self.samples.back().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn min(&self) -> Option<i32> {
        self.iter().min()
    }

    pub fn max(&self) -> Option<i32> {
        self.iter().max()
    }

    /// Value range for graph scaling.
    pub fn range(&self) -> GraphRange {
        GraphRange::of(self.iter())
    }
}

/// Vertical scale of a series, or the reason it cannot be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphRange {
    /// Fewer than two samples; nothing to connect.
    Insufficient,
    /// `span` is `max - min`, but never less than 1 so it can divide.
    /// Unsigned so the full `i32` range fits.
    Span { min: i32, max: i32, span: u32 },
}

impl GraphRange {
    pub fn of(samples: impl IntoIterator<Item = i32>) -> Self {
        let mut count = 0usize;
        let mut min = i32::MAX;
        let mut max = i32::MIN;
        for sample in samples {
            count += 1;
            min = min.min(sample);
            max = max.max(sample);
        }

        if count < 2 {
            return Self::Insufficient;
        }

        let span = max.abs_diff(min).max(1);
        Self::Span { min, max, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let history = TemperatureHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 32);
        assert_eq!(history.latest(), None);
        assert!(history.snapshot().is_empty());
    }

    #[test]
    fn test_append_below_capacity_keeps_order() {
        let mut history = HistoryBuffer::<4>::new();
        history.append(3);
        history.append(1);
        history.append(2);
        assert_eq!(history.snapshot().as_slice(), &[3, 1, 2]);
        assert_eq!(history.latest(), Some(2));
    }

    #[test]
    fn test_append_at_capacity_evicts_oldest() {
        let mut history = HistoryBuffer::<4>::new();
        for sample in 1..=5 {
            history.append(sample);
        }
        assert_eq!(history.snapshot().as_slice(), &[2, 3, 4, 5]);
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn test_temperature_history_keeps_last_32() {
        let mut history = TemperatureHistory::new();
        for sample in 0..33 {
            history.append(sample);
        }
        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), 32);
        assert_eq!(snapshot.first(), Some(&1));
        assert_eq!(snapshot.last(), Some(&32));
    }

    #[test]
    fn test_min_max() {
        let mut history = HistoryBuffer::<8>::new();
        for sample in [21, 19, 24, 22] {
            history.append(sample);
        }
        assert_eq!(history.min(), Some(19));
        assert_eq!(history.max(), Some(24));
    }

    #[test]
    fn test_range_needs_two_samples() {
        let mut history = HistoryBuffer::<8>::new();
        assert_eq!(history.range(), GraphRange::Insufficient);
        history.append(20);
        assert_eq!(history.range(), GraphRange::Insufficient);
        history.append(23);
        assert_eq!(
            history.range(),
            GraphRange::Span {
                min: 20,
                max: 23,
                span: 3
            }
        );
    }

    #[test]
    fn test_flat_series_has_unit_span() {
        let mut history = HistoryBuffer::<8>::new();
        history.append(22);
        history.append(22);
        assert_eq!(
            history.range(),
            GraphRange::Span {
                min: 22,
                max: 22,
                span: 1
            }
        );
    }

    #[test]
    fn test_span_covers_full_i32_range() {
        let range = GraphRange::of([i32::MAX, i32::MIN]);
        assert_eq!(
            range,
            GraphRange::Span {
                min: i32::MIN,
                max: i32::MAX,
                span: u32::MAX
            }
        );
    }

    #[test]
    fn test_clear() {
        let mut history = HistoryBuffer::<4>::new();
        history.append(1);
        history.clear();
        assert!(history.is_empty());
    }
}
