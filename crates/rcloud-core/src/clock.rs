#![forbid(unsafe_code)]

//! Host-driven time and fire-and-forget timers.
//!
//! The browser frontend uses real `setTimeout` handles. This module gives the
//! core an equivalent it can drive deterministically: the host advances a
//! monotonic clock, and [`TimerQueue::advance`] returns every task whose
//! deadline has passed. There is no cancellation.

use core::time::Duration;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

#[derive(Debug)]
struct Entry<T> {
    due: Duration,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed: BinaryHeap is a max-heap and we pop the earliest deadline.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Queue of one-shot tasks keyed by deadline.
///
/// Tasks due at the same instant fire in scheduling order.
#[derive(Debug)]
pub struct TimerQueue<T> {
    clock: DeterministicClock,
    heap: BinaryHeap<Entry<T>>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: DeterministicClock::new(),
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.clock.now()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Schedule `task` to fire `delay` after the current time.
    pub fn schedule(&mut self, delay: Duration, task: T) {
        let due = self.clock.now().saturating_add(delay);
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.heap.push(Entry { due, seq, task });
    }

    /// Advance time by `dt` and drain every task now due, earliest first.
    pub fn advance(&mut self, dt: Duration) -> Vec<T> {
        self.clock.advance(dt);
        let now = self.clock.now();
        let mut fired = Vec::new();
        while self.heap.peek().is_some_and(|e| e.due <= now) {
            if let Some(entry) = self.heap.pop() {
                fired.push(entry.task);
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deterministic_clock_advances_monotonically() {
        let mut c = DeterministicClock::new();
        assert_eq!(c.now(), Duration::ZERO);

        c.advance(Duration::from_millis(10));
        c.advance(Duration::from_millis(5));
        assert_eq!(c.now(), Duration::from_millis(15));

        // Saturation: don't panic or wrap.
        c.set(Duration::MAX);
        c.advance(Duration::from_secs(1));
        assert_eq!(c.now(), Duration::MAX);
    }

    #[test]
    fn tasks_fire_once_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(Duration::from_millis(1600), "burst");
        q.schedule(Duration::from_millis(180), "duplicate");
        q.schedule(Duration::from_millis(1400), "toast");

        assert_eq!(q.advance(Duration::from_millis(100)), Vec::<&str>::new());
        assert_eq!(q.advance(Duration::from_millis(80)), vec!["duplicate"]);
        assert_eq!(q.advance(Duration::from_secs(5)), vec!["toast", "burst"]);
        assert!(q.is_empty());
        assert_eq!(q.advance(Duration::from_secs(5)), Vec::<&str>::new());
    }

    #[test]
    fn same_deadline_keeps_schedule_order() {
        let mut q = TimerQueue::new();
        q.schedule(Duration::from_millis(10), 1);
        q.schedule(Duration::from_millis(10), 2);
        q.schedule(Duration::from_millis(10), 3);
        assert_eq!(q.advance(Duration::from_millis(10)), vec![1, 2, 3]);
    }

    #[test]
    fn delays_are_relative_to_current_time() {
        let mut q = TimerQueue::new();
        q.advance(Duration::from_millis(500));
        q.schedule(Duration::from_millis(100), "late");
        assert_eq!(q.now(), Duration::from_millis(500));
        assert!(q.advance(Duration::from_millis(99)).is_empty());
        assert_eq!(q.advance(Duration::from_millis(1)), vec!["late"]);
    }
}
