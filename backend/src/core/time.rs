//! Time management for the simulation
//!
//! The scheduler operates in discrete unit ticks. There is no continuous time:
//! every phase of a tick observes the same `now`, and the clock only moves
//! forward once the whole phase sequence has run.

use serde::{Deserialize, Serialize};

/// Monotonic tick counter owned by one simulation run
///
/// # Example
/// ```
/// use scheduler_simulator_core_rs::SimClock;
///
/// let mut clock = SimClock::new();
/// assert_eq!(clock.now(), 0);
///
/// clock.advance_tick();
/// assert_eq!(clock.now(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimClock {
    /// Ticks elapsed since the run started
    current_tick: usize,
}

impl SimClock {
    /// Create a clock at tick 0
    pub fn new() -> Self {
        Self { current_tick: 0 }
    }

    /// Restore a clock at a given tick (checkpoint restoration)
    ///
    /// # Example
    /// ```
    /// use scheduler_simulator_core_rs::SimClock;
    ///
    /// let clock = SimClock::starting_at(42);
    /// assert_eq!(clock.now(), 42);
    /// ```
    pub fn starting_at(tick: usize) -> Self {
        Self { current_tick: tick }
    }

    /// Advance time by one tick
    pub fn advance_tick(&mut self) {
        self.current_tick += 1;
    }

    /// Get the current tick
    pub fn now(&self) -> usize {
        self.current_tick
    }

    /// Number of ticks fully executed so far
    ///
    /// Equal to `now()`; tick `n` is counted once the clock has moved past it.
    pub fn ticks_elapsed(&self) -> usize {
        self.current_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_starts_at_zero() {
        assert_eq!(SimClock::default().now(), 0);
        assert_eq!(SimClock::default(), SimClock::new());
    }

    #[test]
    fn test_starting_at_then_advance() {
        let mut clock = SimClock::starting_at(9);
        clock.advance_tick();
        assert_eq!(clock.now(), 10);
        assert_eq!(clock.ticks_elapsed(), 10);
    }
}
