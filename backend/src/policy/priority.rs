//! Urgency scoring for READY processes
//!
//! ```text
//! priority(p, now) = 1 / max(1, deadline_tick - now) + bursts_remaining
//! ```
//!
//! Higher is more urgent. The score depends on `now`, so it is recomputed on
//! every comparison and never stored on the process.
//!
//! # Exact ordering
//!
//! The fractional term always lies in `(0, 1]`, so two scores compare exactly
//! by `bursts_remaining` first and then by the clamped distance to the
//! deadline (closer is more urgent). [`Priority`] orders on those integers and
//! never compares floats; [`Priority::value`] gives the formula's value for
//! display.

use crate::models::process::Process;
use serde::Serialize;
use std::cmp::Ordering;

/// Urgency of one process at one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Priority {
    bursts_remaining: usize,
    /// `max(1, deadline_tick - now)`
    ticks_to_deadline: usize,
}

impl Priority {
    /// Score a process at tick `now`
    ///
    /// # Example
    /// ```
    /// use scheduler_simulator_core_rs::Process;
    /// use scheduler_simulator_core_rs::policy::priority::Priority;
    ///
    /// let p = Process::new("p".to_string(), 1, 0, 4, 3, 0, 10);
    /// let score = Priority::of(&p, 6);
    /// assert_eq!(score.value(), 3.25); // 1/4 + 3
    /// ```
    pub fn of(process: &Process, now: usize) -> Self {
        let until = process.deadline_tick().saturating_sub(now).max(1);
        Self {
            bursts_remaining: process.bursts_remaining(),
            ticks_to_deadline: until,
        }
    }

    /// Value of the formula
    pub fn value(&self) -> f64 {
        1.0 / self.ticks_to_deadline as f64 + self.bursts_remaining as f64
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bursts_remaining
            .cmp(&other.bursts_remaining)
            .then_with(|| other.ticks_to_deadline.cmp(&self.ticks_to_deadline))
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Whether `candidate` belongs ahead of `member` in a ready queue at `now`
///
/// Strictly higher priority goes first; equal priority is broken by the
/// lower pid.
pub fn outranks(candidate: &Process, member: &Process, now: usize) -> bool {
    match Priority::of(candidate, now).cmp(&Priority::of(member, now)) {
        Ordering::Greater => true,
        Ordering::Equal => candidate.pid() < member.pid(),
        Ordering::Less => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proc(pid: u32, bursts: usize, deadline: usize) -> Process {
        Process::new(format!("p{}", pid), pid, 0, 5, bursts, 0, deadline)
    }

    #[test]
    fn test_more_bursts_dominates_deadline() {
        let many = proc(1, 3, 1_000);
        let urgent = proc(2, 2, 6);
        assert!(Priority::of(&many, 5) > Priority::of(&urgent, 5));
        assert!(outranks(&many, &urgent, 5));
    }

    #[test]
    fn test_closer_deadline_wins_with_equal_bursts() {
        let near = proc(2, 1, 10);
        let far = proc(1, 1, 40);
        assert!(outranks(&near, &far, 0));
        assert!(!outranks(&far, &near, 0));
    }

    #[test]
    fn test_distance_clamps_at_one() {
        let passed = proc(1, 1, 3);
        let due = proc(2, 1, 8);
        // 3 - 8 and 8 - 7 both clamp to 1
        assert_eq!(Priority::of(&passed, 8), Priority::of(&due, 7));
        assert_eq!(Priority::of(&passed, 8).value(), 2.0);
    }

    #[test]
    fn test_equal_priority_breaks_on_pid() {
        let low_pid = proc(3, 2, 50);
        let high_pid = proc(9, 2, 50);
        assert!(outranks(&low_pid, &high_pid, 10));
        assert!(!outranks(&high_pid, &low_pid, 10));
    }

    #[test]
    fn test_ordering_matches_formula() {
        let samples = [(1, 1), (1, 7), (2, 1), (2, 30), (5, 2), (0, 4)];
        for &(b1, d1) in &samples {
            for &(b2, d2) in &samples {
                let a = Priority { bursts_remaining: b1, ticks_to_deadline: d1 };
                let b = Priority { bursts_remaining: b2, ticks_to_deadline: d2 };
                let by_value = a.value().partial_cmp(&b.value()).unwrap();
                assert_eq!(a.cmp(&b), by_value, "{:?} vs {:?}", a, b);
            }
        }
    }
}
