//! Scheduling policies
//!
//! Rule sets the tick driver consults. None of them mutate state; each one
//! answers a question about a single process at a single tick and the
//! orchestrator applies the answer.
//!
//! - [`priority`]: urgency scoring used to order ready queues
//! - [`deadline`]: when a process must be killed
//! - [`promotion`]: when a starved Low process moves to High
//! - [`reentry_for`]: where a process lands when its I/O completes

pub mod deadline;
pub mod priority;
pub mod promotion;

use crate::models::process::{Process, QueueLevel};

/// Where a process re-enters the ready queues after I/O
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reentry {
    /// Ahead of every other High member, ignoring priority
    FrontOfHigh,
    /// Into the given tier by priority
    ByPriority(QueueLevel),
}

/// Decide the re-entry point for a process that just finished I/O
///
/// Precedence: a pending front-of-High flag, then the Low tier if that is
/// where the process last sat, then High.
///
/// # Example
///
/// ```
/// use scheduler_simulator_core_rs::{Process, QueueLevel};
/// use scheduler_simulator_core_rs::policy::{reentry_for, Reentry};
///
/// let p = Process::new("p".to_string(), 1, 0, 3, 2, 1, 50);
/// assert_eq!(reentry_for(&p), Reentry::ByPriority(QueueLevel::High));
/// ```
pub fn reentry_for(process: &Process) -> Reentry {
    if process.is_forced_high() {
        Reentry::FrontOfHigh
    } else if process.queue_level() == QueueLevel::Low {
        Reentry::ByPriority(QueueLevel::Low)
    } else {
        Reentry::ByPriority(QueueLevel::High)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_tier_is_sticky() {
        let mut p = Process::new("p".to_string(), 1, 0, 3, 2, 1, 50);
        p.set_queue_level(QueueLevel::Low);
        assert_eq!(reentry_for(&p), Reentry::ByPriority(QueueLevel::Low));
    }

    #[test]
    fn test_forced_flag_beats_low_tier() {
        let mut p = Process::new("p".to_string(), 1, 0, 3, 2, 1, 50);
        p.admit().unwrap();
        p.dispatch(0, 4).unwrap();
        p.preempt_for_event().unwrap();
        p.set_queue_level(QueueLevel::Low);
        assert_eq!(reentry_for(&p), Reentry::FrontOfHigh);
    }
}
