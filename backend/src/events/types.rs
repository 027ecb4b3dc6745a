//! Forced dispatch event types
//!
//! # Design Principles
//!
//! 1. **Determinism**: events are totally ordered by `(tick, pid)`
//! 2. **Self-contained**: an event names its target and its tick, nothing else
//! 3. **Logged**: every application (or refusal) lands in the event log

use crate::models::process::Pid;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Request to run `pid` on the CPU at `tick`
///
/// Ordering is by tick, then pid, which is the order events are applied in.
///
/// # Example
/// ```
/// use scheduler_simulator_core_rs::events::ForcedDispatch;
///
/// let early = ForcedDispatch::new(9, 3);
/// let late = ForcedDispatch::new(1, 4);
/// assert!(early < late);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForcedDispatch {
    pub pid: Pid,
    pub tick: usize,
}

impl ForcedDispatch {
    pub fn new(pid: Pid, tick: usize) -> Self {
        Self { pid, tick }
    }
}

impl Ord for ForcedDispatch {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tick
            .cmp(&other.tick)
            .then_with(|| self.pid.cmp(&other.pid))
    }
}

impl PartialOrd for ForcedDispatch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_tick_orders_by_pid() {
        let mut events = vec![
            ForcedDispatch::new(7, 2),
            ForcedDispatch::new(3, 2),
            ForcedDispatch::new(5, 1),
        ];
        events.sort();
        assert_eq!(
            events,
            vec![
                ForcedDispatch::new(5, 1),
                ForcedDispatch::new(3, 2),
                ForcedDispatch::new(7, 2),
            ]
        );
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&ForcedDispatch::new(4, 12)).unwrap();
        assert_eq!(json, r#"{"pid":4,"tick":12}"#);
    }
}
