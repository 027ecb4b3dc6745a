//! Low -> High promotion
//!
//! A READY process parked in Low is promoted once the time since it last left
//! the CPU exceeds twice its deadline tick:
//!
//! ```text
//! 2 * deadline_tick < now - last_cpu_exit_tick
//! ```
//!
//! A process that never ran counts its last exit as tick -1. Promotion never
//! touches `quantum_left`; quantum is only assigned at dispatch.

use crate::models::process::{Process, ProcessState, QueueLevel};

/// Ticks since the process last left the CPU, as seen at `now`
fn ticks_off_cpu(process: &Process, now: usize) -> i128 {
    let last_exit = process.last_cpu_exit_tick().map_or(-1, |t| t as i128);
    now as i128 - last_exit
}

/// Whether a process queued in Low should move to High at tick `now`
pub fn should_promote(process: &Process, now: usize) -> bool {
    process.state() == ProcessState::Ready
        && process.queue_level() == QueueLevel::Low
        && 2 * (process.deadline_tick() as i128) < ticks_off_cpu(process, now)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// READY process in Low that left the CPU at `exit`
    fn demoted(deadline: usize, exit: usize) -> Process {
        let mut p = Process::new("p".to_string(), 1, 0, 10, 1, 0, deadline);
        p.admit().unwrap();
        p.dispatch(exit.saturating_sub(1), 1).unwrap();
        p.execute_tick(exit.saturating_sub(1)).unwrap();
        assert_eq!(p.execute_tick(exit).unwrap(), crate::models::process::CpuOutcome::QuantumExpired);
        p.set_queue_level(QueueLevel::Low);
        p
    }

    #[test]
    fn test_promotes_only_strictly_past_threshold() {
        let p = demoted(3, 4);
        // 2 * 3 = 6; needs now - 4 > 6
        assert!(!should_promote(&p, 10));
        assert!(should_promote(&p, 11));
    }

    #[test]
    fn test_high_members_are_not_promoted() {
        let mut p = demoted(0, 1);
        p.set_queue_level(QueueLevel::High);
        assert!(!should_promote(&p, 100));
    }

    #[test]
    fn test_zero_deadline_promotes_next_tick() {
        let p = demoted(0, 1);
        assert!(!should_promote(&p, 1));
        assert!(should_promote(&p, 2));
    }
}
