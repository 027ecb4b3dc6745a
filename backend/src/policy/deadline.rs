//! Deadline enforcement
//!
//! Any process that is not FINISHED or DEAD is killed on the first tick with
//! `now >= deadline_tick`, whatever state it is in (including NEW processes
//! that have not arrived yet). The kill supersedes every other transition the
//! process would have made later in the same tick.

use crate::models::process::Process;

/// Whether the process must be killed at tick `now`
///
/// # Example
///
/// ```
/// use scheduler_simulator_core_rs::Process;
/// use scheduler_simulator_core_rs::policy::deadline::deadline_reached;
///
/// let p = Process::new("p".to_string(), 1, 0, 3, 1, 0, 10);
/// assert!(!deadline_reached(&p, 9));
/// assert!(deadline_reached(&p, 10));
/// ```
pub fn deadline_reached(process: &Process, now: usize) -> bool {
    !process.is_terminal() && now >= process.deadline_tick()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_processes_are_never_killed() {
        let mut p = Process::new("p".to_string(), 1, 0, 3, 1, 0, 2);
        p.kill(2).unwrap();
        assert!(!deadline_reached(&p, 50));
    }

    #[test]
    fn test_new_process_dies_before_arrival() {
        let p = Process::new("late".to_string(), 4, 20, 3, 1, 0, 5);
        assert!(deadline_reached(&p, 5));
    }

    #[test]
    fn test_zero_deadline_is_due_immediately() {
        let p = Process::new("p".to_string(), 1, 0, 3, 1, 0, 0);
        assert!(deadline_reached(&p, 0));
    }
}
