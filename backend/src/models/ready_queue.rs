//! Ready queues (High and Low tiers)
//!
//! A [`ReadyQueue`] holds indices into the process table, never the processes
//! themselves. Order is derived from [`outranks`], which scores processes at
//! the tick of the call, so the queue has to be re-sorted every tick to track
//! the shrinking deadline term.
//!
//! # Pinned prefix
//!
//! Members placed with [`ReadyQueue::insert_at_front`] skip the priority
//! formula. They form a prefix that [`ReadyQueue::resort`] leaves untouched,
//! most recent first, so a forcibly re-entered process is really the next one
//! popped. A pin lasts until the member leaves the queue.
//!
//! # Capacity
//!
//! Each queue is sized to the total process count when the simulation is
//! built. Overflow or double membership can only come from a bug in the tick
//! driver and is reported as a [`QueueError`].

use crate::models::process::{Pid, Process, QueueLevel};
use crate::policy::priority::outranks;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

/// Errors raised by ready-queue insertion
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("{level} queue is full ({capacity} members)")]
    CapacityExceeded { level: QueueLevel, capacity: usize },

    #[error("process {pid} is already queued in {level}")]
    DuplicateMember { level: QueueLevel, pid: Pid },
}

/// One priority tier of the ready queue
///
/// # Example
///
/// ```
/// use scheduler_simulator_core_rs::{Process, QueueLevel};
/// use scheduler_simulator_core_rs::models::ready_queue::ReadyQueue;
///
/// let mut table = vec![
///     Process::new("a".to_string(), 1, 0, 5, 1, 0, 100),
///     Process::new("b".to_string(), 2, 0, 5, 3, 0, 100),
/// ];
/// let mut high = ReadyQueue::new(QueueLevel::High, table.len());
///
/// high.insert_by_priority(0, &mut table, 0).unwrap();
/// high.insert_by_priority(1, &mut table, 0).unwrap();
///
/// // b has more bursts left, so it is more urgent
/// assert_eq!(high.pop_front(), Some(1));
/// assert_eq!(table[0].queue_level(), QueueLevel::High);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyQueue {
    level: QueueLevel,
    capacity: usize,
    /// Front-inserted members, next to dispatch first
    pinned: VecDeque<usize>,
    /// Members ordered by priority as of the last insertion or re-sort
    ordered: VecDeque<usize>,
}

impl ReadyQueue {
    /// Create an empty queue for `level` holding at most `capacity` members
    pub fn new(level: QueueLevel, capacity: usize) -> Self {
        Self {
            level,
            capacity,
            pinned: VecDeque::new(),
            ordered: VecDeque::new(),
        }
    }

    pub fn level(&self) -> QueueLevel {
        self.level
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.pinned.len() + self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pinned.is_empty() && self.ordered.is_empty()
    }

    /// Number of members in the pinned prefix
    pub fn pinned_len(&self) -> usize {
        self.pinned.len()
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.pinned.contains(&idx) || self.ordered.contains(&idx)
    }

    /// Members in dispatch order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.pinned.iter().chain(self.ordered.iter()).copied()
    }

    /// Members in dispatch order, collected
    pub fn members(&self) -> Vec<usize> {
        self.iter().collect()
    }

    fn check_room(&self, idx: usize, processes: &[Process]) -> Result<(), QueueError> {
        if self.contains(idx) {
            return Err(QueueError::DuplicateMember {
                level: self.level,
                pid: processes[idx].pid(),
            });
        }
        if self.len() >= self.capacity {
            return Err(QueueError::CapacityExceeded {
                level: self.level,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Place `idx` before the first ordered member it outranks at `now`
    fn place_by_priority(&mut self, idx: usize, processes: &[Process], now: usize) {
        let candidate = &processes[idx];
        let position = self
            .ordered
            .iter()
            .position(|&member| outranks(candidate, &processes[member], now))
            .unwrap_or(self.ordered.len());
        self.ordered.insert(position, idx);
    }

    /// Insert by priority at tick `now` and record the tier on the process
    pub fn insert_by_priority(
        &mut self,
        idx: usize,
        processes: &mut [Process],
        now: usize,
    ) -> Result<(), QueueError> {
        self.check_room(idx, processes)?;
        self.place_by_priority(idx, processes, now);
        processes[idx].set_queue_level(self.level);
        Ok(())
    }

    /// Insert ahead of every member, bypassing the priority formula
    pub fn insert_at_front(&mut self, idx: usize, processes: &mut [Process]) -> Result<(), QueueError> {
        self.check_room(idx, processes)?;
        self.pinned.push_front(idx);
        processes[idx].set_queue_level(self.level);
        Ok(())
    }

    /// Remove `idx` wherever it sits; returns whether it was a member
    ///
    /// The relative order of the remaining members is preserved.
    pub fn remove_if_present(&mut self, idx: usize) -> bool {
        if let Some(pos) = self.pinned.iter().position(|&m| m == idx) {
            self.pinned.remove(pos);
            return true;
        }
        if let Some(pos) = self.ordered.iter().position(|&m| m == idx) {
            self.ordered.remove(pos);
            return true;
        }
        false
    }

    /// Dequeue the next member to dispatch
    pub fn pop_front(&mut self) -> Option<usize> {
        self.pinned.pop_front().or_else(|| self.ordered.pop_front())
    }

    /// Re-derive priority order of the unpinned members at tick `now`
    ///
    /// Drains the ordered members and reinserts them one by one, so ties keep
    /// resolving on pid. Calling it twice at the same tick is a no-op.
    pub fn resort(&mut self, processes: &[Process], now: usize) {
        let drained: Vec<usize> = self.ordered.drain(..).collect();
        for idx in drained {
            self.place_by_priority(idx, processes, now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(specs: &[(Pid, usize, usize)]) -> Vec<Process> {
        specs
            .iter()
            .map(|&(pid, bursts, deadline)| {
                Process::new(format!("p{}", pid), pid, 0, 5, bursts, 0, deadline)
            })
            .collect()
    }

    #[test]
    fn test_ties_queue_by_pid_regardless_of_insertion_order() {
        let mut procs = table(&[(5, 1, 50), (2, 1, 50), (9, 1, 50)]);
        let mut q = ReadyQueue::new(QueueLevel::Low, 3);
        q.insert_by_priority(0, &mut procs, 0).unwrap();
        q.insert_by_priority(1, &mut procs, 0).unwrap();
        q.insert_by_priority(2, &mut procs, 0).unwrap();
        assert_eq!(q.members(), vec![1, 0, 2]);
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let mut procs = table(&[(1, 1, 10)]);
        let mut q = ReadyQueue::new(QueueLevel::High, 4);
        q.insert_by_priority(0, &mut procs, 0).unwrap();
        assert_eq!(
            q.insert_at_front(0, &mut procs),
            Err(QueueError::DuplicateMember { level: QueueLevel::High, pid: 1 })
        );
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut procs = table(&[(1, 1, 10), (2, 1, 10)]);
        let mut q = ReadyQueue::new(QueueLevel::High, 1);
        q.insert_by_priority(0, &mut procs, 0).unwrap();
        assert_eq!(
            q.insert_by_priority(1, &mut procs, 0),
            Err(QueueError::CapacityExceeded { level: QueueLevel::High, capacity: 1 })
        );
    }

    #[test]
    fn test_resort_keeps_pinned_prefix() {
        // pid 1 is the least urgent but was front-inserted
        let mut procs = table(&[(1, 1, 100), (2, 4, 100), (3, 2, 100)]);
        let mut q = ReadyQueue::new(QueueLevel::High, 3);
        q.insert_by_priority(1, &mut procs, 0).unwrap();
        q.insert_by_priority(2, &mut procs, 0).unwrap();
        q.insert_at_front(0, &mut procs).unwrap();

        q.resort(&procs, 5);
        assert_eq!(q.members(), vec![0, 1, 2]);
        assert_eq!(q.pinned_len(), 1);

        assert_eq!(q.pop_front(), Some(0));
        assert_eq!(q.pinned_len(), 0);
    }

    #[test]
    fn test_resort_follows_deadline_drift() {
        // Same bursts; pid 1 has the later deadline but the lower pid.
        let mut procs = table(&[(1, 1, 12), (2, 1, 11)]);
        let mut q = ReadyQueue::new(QueueLevel::High, 2);
        q.insert_by_priority(0, &mut procs, 0).unwrap();
        q.insert_by_priority(1, &mut procs, 0).unwrap();
        assert_eq!(q.members(), vec![1, 0]);

        // At tick 11 both distances clamp to 1: the pid tie-break takes over.
        q.resort(&procs, 11);
        assert_eq!(q.members(), vec![0, 1]);
    }

    #[test]
    fn test_remove_preserves_relative_order() {
        let mut procs = table(&[(1, 3, 10), (2, 2, 10), (3, 1, 10)]);
        let mut q = ReadyQueue::new(QueueLevel::High, 3);
        for idx in 0..3 {
            q.insert_by_priority(idx, &mut procs, 0).unwrap();
        }
        assert!(q.remove_if_present(1));
        assert!(!q.remove_if_present(1));
        assert_eq!(q.members(), vec![0, 2]);
    }
}
