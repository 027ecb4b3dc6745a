//! Simulation State
//!
//! Represents the complete state of one scheduler run: the process table, the
//! two ready queues and the CPU slot.
//!
//! # Ownership
//!
//! The table owns every [`Process`]; queues and the CPU slot refer to
//! processes by their index in the table. Indices follow load order and never
//! change, so a reference stays valid through removal, promotion and death.
//!
//! # Critical Invariants
//!
//! 1. **Single CPU**: at most one process is RUNNING, and it is the one in the
//!    CPU slot
//! 2. **Queue membership**: a process sits in High or Low only while READY,
//!    and every READY process sits in exactly one of them
//! 3. **Pid uniqueness**: each pid appears once in the table
//! 4. **Finished count**: equals the number of FINISHED or DEAD processes
//!
//! [`SimulationState::validate`] checks all of them.

use crate::models::process::{Pid, Process, ProcessState, QueueLevel};
use crate::models::ready_queue::{QueueError, ReadyQueue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete simulation state
///
/// # Example
///
/// ```rust
/// use scheduler_simulator_core_rs::{Process, SimulationState};
///
/// let state = SimulationState::new(vec![
///     Process::new("a".to_string(), 1, 0, 5, 1, 0, 50),
///     Process::new("b".to_string(), 2, 3, 2, 2, 1, 60),
/// ]);
///
/// assert_eq!(state.num_processes(), 2);
/// assert_eq!(state.high().len(), 0);
/// assert!(state.running().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Every process, in load order
    processes: Vec<Process>,

    /// pid -> index into `processes`
    #[serde(skip)]
    index: HashMap<Pid, usize>,

    high: ReadyQueue,
    low: ReadyQueue,

    /// Index of the RUNNING process
    running: Option<usize>,

    /// FINISHED + DEAD
    finished_count: usize,
}

impl SimulationState {
    /// Create a state with every process NEW and both queues empty
    ///
    /// Queues are sized to the process count.
    ///
    /// # Panics
    ///
    /// Panics on duplicate pids
    pub fn new(processes: Vec<Process>) -> Self {
        let capacity = processes.len();
        let mut state = Self {
            processes,
            index: HashMap::new(),
            high: ReadyQueue::new(QueueLevel::High, capacity),
            low: ReadyQueue::new(QueueLevel::Low, capacity),
            running: None,
            finished_count: 0,
        };
        state.rebuild_index();
        assert_eq!(
            state.index.len(),
            state.processes.len(),
            "process ids must be unique"
        );
        state
    }

    /// Rebuild the pid index (after deserialization)
    pub fn rebuild_index(&mut self) {
        self.index = self
            .processes
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.pid(), idx))
            .collect();
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Table index of a pid
    pub fn index_of(&self, pid: Pid) -> Option<usize> {
        self.index.get(&pid).copied()
    }

    /// Get reference to a process by pid
    pub fn get_process(&self, pid: Pid) -> Option<&Process> {
        self.index_of(pid).map(|idx| &self.processes[idx])
    }

    /// Process at a table index
    pub fn process_at(&self, idx: usize) -> &Process {
        &self.processes[idx]
    }

    pub(crate) fn process_at_mut(&mut self, idx: usize) -> &mut Process {
        &mut self.processes[idx]
    }

    /// All processes in load order
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn num_processes(&self) -> usize {
        self.processes.len()
    }

    pub fn high(&self) -> &ReadyQueue {
        &self.high
    }

    pub fn low(&self) -> &ReadyQueue {
        &self.low
    }

    /// Pids of a queue's members in dispatch order
    pub fn queue_pids(&self, level: QueueLevel) -> Vec<Pid> {
        let queue = match level {
            QueueLevel::High => &self.high,
            QueueLevel::Low => &self.low,
            QueueLevel::None => return Vec::new(),
        };
        queue.iter().map(|idx| self.processes[idx].pid()).collect()
    }

    /// Index of the RUNNING process
    pub fn running(&self) -> Option<usize> {
        self.running
    }

    /// Pid of the RUNNING process
    pub fn running_pid(&self) -> Option<Pid> {
        self.running.map(|idx| self.processes[idx].pid())
    }

    pub fn finished_count(&self) -> usize {
        self.finished_count
    }

    /// Whether every process is FINISHED or DEAD
    pub fn all_terminal(&self) -> bool {
        self.finished_count >= self.processes.len()
    }

    // ========================================================================
    // Mutations used by the tick driver
    // ========================================================================

    pub(crate) fn set_running(&mut self, idx: Option<usize>) {
        self.running = idx;
    }

    pub(crate) fn record_terminal(&mut self) {
        self.finished_count += 1;
    }

    /// Insert into a tier by priority at tick `now`
    pub(crate) fn enqueue_by_priority(
        &mut self,
        idx: usize,
        level: QueueLevel,
        now: usize,
    ) -> Result<(), QueueError> {
        match level {
            QueueLevel::Low => self.low.insert_by_priority(idx, &mut self.processes, now),
            _ => self.high.insert_by_priority(idx, &mut self.processes, now),
        }
    }

    /// Insert at the front of High, bypassing priority
    pub(crate) fn enqueue_front_of_high(&mut self, idx: usize) -> Result<(), QueueError> {
        self.high.insert_at_front(idx, &mut self.processes)
    }

    /// Remove from whichever queue holds `idx`; returns whether it was queued
    pub(crate) fn remove_from_queues(&mut self, idx: usize) -> bool {
        let in_high = self.high.remove_if_present(idx);
        let in_low = self.low.remove_if_present(idx);
        in_high || in_low
    }

    /// Pop the next process to dispatch, High before Low
    pub(crate) fn pop_next_ready(&mut self) -> Option<(usize, QueueLevel)> {
        if let Some(idx) = self.high.pop_front() {
            Some((idx, QueueLevel::High))
        } else {
            self.low.pop_front().map(|idx| (idx, QueueLevel::Low))
        }
    }

    /// Re-sort both tiers at tick `now`
    pub(crate) fn resort_queues(&mut self, now: usize) {
        self.high.resort(&self.processes, now);
        self.low.resort(&self.processes, now);
    }

    // ========================================================================
    // Invariant checking
    // ========================================================================

    /// Check the state invariants
    ///
    /// # Returns
    ///
    /// * `Ok(())` - all invariants hold
    /// * `Err(msg)` - description of the first violation found
    pub fn validate(&self) -> Result<(), String> {
        let n = self.processes.len();

        if self.index.len() != n {
            return Err("duplicate pid in process table".to_string());
        }

        let mut seen = vec![false; n];
        for (name, queue) in [("High", &self.high), ("Low", &self.low)] {
            if queue.len() > queue.capacity() {
                return Err(format!("{} queue over capacity", name));
            }
            for idx in queue.iter() {
                if idx >= n {
                    return Err(format!("{} queue refers to missing index {}", name, idx));
                }
                if seen[idx] {
                    return Err(format!(
                        "process {} queued more than once",
                        self.processes[idx].pid()
                    ));
                }
                seen[idx] = true;
                let p = &self.processes[idx];
                if p.state() != ProcessState::Ready {
                    return Err(format!(
                        "process {} is in {} queue while {}",
                        p.pid(),
                        name,
                        p.state()
                    ));
                }
            }
        }

        let running_states = self
            .processes
            .iter()
            .filter(|p| p.state() == ProcessState::Running)
            .count();
        match self.running {
            Some(idx) => {
                if idx >= n || self.processes[idx].state() != ProcessState::Running {
                    return Err("CPU slot holds a process that is not RUNNING".to_string());
                }
                if running_states != 1 {
                    return Err(format!("{} processes are RUNNING", running_states));
                }
            }
            None => {
                if running_states != 0 {
                    return Err("RUNNING process is not in the CPU slot".to_string());
                }
            }
        }

        for (idx, p) in self.processes.iter().enumerate() {
            if p.state() == ProcessState::Ready && !seen[idx] {
                return Err(format!("READY process {} is not queued", p.pid()));
            }
        }

        let terminal = self.processes.iter().filter(|p| p.is_terminal()).count();
        if terminal != self.finished_count {
            return Err(format!(
                "finished count {} does not match {} terminal processes",
                self.finished_count, terminal
            ));
        }

        Ok(())
    }
}
