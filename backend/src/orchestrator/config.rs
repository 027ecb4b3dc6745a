//! Scheduler configuration
//!
//! Everything needed to build an [`Orchestrator`](super::Orchestrator): the
//! base quantum, the process descriptions and the forced-dispatch events.
//! Configurations are plain data; validation happens when the orchestrator
//! is constructed.

use crate::events::ForcedDispatch;
use crate::models::process::{Pid, Process};
use serde::{Deserialize, Serialize};

/// Tick ceiling applied when a configuration does not set one
pub const DEFAULT_MAX_TICKS: usize = 1_000_000;

fn default_max_ticks() -> usize {
    DEFAULT_MAX_TICKS
}

/// Complete scheduler configuration
///
/// # Fields
///
/// * `quantum` - Base quantum `q`; High dispatches get `2q`, Low dispatches `q`
/// * `processes` - Process descriptions, in load order
/// * `events` - Forced dispatches, in any order
/// * `max_ticks` - Ticks to run before giving up on a schedule that never drains
///
/// # Example
///
/// ```rust
/// use scheduler_simulator_core_rs::{ProcessConfig, SchedulerConfig};
///
/// let config = SchedulerConfig::new(
///     2,
///     vec![ProcessConfig::new("editor", 1, 0, 5, 1, 0, 100)],
///     vec![],
/// );
///
/// assert_eq!(config.high_quantum(), 4);
/// assert_eq!(config.low_quantum(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub quantum: usize,

    pub processes: Vec<ProcessConfig>,

    #[serde(default)]
    pub events: Vec<ForcedDispatch>,

    #[serde(default = "default_max_ticks")]
    pub max_ticks: usize,
}

impl SchedulerConfig {
    /// Build a configuration with the default tick ceiling
    pub fn new(quantum: usize, processes: Vec<ProcessConfig>, events: Vec<ForcedDispatch>) -> Self {
        Self {
            quantum,
            processes,
            events,
            max_ticks: DEFAULT_MAX_TICKS,
        }
    }

    /// Replace the tick ceiling
    pub fn with_max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Quantum for dispatches out of High (`2q`)
    pub fn high_quantum(&self) -> usize {
        self.quantum.saturating_mul(2)
    }

    /// Quantum for dispatches out of Low (`q`)
    pub fn low_quantum(&self) -> usize {
        self.quantum
    }
}

/// Description of one process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessConfig {
    pub name: String,
    pub pid: Pid,
    pub arrival_tick: usize,
    /// CPU ticks per burst
    pub burst_length: usize,
    pub burst_count: usize,
    /// I/O ticks between bursts
    pub io_wait: usize,
    pub deadline_tick: usize,
}

impl ProcessConfig {
    pub fn new(
        name: impl Into<String>,
        pid: Pid,
        arrival_tick: usize,
        burst_length: usize,
        burst_count: usize,
        io_wait: usize,
        deadline_tick: usize,
    ) -> Self {
        Self {
            name: name.into(),
            pid,
            arrival_tick,
            burst_length,
            burst_count,
            io_wait,
            deadline_tick,
        }
    }

    /// Build the NEW process this entry describes
    ///
    /// Callers must have checked that burst length and count are positive.
    pub(crate) fn to_process(&self) -> Process {
        Process::new(
            self.name.clone(),
            self.pid,
            self.arrival_tick,
            self.burst_length,
            self.burst_count,
            self.io_wait,
            self.deadline_tick,
        )
    }
}
