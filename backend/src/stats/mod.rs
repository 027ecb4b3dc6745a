//! Run statistics
//!
//! Turns the final process table into a report: one row per process with its
//! terminal status, interruption count and the three timing figures, plus a
//! few aggregates across the run.
//!
//! ```text
//! turnaround = end_tick - arrival_tick
//! response   = first_response_tick - arrival_tick
//! waiting    = ticks spent READY or WAITING
//! ```
//!
//! Turnaround and response are absent when the tick they depend on was never
//! recorded. Renderers print absent values as `-1`.

use crate::models::process::{Pid, Process, ProcessState};
use crate::models::state::SimulationState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse status shown in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Finished,
    Dead,
    /// Still live when the run stopped (only after an abort)
    Other,
}

impl ReportStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::Finished => "FINISHED",
            ReportStatus::Dead => "DEAD",
            ReportStatus::Other => "OTHER",
        }
    }
}

impl From<ProcessState> for ReportStatus {
    fn from(state: ProcessState) -> Self {
        match state {
            ProcessState::Finished => ReportStatus::Finished,
            ProcessState::Dead => ReportStatus::Dead,
            _ => ReportStatus::Other,
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Final figures for one process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessReport {
    pub name: String,
    pub pid: Pid,
    pub status: ReportStatus,
    pub state: ProcessState,
    pub interruptions: usize,
    pub turnaround: Option<i64>,
    pub response: Option<i64>,
    pub waiting: usize,
    pub end_tick: Option<usize>,
    pub first_response_tick: Option<usize>,
}

impl ProcessReport {
    pub fn from_process(process: &Process) -> Self {
        Self {
            name: process.name().to_string(),
            pid: process.pid(),
            status: process.state().into(),
            state: process.state(),
            interruptions: process.interruptions(),
            turnaround: process.turnaround(),
            response: process.response(),
            waiting: process.wait_ticks(),
            end_tick: process.end_tick(),
            first_response_tick: process.first_response_tick(),
        }
    }
}

/// Aggregates across every process in a report
///
/// Means skip processes whose figure is absent and are `None` when no
/// process has one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub finished: usize,
    pub dead: usize,
    pub other: usize,
    pub mean_turnaround: Option<f64>,
    pub mean_response: Option<f64>,
    pub mean_waiting: Option<f64>,
}

fn mean<I: Iterator<Item = i64>>(values: I) -> Option<f64> {
    let (sum, count) = values.fold((0i64, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}

/// Report for a whole run
///
/// # Example
///
/// ```rust
/// use scheduler_simulator_core_rs::{Orchestrator, ProcessConfig, SchedulerConfig};
///
/// let config = SchedulerConfig::new(
///     2,
///     vec![ProcessConfig::new("solo", 1, 0, 3, 1, 0, 100)],
///     vec![],
/// );
/// let report = Orchestrator::new(config).unwrap().run().unwrap();
///
/// let solo = report.get(1).unwrap();
/// assert_eq!(solo.status.label(), "FINISHED");
/// assert_eq!(solo.response, Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Value of the clock when the report was taken
    pub final_tick: usize,
    /// Whether the run reached its termination condition
    pub completed: bool,
    /// Rows sorted by pid
    pub processes: Vec<ProcessReport>,
}

impl SimulationReport {
    pub fn from_state(state: &SimulationState, final_tick: usize, completed: bool) -> Self {
        let mut processes: Vec<ProcessReport> = state
            .processes()
            .iter()
            .map(ProcessReport::from_process)
            .collect();
        processes.sort_by_key(|row| row.pid);

        Self {
            final_tick,
            completed,
            processes,
        }
    }

    /// Row for a pid
    pub fn get(&self, pid: Pid) -> Option<&ProcessReport> {
        self.processes
            .binary_search_by_key(&pid, |row| row.pid)
            .ok()
            .map(|pos| &self.processes[pos])
    }

    fn count(&self, status: ReportStatus) -> usize {
        self.processes.iter().filter(|row| row.status == status).count()
    }

    pub fn summary(&self) -> SummaryStats {
        SummaryStats {
            finished: self.count(ReportStatus::Finished),
            dead: self.count(ReportStatus::Dead),
            other: self.count(ReportStatus::Other),
            mean_turnaround: mean(self.processes.iter().filter_map(|r| r.turnaround)),
            mean_response: mean(self.processes.iter().filter_map(|r| r.response)),
            mean_waiting: mean(self.processes.iter().map(|r| r.waiting as i64)),
        }
    }
}
