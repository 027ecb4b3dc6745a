//! Process model
//!
//! Represents one simulated task. Each process has:
//! - Identity (pid, display name)
//! - Static parameters (arrival, burst length, I/O wait, deadline)
//! - Dynamic scheduling state (lifecycle state, burst/quantum/I/O counters)
//! - Statistics (first response, end tick, waiting ticks, interruptions)
//!
//! All transitions go through methods on [`Process`], each of which checks the
//! lifecycle state it starts from. Queue membership is owned by
//! [`SimulationState`](crate::models::state::SimulationState); a process only
//! remembers which tier it last occupied.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Process identifier
pub type Pid = u32;

/// Lifecycle state of a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessState {
    /// Not yet arrived
    New,
    /// Sitting in the High or Low ready queue
    Ready,
    /// Holding the CPU
    Running,
    /// Blocked on I/O between bursts
    Waiting,
    /// All bursts completed
    Finished,
    /// Killed by its deadline
    Dead,
}

impl ProcessState {
    /// FINISHED and DEAD never transition again
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessState::Finished | ProcessState::Dead)
    }

    /// Upper-case label used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessState::New => "NEW",
            ProcessState::Ready => "READY",
            ProcessState::Running => "RUNNING",
            ProcessState::Waiting => "WAITING",
            ProcessState::Finished => "FINISHED",
            ProcessState::Dead => "DEAD",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ready-queue tier a process last occupied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueLevel {
    /// Never queued, or installed directly on the CPU by a forced dispatch
    #[default]
    None,
    High,
    Low,
}

impl fmt::Display for QueueLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QueueLevel::None => "none",
            QueueLevel::High => "High",
            QueueLevel::Low => "Low",
        };
        f.write_str(label)
    }
}

/// Result of one CPU tick for the running process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuOutcome {
    /// First tick on the CPU; burst and quantum untouched
    Installed,
    /// Still running
    Continued,
    /// Burst done, more bursts left; process is now WAITING
    BurstCompleted,
    /// Last burst done; process is now FINISHED
    Finished,
    /// Quantum used up mid-burst; process is now READY
    QuantumExpired,
}

/// Result of one I/O tick for a waiting process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoProgress {
    /// I/O was already drained; process is now READY
    Completed,
    /// Still waiting; `io_remaining` was decremented
    Pending,
}

/// Errors raised by illegal lifecycle transitions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProcessError {
    #[error("process {pid} cannot {action} while {state}")]
    InvalidTransition {
        pid: Pid,
        state: ProcessState,
        action: &'static str,
    },
}

/// One simulated task
///
/// # Example
/// ```
/// use scheduler_simulator_core_rs::{Process, ProcessState};
///
/// let mut p = Process::new("editor".to_string(), 7, 0, 5, 2, 3, 100);
/// assert_eq!(p.state(), ProcessState::New);
///
/// p.admit().unwrap();
/// assert_eq!(p.state(), ProcessState::Ready);
/// assert_eq!(p.burst_time_left(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pid: Pid,
    name: String,

    arrival_tick: usize,
    burst_length: usize,
    bursts_remaining: usize,
    io_wait: usize,
    deadline_tick: usize,

    state: ProcessState,
    burst_time_left: usize,
    quantum_left: usize,
    io_remaining: usize,
    last_cpu_exit_tick: Option<usize>,
    queue_level: QueueLevel,
    /// Must re-enter at the front of High the next time it becomes READY
    forced_high: bool,
    /// Set on the tick the process is installed on the CPU
    just_started: bool,

    first_response_tick: Option<usize>,
    end_tick: Option<usize>,
    wait_ticks: usize,
    interruptions: usize,
}

impl Process {
    /// Create a process in state NEW
    ///
    /// # Arguments
    /// * `name` - Display name
    /// * `pid` - Unique process id
    /// * `arrival_tick` - First tick the process may be admitted
    /// * `burst_length` - Ticks of CPU per burst
    /// * `burst_count` - Number of bursts before the process finishes
    /// * `io_wait` - Ticks of I/O between bursts
    /// * `deadline_tick` - Tick at which an unfinished process is killed
    ///
    /// # Panics
    /// Panics if `burst_length` or `burst_count` is zero
    pub fn new(
        name: String,
        pid: Pid,
        arrival_tick: usize,
        burst_length: usize,
        burst_count: usize,
        io_wait: usize,
        deadline_tick: usize,
    ) -> Self {
        assert!(burst_length > 0, "burst_length must be positive");
        assert!(burst_count > 0, "burst_count must be positive");

        Self {
            pid,
            name,
            arrival_tick,
            burst_length,
            bursts_remaining: burst_count,
            io_wait,
            deadline_tick,
            state: ProcessState::New,
            burst_time_left: burst_length,
            quantum_left: 0,
            io_remaining: 0,
            last_cpu_exit_tick: None,
            queue_level: QueueLevel::None,
            forced_high: false,
            just_started: false,
            first_response_tick: None,
            end_tick: None,
            wait_ticks: 0,
            interruptions: 0,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arrival_tick(&self) -> usize {
        self.arrival_tick
    }

    pub fn burst_length(&self) -> usize {
        self.burst_length
    }

    pub fn bursts_remaining(&self) -> usize {
        self.bursts_remaining
    }

    pub fn io_wait(&self) -> usize {
        self.io_wait
    }

    pub fn deadline_tick(&self) -> usize {
        self.deadline_tick
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn burst_time_left(&self) -> usize {
        self.burst_time_left
    }

    pub fn quantum_left(&self) -> usize {
        self.quantum_left
    }

    pub fn io_remaining(&self) -> usize {
        self.io_remaining
    }

    /// Tick the process last left the CPU (None if it never ran)
    pub fn last_cpu_exit_tick(&self) -> Option<usize> {
        self.last_cpu_exit_tick
    }

    /// Tier the process last occupied
    pub fn queue_level(&self) -> QueueLevel {
        self.queue_level
    }

    pub fn is_forced_high(&self) -> bool {
        self.forced_high
    }

    pub fn is_just_started(&self) -> bool {
        self.just_started
    }

    pub fn first_response_tick(&self) -> Option<usize> {
        self.first_response_tick
    }

    pub fn end_tick(&self) -> Option<usize> {
        self.end_tick
    }

    /// Ticks spent READY or WAITING
    pub fn wait_ticks(&self) -> usize {
        self.wait_ticks
    }

    pub fn interruptions(&self) -> usize {
        self.interruptions
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// `end_tick - arrival_tick`, if the process reached a terminal state
    ///
    /// Negative when a process is killed before it arrives.
    pub fn turnaround(&self) -> Option<i64> {
        self.end_tick
            .map(|end| end as i64 - self.arrival_tick as i64)
    }

    /// `first_response_tick - arrival_tick`, if the process ever ran
    pub fn response(&self) -> Option<i64> {
        self.first_response_tick
            .map(|first| first as i64 - self.arrival_tick as i64)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    fn expect_state(&self, expected: ProcessState, action: &'static str) -> Result<(), ProcessError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> ProcessError {
        ProcessError::InvalidTransition {
            pid: self.pid,
            state: self.state,
            action,
        }
    }

    fn record_response(&mut self, now: usize) {
        if self.first_response_tick.is_none() {
            self.first_response_tick = Some(now);
        }
    }

    /// NEW -> READY with a fresh burst
    pub fn admit(&mut self) -> Result<(), ProcessError> {
        self.expect_state(ProcessState::New, "be admitted")?;
        self.state = ProcessState::Ready;
        self.burst_time_left = self.burst_length;
        Ok(())
    }

    /// Count one tick of waiting if READY or WAITING
    ///
    /// Returns whether the tick was counted.
    pub fn accrue_wait(&mut self) -> bool {
        match self.state {
            ProcessState::Ready | ProcessState::Waiting => {
                self.wait_ticks += 1;
                true
            }
            _ => false,
        }
    }

    /// RUNNING -> READY because a forced dispatch took the CPU
    ///
    /// The process is flagged for front-of-High re-entry.
    pub fn preempt_for_event(&mut self) -> Result<(), ProcessError> {
        self.expect_state(ProcessState::Running, "be preempted")?;
        self.state = ProcessState::Ready;
        self.interruptions += 1;
        self.forced_high = true;
        self.just_started = false;
        Ok(())
    }

    /// Any non-terminal state -> RUNNING, bypassing the ready queues
    ///
    /// Pending I/O is discarded. A NEW process gets its first burst. The
    /// caller must already have removed the process from any ready queue.
    pub fn force_dispatch(&mut self, now: usize, quantum: usize) -> Result<(), ProcessError> {
        if self.is_terminal() {
            return Err(self.invalid("be force-dispatched"));
        }
        match self.state {
            ProcessState::Waiting => self.io_remaining = 0,
            ProcessState::New => self.burst_time_left = self.burst_length,
            _ => {}
        }
        self.state = ProcessState::Running;
        self.queue_level = QueueLevel::None;
        self.forced_high = false;
        self.just_started = true;
        self.quantum_left = quantum;
        self.record_response(now);
        Ok(())
    }

    /// Advance I/O by one tick
    ///
    /// A process whose I/O is already drained becomes READY with a fresh
    /// burst; it does not consume a tick of I/O on the way out.
    pub fn tick_io(&mut self) -> Result<IoProgress, ProcessError> {
        self.expect_state(ProcessState::Waiting, "do I/O")?;
        if self.io_remaining == 0 {
            self.state = ProcessState::Ready;
            self.burst_time_left = self.burst_length;
            Ok(IoProgress::Completed)
        } else {
            self.io_remaining -= 1;
            Ok(IoProgress::Pending)
        }
    }

    /// Consume the front-of-High re-entry flag
    ///
    /// Returns whether the flag was set.
    pub fn take_forced_high(&mut self) -> bool {
        std::mem::replace(&mut self.forced_high, false)
    }

    /// Non-terminal -> DEAD at `now`; `end_tick` is `now + 1`
    pub fn kill(&mut self, now: usize) -> Result<(), ProcessError> {
        if self.is_terminal() {
            return Err(self.invalid("be killed"));
        }
        self.state = ProcessState::Dead;
        self.end_tick = Some(now + 1);
        self.just_started = false;
        Ok(())
    }

    /// READY -> RUNNING from a ready queue with a fresh quantum
    pub fn dispatch(&mut self, now: usize, quantum: usize) -> Result<(), ProcessError> {
        self.expect_state(ProcessState::Ready, "be dispatched")?;
        self.state = ProcessState::Running;
        self.quantum_left = quantum;
        self.just_started = true;
        self.forced_high = false;
        self.record_response(now);
        Ok(())
    }

    /// Run one CPU tick
    ///
    /// The tick that installs a process only clears `just_started`. Otherwise
    /// burst and quantum both shrink by one; burst exhaustion wins over quantum
    /// exhaustion when both happen on the same tick.
    pub fn execute_tick(&mut self, now: usize) -> Result<CpuOutcome, ProcessError> {
        self.expect_state(ProcessState::Running, "execute")?;

        if self.just_started {
            self.just_started = false;
            return Ok(CpuOutcome::Installed);
        }

        self.burst_time_left = self.burst_time_left.saturating_sub(1);
        self.quantum_left = self.quantum_left.saturating_sub(1);

        if self.burst_time_left == 0 {
            self.bursts_remaining = self.bursts_remaining.saturating_sub(1);
            self.last_cpu_exit_tick = Some(now);
            if self.bursts_remaining == 0 {
                self.state = ProcessState::Finished;
                self.end_tick = Some(now);
                Ok(CpuOutcome::Finished)
            } else {
                self.state = ProcessState::Waiting;
                self.io_remaining = self.io_wait;
                self.interruptions += 1;
                Ok(CpuOutcome::BurstCompleted)
            }
        } else if self.quantum_left == 0 {
            self.state = ProcessState::Ready;
            self.interruptions += 1;
            self.last_cpu_exit_tick = Some(now);
            Ok(CpuOutcome::QuantumExpired)
        } else {
            Ok(CpuOutcome::Continued)
        }
    }

    /// Record the tier the process was just queued in
    pub(crate) fn set_queue_level(&mut self, level: QueueLevel) {
        self.queue_level = level;
    }
}
