//! Orchestrator Engine
//!
//! Main simulation loop driving processes through the two-level feedback
//! queue:
//! - Admission of arriving processes
//! - Forced dispatch events (preemption)
//! - I/O completion and deadline enforcement
//! - CPU execution, quantum expiry and demotion
//! - Starvation promotion and dispatch
//! - Event logging (complete simulation history)
//!
//! # Architecture
//!
//! Every tick runs the same phase sequence. All phases observe the same `now`;
//! within a phase processes are visited in load order.
//!
//! ```text
//! For each tick t:
//! 1. Admit NEW processes that have arrived (into High by priority)
//! 2. Accrue one wait tick to every READY or WAITING process
//! 3. Apply forced dispatch events due at t
//! 4. Advance I/O; completed processes re-enter a ready queue
//! 5. Kill processes whose deadline has been reached
//! 6. Execute one CPU tick for the running process
//! 7. Promote starved Low members to High
//! 8. Re-sort both queues
//! 9. Dispatch from High, else Low, if the CPU is idle
//! 10. Advance time
//! ```
//!
//! # Example
//!
//! ```rust
//! use scheduler_simulator_core_rs::{ForcedDispatch, Orchestrator, ProcessConfig, SchedulerConfig};
//!
//! let config = SchedulerConfig::new(
//!     2,
//!     vec![
//!         ProcessConfig::new("batch", 1, 0, 10, 1, 0, 100),
//!         ProcessConfig::new("shell", 2, 1, 2, 1, 0, 100),
//!     ],
//!     vec![ForcedDispatch::new(2, 1)],
//! );
//!
//! let mut orchestrator = Orchestrator::new(config).unwrap();
//!
//! // Step through the first two ticks
//! let first = orchestrator.tick().unwrap();
//! assert_eq!(first.running, Some(1));
//! let second = orchestrator.tick().unwrap();
//! assert_eq!(second.running, Some(2));
//!
//! let report = orchestrator.run().unwrap();
//! assert!(report.completed);
//! ```

use crate::core::time::SimClock;
use crate::events::EventFeed;
use crate::models::event::{Event, EventLog};
use crate::models::process::{CpuOutcome, IoProgress, Pid, ProcessError, ProcessState, QueueLevel};
use crate::models::ready_queue::QueueError;
use crate::models::state::SimulationState;
use crate::orchestrator::checkpoint::{compute_config_hash, validate_snapshot, StateSnapshot};
use crate::orchestrator::config::SchedulerConfig;
use crate::policy::deadline::deadline_reached;
use crate::policy::promotion::should_promote;
use crate::policy::{reentry_for, Reentry};
use crate::stats::SimulationReport;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

// ============================================================================
// Results and Errors
// ============================================================================

/// Summary of one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickResult {
    /// Tick number
    pub tick: usize,

    /// Process holding the CPU once the tick finished
    pub running: Option<Pid>,

    /// Members of High after dispatch
    pub high_len: usize,

    /// Members of Low after dispatch
    pub low_len: usize,

    /// Processes admitted this tick
    pub admitted: usize,

    /// Processes that completed their last burst this tick
    pub finished: usize,

    /// Processes killed by their deadline this tick
    pub killed: usize,
}

/// Simulation error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Broken queue or transition invariant inside the tick loop
    #[error("Internal error: {0}")]
    Internal(String),

    /// Termination condition not met within the tick ceiling
    #[error("Tick limit of {limit} reached before the simulation completed")]
    TickLimitExceeded { limit: usize },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Checkpoint was taken with a different configuration
    #[error("Config mismatch: checkpoint hash {expected}, config hash {actual}")]
    ConfigMismatch { expected: String, actual: String },

    #[error("State validation error: {0}")]
    StateValidationError(String),
}

impl From<ProcessError> for SimulationError {
    fn from(err: ProcessError) -> Self {
        SimulationError::Internal(err.to_string())
    }
}

impl From<QueueError> for SimulationError {
    fn from(err: QueueError) -> Self {
        SimulationError::Internal(err.to_string())
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Main simulation orchestrator
///
/// Owns the process table, both ready queues, the clock, the pending forced
/// dispatches and the event log of one run.
#[derive(Debug)]
pub struct Orchestrator {
    /// Process table, ready queues and CPU slot
    state: SimulationState,

    clock: SimClock,

    /// Forced dispatches not yet applied
    feed: EventFeed,

    /// Complete event log
    event_log: EventLog,

    /// Original configuration (for checkpoints)
    config: SchedulerConfig,
}

impl Orchestrator {
    /// Create a new orchestrator from configuration
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidConfig`] if:
    /// - the quantum or tick ceiling is zero
    /// - there are no processes
    /// - a pid appears twice
    /// - a process has a zero burst length or burst count
    pub fn new(config: SchedulerConfig) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;

        let processes = config.processes.iter().map(|p| p.to_process()).collect();
        let state = SimulationState::new(processes);
        let feed = EventFeed::new(config.events.clone());

        info!(
            processes = config.processes.len(),
            events = config.events.len(),
            quantum = config.quantum,
            "scheduler initialized"
        );

        Ok(Self {
            state,
            clock: SimClock::new(),
            feed,
            event_log: EventLog::new(),
            config,
        })
    }

    /// Validate configuration parameters
    fn validate_config(config: &SchedulerConfig) -> Result<(), SimulationError> {
        if config.quantum == 0 {
            return Err(SimulationError::InvalidConfig(
                "quantum must be > 0".to_string(),
            ));
        }

        if config.max_ticks == 0 {
            return Err(SimulationError::InvalidConfig(
                "max_ticks must be > 0".to_string(),
            ));
        }

        if config.processes.is_empty() {
            return Err(SimulationError::InvalidConfig(
                "Must have at least one process".to_string(),
            ));
        }

        let mut pids = HashSet::new();
        for process in &config.processes {
            if !pids.insert(process.pid) {
                return Err(SimulationError::InvalidConfig(format!(
                    "Duplicate pid: {}",
                    process.pid
                )));
            }
            if process.burst_length == 0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "Process {} ({}) has burst_length 0",
                    process.pid, process.name
                )));
            }
            if process.burst_count == 0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "Process {} ({}) has burst_count 0",
                    process.pid, process.name
                )));
            }
        }

        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get current tick number
    pub fn current_tick(&self) -> usize {
        self.clock.now()
    }

    /// Get reference to simulation state
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Get reference to the event log
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Get total number of logged events
    pub fn event_count(&self) -> usize {
        self.event_log.len()
    }

    /// Forced dispatches not yet applied
    pub fn pending_events(&self) -> usize {
        self.feed.remaining().len()
    }

    fn log_event(&mut self, event: Event) {
        trace!(event = event.event_type(), tick = event.tick(), pid = event.pid(), "event");
        self.event_log.log(event);
    }

    // ========================================================================
    // Main loop
    // ========================================================================

    /// Whether the run has reached its termination condition
    ///
    /// The run continues while a process is still live, or while a forced
    /// dispatch is scheduled at or after the current tick.
    pub fn is_complete(&self) -> bool {
        let now = self.clock.now();
        let events_pending = self
            .feed
            .last_event_tick()
            .is_some_and(|last| now <= last);
        self.state.all_terminal() && !events_pending
    }

    /// Execute one complete tick
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Internal`] if a queue or transition
    /// invariant breaks. The state is left as it was when the error surfaced.
    pub fn tick(&mut self) -> Result<TickResult, SimulationError> {
        let now = self.clock.now();
        let mut result = TickResult {
            tick: now,
            ..TickResult::default()
        };

        // STEP 1: ADMISSION
        self.admit_arrivals(now, &mut result)?;

        // STEP 2: WAITING ACCRUAL
        for idx in 0..self.state.num_processes() {
            self.state.process_at_mut(idx).accrue_wait();
        }

        // STEP 3: FORCED DISPATCH EVENTS
        self.apply_forced_dispatches(now)?;

        // STEP 4: I/O COMPLETION
        self.advance_io(now)?;

        // STEP 5: DEADLINE ENFORCEMENT
        self.enforce_deadlines(now, &mut result)?;

        // STEP 6: CPU TICK
        self.execute_cpu_tick(now, &mut result)?;

        // STEP 7: LOW -> HIGH PROMOTION
        self.promote_starved(now)?;

        // STEP 8: RE-SORT
        self.state.resort_queues(now);

        // STEP 9: DISPATCH
        self.dispatch_next(now)?;

        result.running = self.state.running_pid();
        result.high_len = self.state.high().len();
        result.low_len = self.state.low().len();

        debug!(
            tick = now,
            running = ?result.running,
            high = result.high_len,
            low = result.low_len,
            "tick complete"
        );

        // STEP 10: ADVANCE TIME
        self.clock.advance_tick();

        Ok(result)
    }

    /// Tick until the termination condition holds
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::TickLimitExceeded`] when the clock reaches
    /// `max_ticks` first. The partial state stays available through
    /// [`Orchestrator::report`].
    pub fn run(&mut self) -> Result<SimulationReport, SimulationError> {
        self.run_observed(|_, _| {})
    }

    /// [`run`](Self::run), calling `observer` after every tick with the tick
    /// summary and the events logged during that tick
    pub fn run_observed<F>(&mut self, mut observer: F) -> Result<SimulationReport, SimulationError>
    where
        F: FnMut(&TickResult, &[Event]),
    {
        while !self.is_complete() {
            if self.clock.now() >= self.config.max_ticks {
                warn!(
                    limit = self.config.max_ticks,
                    live = self.state.num_processes() - self.state.finished_count(),
                    "tick ceiling reached"
                );
                return Err(SimulationError::TickLimitExceeded {
                    limit: self.config.max_ticks,
                });
            }

            let logged_before = self.event_log.len();
            let result = self.tick()?;
            observer(&result, &self.event_log.events()[logged_before..]);
        }

        info!(ticks = self.clock.now(), events = self.event_log.len(), "simulation complete");
        Ok(self.report())
    }

    /// Per-process statistics as of the current tick
    pub fn report(&self) -> SimulationReport {
        SimulationReport::from_state(&self.state, self.clock.now(), self.is_complete())
    }

    // ========================================================================
    // Phases
    // ========================================================================

    fn admit_arrivals(&mut self, now: usize, result: &mut TickResult) -> Result<(), SimulationError> {
        for idx in 0..self.state.num_processes() {
            let process = self.state.process_at(idx);
            if process.state() != ProcessState::New || process.arrival_tick() > now {
                continue;
            }

            self.state.process_at_mut(idx).admit()?;
            self.state.enqueue_by_priority(idx, QueueLevel::High, now)?;
            result.admitted += 1;

            let pid = self.state.process_at(idx).pid();
            debug!(tick = now, pid, "admitted");
            self.log_event(Event::Admitted {
                tick: now,
                pid,
                queue: QueueLevel::High,
            });
        }
        Ok(())
    }

    fn apply_forced_dispatches(&mut self, now: usize) -> Result<(), SimulationError> {
        for event in self.feed.take_due(now) {
            let Some(target) = self.state.index_of(event.pid) else {
                warn!(tick = now, pid = event.pid, "forced dispatch names an unknown pid");
                self.log_event(Event::DispatchIgnored {
                    tick: now,
                    pid: event.pid,
                    reason: "unknown pid".to_string(),
                });
                continue;
            };

            let target_state = self.state.process_at(target).state();
            if target_state.is_terminal() {
                debug!(tick = now, pid = event.pid, state = %target_state, "forced dispatch ignored");
                self.log_event(Event::DispatchIgnored {
                    tick: now,
                    pid: event.pid,
                    reason: format!("process already {}", target_state),
                });
                continue;
            }

            if let Some(current) = self.state.running().filter(|&idx| idx != target) {
                self.state.process_at_mut(current).preempt_for_event()?;
                self.state.set_running(None);
                self.state.enqueue_front_of_high(current)?;

                let preempted = self.state.process_at(current).pid();
                debug!(tick = now, pid = preempted, by = event.pid, "preempted");
                self.log_event(Event::Preempted {
                    tick: now,
                    pid: preempted,
                    by: event.pid,
                });
            }

            self.state.remove_from_queues(target);
            let quantum = self.config.high_quantum();
            self.state.process_at_mut(target).force_dispatch(now, quantum)?;
            self.state.set_running(Some(target));

            let burst_left = self.state.process_at(target).burst_time_left();
            debug!(tick = now, pid = event.pid, burst_left, quantum, "forced dispatch");
            self.log_event(Event::ForcedDispatch {
                tick: now,
                pid: event.pid,
                burst_left,
                quantum,
            });
        }
        Ok(())
    }

    fn advance_io(&mut self, now: usize) -> Result<(), SimulationError> {
        for idx in 0..self.state.num_processes() {
            if self.state.process_at(idx).state() != ProcessState::Waiting {
                continue;
            }
            if self.state.process_at_mut(idx).tick_io()? == IoProgress::Pending {
                continue;
            }

            let (queue, front) = match reentry_for(self.state.process_at(idx)) {
                Reentry::FrontOfHigh => {
                    self.state.process_at_mut(idx).take_forced_high();
                    self.state.enqueue_front_of_high(idx)?;
                    (QueueLevel::High, true)
                }
                Reentry::ByPriority(level) => {
                    self.state.enqueue_by_priority(idx, level, now)?;
                    (level, false)
                }
            };

            let pid = self.state.process_at(idx).pid();
            debug!(tick = now, pid, %queue, front, "I/O complete");
            self.log_event(Event::IoCompleted {
                tick: now,
                pid,
                queue,
                front,
            });
        }
        Ok(())
    }

    fn enforce_deadlines(&mut self, now: usize, result: &mut TickResult) -> Result<(), SimulationError> {
        for idx in 0..self.state.num_processes() {
            if !deadline_reached(self.state.process_at(idx), now) {
                continue;
            }

            let was_running = self.state.running() == Some(idx);
            self.state.remove_from_queues(idx);
            self.state.process_at_mut(idx).kill(now)?;
            if was_running {
                self.state.set_running(None);
            }
            self.state.record_terminal();
            result.killed += 1;

            let pid = self.state.process_at(idx).pid();
            debug!(tick = now, pid, was_running, "deadline missed");
            self.log_event(Event::DeadlineMissed {
                tick: now,
                pid,
                was_running,
            });
        }
        Ok(())
    }

    fn execute_cpu_tick(&mut self, now: usize, result: &mut TickResult) -> Result<(), SimulationError> {
        let Some(idx) = self.state.running() else {
            return Ok(());
        };

        let outcome = self.state.process_at_mut(idx).execute_tick(now)?;
        if outcome == CpuOutcome::Installed {
            return Ok(());
        }

        let process = self.state.process_at(idx);
        let pid = process.pid();
        let burst_left = process.burst_time_left();
        let bursts_remaining = process.bursts_remaining();
        let io_wait = process.io_wait();
        self.log_event(Event::CpuTick {
            tick: now,
            pid,
            burst_left,
            quantum_left: process.quantum_left(),
        });

        match outcome {
            CpuOutcome::Installed | CpuOutcome::Continued => {}
            CpuOutcome::BurstCompleted => {
                self.state.set_running(None);
                debug!(tick = now, pid, bursts_remaining, "burst complete, waiting on I/O");
                self.log_event(Event::IoStarted {
                    tick: now,
                    pid,
                    io_wait,
                    bursts_remaining,
                });
            }
            CpuOutcome::Finished => {
                self.state.set_running(None);
                self.state.record_terminal();
                result.finished += 1;
                debug!(tick = now, pid, "finished");
                self.log_event(Event::Finished { tick: now, pid });
            }
            CpuOutcome::QuantumExpired => {
                self.state.set_running(None);
                self.state.enqueue_by_priority(idx, QueueLevel::Low, now)?;
                debug!(tick = now, pid, burst_left, "quantum expired, demoted to Low");
                self.log_event(Event::QuantumExpired {
                    tick: now,
                    pid,
                    burst_left,
                });
            }
        }
        Ok(())
    }

    fn promote_starved(&mut self, now: usize) -> Result<(), SimulationError> {
        for idx in 0..self.state.num_processes() {
            if !should_promote(self.state.process_at(idx), now) {
                continue;
            }

            self.state.remove_from_queues(idx);
            self.state.enqueue_by_priority(idx, QueueLevel::High, now)?;

            let pid = self.state.process_at(idx).pid();
            debug!(tick = now, pid, "promoted to High");
            self.log_event(Event::Promoted { tick: now, pid });
        }
        Ok(())
    }

    fn dispatch_next(&mut self, now: usize) -> Result<(), SimulationError> {
        if self.state.running().is_some() {
            return Ok(());
        }
        let Some((idx, from)) = self.state.pop_next_ready() else {
            return Ok(());
        };

        let quantum = match from {
            QueueLevel::High => self.config.high_quantum(),
            _ => self.config.low_quantum(),
        };
        self.state.process_at_mut(idx).dispatch(now, quantum)?;
        self.state.set_running(Some(idx));

        let process = self.state.process_at(idx);
        let pid = process.pid();
        let burst_left = process.burst_time_left();
        debug!(tick = now, pid, %from, quantum, "dispatched");
        self.log_event(Event::Dispatched {
            tick: now,
            pid,
            from,
            burst_left,
            quantum,
        });
        Ok(())
    }

    // ========================================================================
    // Checkpoint
    // ========================================================================

    /// Serialize the complete run state to JSON
    ///
    /// # Example
    ///
    /// ```rust
    /// use scheduler_simulator_core_rs::{Orchestrator, ProcessConfig, SchedulerConfig};
    ///
    /// let config = SchedulerConfig::new(
    ///     1,
    ///     vec![ProcessConfig::new("a", 1, 0, 4, 2, 1, 50)],
    ///     vec![],
    /// );
    /// let mut orchestrator = Orchestrator::new(config.clone()).unwrap();
    /// orchestrator.tick().unwrap();
    ///
    /// let json = orchestrator.save_state().unwrap();
    /// let restored = Orchestrator::load_state(config, &json).unwrap();
    /// assert_eq!(restored.current_tick(), 1);
    /// ```
    pub fn save_state(&self) -> Result<String, SimulationError> {
        let snapshot = StateSnapshot {
            current_tick: self.clock.now(),
            state: self.state.clone(),
            event_cursor: self.feed.cursor(),
            event_log: self.event_log.clone(),
            config_hash: compute_config_hash(&self.config)?,
        };

        serde_json::to_string(&snapshot).map_err(|e| {
            SimulationError::SerializationError(format!("Snapshot serialization failed: {}", e))
        })
    }

    /// Restore a run from a [`save_state`](Self::save_state) document
    ///
    /// # Errors
    ///
    /// - [`SimulationError::SerializationError`] for malformed JSON
    /// - [`SimulationError::ConfigMismatch`] if the snapshot was taken with a
    ///   different configuration
    /// - [`SimulationError::StateValidationError`] if the snapshot breaks a
    ///   state invariant
    pub fn load_state(config: SchedulerConfig, state_json: &str) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;

        let mut snapshot: StateSnapshot = serde_json::from_str(state_json).map_err(|e| {
            SimulationError::SerializationError(format!("Snapshot deserialization failed: {}", e))
        })?;

        let actual = compute_config_hash(&config)?;
        if snapshot.config_hash != actual {
            return Err(SimulationError::ConfigMismatch {
                expected: snapshot.config_hash,
                actual,
            });
        }

        snapshot.state.rebuild_index();
        validate_snapshot(&snapshot, &config)?;

        info!(tick = snapshot.current_tick, "restored from checkpoint");

        Ok(Self {
            state: snapshot.state,
            clock: SimClock::starting_at(snapshot.current_tick),
            feed: EventFeed::with_cursor(config.events.clone(), snapshot.event_cursor),
            event_log: snapshot.event_log,
            config,
        })
    }
}
