//! Scheduler Simulator Core - Rust Engine
//!
//! Discrete-tick simulator of a preemptive two-level feedback CPU scheduler
//! with deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Simulation clock
//! - **models**: Domain types (Process, ReadyQueue, State, Event log)
//! - **events**: Forced dispatch events and their feed
//! - **policy**: Priority, deadline, promotion and re-entry rules
//! - **orchestrator**: Main simulation loop and checkpoints
//! - **stats**: Per-process report
//!
//! # Critical Invariants
//!
//! 1. At most one process is RUNNING at any tick boundary
//! 2. A process sits in a ready queue only while READY
//! 3. Priority is recomputed at every comparison, never cached
//! 4. No randomness: identical inputs give identical reports

// Module declarations
pub mod core;
pub mod events;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod stats;

// Re-exports for convenience
pub use core::time::SimClock;
pub use events::{EventFeed, ForcedDispatch};
pub use models::{
    event::{Event, EventLog},
    process::{Pid, Process, ProcessError, ProcessState, QueueLevel},
    ready_queue::QueueError,
    state::SimulationState,
};
pub use orchestrator::{
    Orchestrator, ProcessConfig, SchedulerConfig, SimulationError, StateSnapshot, TickResult,
    DEFAULT_MAX_TICKS,
};
pub use stats::{ProcessReport, ReportStatus, SimulationReport, SummaryStats};
