//! Domain models for the scheduler simulator

pub mod event;
pub mod process;
pub mod ready_queue;
pub mod state;

// Re-exports
pub use event::{Event, EventLog};
pub use process::{CpuOutcome, IoProgress, Pid, Process, ProcessError, ProcessState, QueueLevel};
pub use ready_queue::{QueueError, ReadyQueue};
pub use state::SimulationState;
