//! Orchestrator - main simulation loop
//!
//! Implements the complete tick loop integrating all simulation components.
//!
//! See `engine.rs` for full implementation.

pub mod checkpoint;
pub mod config;
pub mod engine;

// Re-export main types for convenience
pub use config::{ProcessConfig, SchedulerConfig, DEFAULT_MAX_TICKS};
pub use engine::{Orchestrator, SimulationError, TickResult};

// Re-export checkpoint types
pub use checkpoint::{compute_config_hash, StateSnapshot};
