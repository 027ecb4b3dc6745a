//! Checkpoint - Save/Load Simulation State
//!
//! Enables serialization and deserialization of complete orchestrator state
//! for pause/resume functionality.
//!
//! # Critical Invariants
//!
//! - **Determinism**: a restored run produces the same report as one that
//!   was never interrupted
//! - **Queue Integrity**: no orphaned, duplicate or non-READY queue members
//! - **Config Matching**: state can only be loaded with matching config

use crate::models::event::EventLog;
use crate::models::state::SimulationState;
use crate::orchestrator::config::SchedulerConfig;
use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// Snapshot Structure
// ============================================================================

/// Complete orchestrator state snapshot
///
/// The clock, the process table with both queues, the position in the
/// forced-dispatch list and the event log so far. The event list itself is
/// not stored; it comes back from the config on restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Current tick position
    pub current_tick: usize,

    /// Process table, ready queues and CPU slot
    pub state: SimulationState,

    /// Number of forced dispatches already consumed
    pub event_cursor: usize,

    pub event_log: EventLog,

    /// SHA256 hash of original config (for validation)
    pub config_hash: String,
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of config
///
/// Hashes the JSON form of the config. Struct fields serialize in declaration
/// order and the config holds no maps, so equal configs give equal bytes.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    let json = serde_json::to_vec(config).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    let digest = Sha256::digest(&json);
    Ok(format!("{:x}", digest))
}

// ============================================================================
// Validation
// ============================================================================

/// Validate a snapshot against the config it is being restored with
///
/// The snapshot's pid index must already be rebuilt.
///
/// Checks:
/// - the process table lists the configured pids in load order
/// - the event cursor lies within the event list
/// - the state invariants hold (see [`SimulationState::validate`])
pub fn validate_snapshot(
    snapshot: &StateSnapshot,
    config: &SchedulerConfig,
) -> Result<(), SimulationError> {
    let table = snapshot.state.processes();
    if table.len() != config.processes.len() {
        return Err(SimulationError::StateValidationError(format!(
            "Snapshot has {} processes, config has {}",
            table.len(),
            config.processes.len()
        )));
    }

    for (process, expected) in table.iter().zip(&config.processes) {
        if process.pid() != expected.pid {
            return Err(SimulationError::StateValidationError(format!(
                "Process table order differs from config: found pid {}, expected {}",
                process.pid(),
                expected.pid
            )));
        }
    }

    if snapshot.event_cursor > config.events.len() {
        return Err(SimulationError::StateValidationError(format!(
            "Event cursor {} past the {} configured events",
            snapshot.event_cursor,
            config.events.len()
        )));
    }

    snapshot
        .state
        .validate()
        .map_err(SimulationError::StateValidationError)
}
