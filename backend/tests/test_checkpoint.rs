//! Checkpoint Tests - Save/Load Simulation State
//!
//! Critical invariants tested:
//! - Determinism: a restored run finishes with the same report and event log
//! - Queue integrity: queue order, pins and the CPU slot survive a round trip
//! - Config matching: state taken with a different config is rejected

use scheduler_simulator_core_rs::orchestrator::{compute_config_hash, StateSnapshot};
use scheduler_simulator_core_rs::{
    ForcedDispatch, Orchestrator, ProcessConfig, QueueLevel, SchedulerConfig, SimulationError,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn workload() -> SchedulerConfig {
    SchedulerConfig::new(
        2,
        vec![
            ProcessConfig::new("db", 1, 0, 7, 2, 3, 90),
            ProcessConfig::new("web", 2, 2, 3, 3, 1, 60),
            ProcessConfig::new("log", 3, 3, 4, 1, 0, 25),
            ProcessConfig::new("tmp", 4, 5, 2, 2, 2, 70),
        ],
        vec![ForcedDispatch::new(3, 6), ForcedDispatch::new(4, 11)],
    )
}

fn advanced(config: SchedulerConfig, ticks: usize) -> Orchestrator {
    let mut orchestrator = Orchestrator::new(config).unwrap();
    for _ in 0..ticks {
        orchestrator.tick().unwrap();
    }
    orchestrator
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_restore_at_start() {
    let orchestrator = Orchestrator::new(workload()).unwrap();
    let json = orchestrator.save_state().unwrap();

    let restored = Orchestrator::load_state(workload(), &json).unwrap();
    assert_eq!(restored.current_tick(), 0);
    assert_eq!(restored.state(), orchestrator.state());
    assert_eq!(restored.pending_events(), 2);
}

#[test]
fn test_restore_preserves_queues_and_cpu() {
    // Tick 6 preempts the running process into the pinned prefix of High
    let orchestrator = advanced(workload(), 7);
    let json = orchestrator.save_state().unwrap();
    let restored = Orchestrator::load_state(workload(), &json).unwrap();

    let (before, after) = (orchestrator.state(), restored.state());
    assert_eq!(after.running_pid(), before.running_pid());
    assert_eq!(after.queue_pids(QueueLevel::High), before.queue_pids(QueueLevel::High));
    assert_eq!(after.queue_pids(QueueLevel::Low), before.queue_pids(QueueLevel::Low));
    assert_eq!(after.high().pinned_len(), before.high().pinned_len());
    assert_eq!(after.index_of(3), before.index_of(3));
    assert_eq!(restored.event_log(), orchestrator.event_log());
    assert_eq!(restored.pending_events(), 1);
}

#[test]
fn test_mid_run_restore_matches_uninterrupted_run() {
    let mut uninterrupted = Orchestrator::new(workload()).unwrap();
    let expected = uninterrupted.run().unwrap();

    for split in [1, 6, 9, 14] {
        let json = advanced(workload(), split).save_state().unwrap();
        let mut resumed = Orchestrator::load_state(workload(), &json).unwrap();
        let report = resumed.run().unwrap();

        assert_eq!(report, expected, "diverged after restoring at tick {}", split);
        assert_eq!(resumed.event_log(), uninterrupted.event_log());
    }
}

#[test]
fn test_snapshot_is_plain_json() {
    let json = advanced(workload(), 4).save_state().unwrap();
    let snapshot: StateSnapshot = serde_json::from_str(&json).unwrap();

    assert_eq!(snapshot.current_tick, 4);
    assert_eq!(snapshot.event_cursor, 0);
    assert_eq!(snapshot.config_hash, compute_config_hash(&workload()).unwrap());
    assert_eq!(snapshot.state.num_processes(), 4);
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_different_config_is_rejected() {
    let json = advanced(workload(), 5).save_state().unwrap();

    let mut other = workload();
    other.quantum = 3;
    let err = Orchestrator::load_state(other, &json).unwrap_err();
    assert!(matches!(err, SimulationError::ConfigMismatch { .. }));
}

#[test]
fn test_changed_events_are_rejected() {
    let json = advanced(workload(), 5).save_state().unwrap();

    let mut other = workload();
    other.events.push(ForcedDispatch::new(1, 20));
    assert!(matches!(
        Orchestrator::load_state(other, &json),
        Err(SimulationError::ConfigMismatch { .. })
    ));
}

#[test]
fn test_malformed_json_is_rejected() {
    let err = Orchestrator::load_state(workload(), "{ not json").unwrap_err();
    assert!(matches!(err, SimulationError::SerializationError(_)));
}

#[test]
fn test_tampered_state_is_rejected() {
    let json = advanced(workload(), 5).save_state().unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["state"]["finished_count"] = serde_json::json!(3);

    let err = Orchestrator::load_state(workload(), &value.to_string()).unwrap_err();
    assert!(matches!(err, SimulationError::StateValidationError(_)));
}

#[test]
fn test_invalid_config_is_rejected_before_parsing() {
    let json = advanced(workload(), 2).save_state().unwrap();
    let mut broken = workload();
    broken.quantum = 0;
    assert!(matches!(
        Orchestrator::load_state(broken, &json),
        Err(SimulationError::InvalidConfig(_))
    ));
}
