//! Event logging for simulation replay and auditing.
//!
//! This module defines the Event enum which captures every state change the
//! tick driver makes. Events enable:
//! - Rendering the tick-by-tick log (done outside the core)
//! - Debugging (understand what happened and when)
//! - Auditing (check transitions against scheduling rules)
//!
//! # Event Types
//!
//! Events are categorized by tick phase:
//! - **Admission**: NEW process enters High
//! - **Forced dispatch**: exogenous event installs a process, preempting another
//! - **I/O**: burst completion into WAITING, I/O completion back to READY
//! - **Deadline**: process killed by its deadline
//! - **CPU**: quantum expiry, process completion
//! - **Promotion / Dispatch**: queue movements and CPU installs
//!
//! # Example
//!
//! ```rust
//! use scheduler_simulator_core_rs::models::{Event, QueueLevel};
//!
//! let event = Event::Admitted {
//!     tick: 3,
//!     pid: 42,
//!     queue: QueueLevel::High,
//! };
//!
//! assert_eq!(event.tick(), 3);
//! assert_eq!(event.pid(), 42);
//! ```

use crate::models::process::{Pid, QueueLevel};
use serde::{Deserialize, Serialize};

/// Simulation event capturing a state change.
///
/// All events include a tick number for temporal ordering.
/// Events are logged in the order they occur within a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// NEW process arrived and was queued
    Admitted {
        tick: usize,
        pid: Pid,
        queue: QueueLevel,
    },

    /// Forced dispatch installed a process on the CPU
    ForcedDispatch {
        tick: usize,
        pid: Pid,
        burst_left: usize,
        quantum: usize,
    },

    /// Running process lost the CPU to a forced dispatch
    Preempted {
        tick: usize,
        pid: Pid,
        by: Pid,
    },

    /// Forced dispatch that could not be applied
    DispatchIgnored {
        tick: usize,
        pid: Pid,
        reason: String,
    },

    /// Burst completed with bursts left; process blocked on I/O
    IoStarted {
        tick: usize,
        pid: Pid,
        io_wait: usize,
        bursts_remaining: usize,
    },

    /// I/O drained; process is READY again
    IoCompleted {
        tick: usize,
        pid: Pid,
        queue: QueueLevel,
        front: bool,
    },

    /// Deadline reached before completion
    DeadlineMissed {
        tick: usize,
        pid: Pid,
        was_running: bool,
    },

    /// Quantum used up mid-burst; demoted to Low
    QuantumExpired {
        tick: usize,
        pid: Pid,
        burst_left: usize,
    },

    /// Last burst completed
    Finished {
        tick: usize,
        pid: Pid,
    },

    /// Starved Low member moved to High
    Promoted {
        tick: usize,
        pid: Pid,
    },

    /// Ready queue head installed on the CPU
    Dispatched {
        tick: usize,
        pid: Pid,
        from: QueueLevel,
        burst_left: usize,
        quantum: usize,
    },

    /// One CPU tick executed by the running process
    CpuTick {
        tick: usize,
        pid: Pid,
        burst_left: usize,
        quantum_left: usize,
    },
}

impl Event {
    /// Get the tick number when this event occurred
    pub fn tick(&self) -> usize {
        match self {
            Event::Admitted { tick, .. } => *tick,
            Event::ForcedDispatch { tick, .. } => *tick,
            Event::Preempted { tick, .. } => *tick,
            Event::DispatchIgnored { tick, .. } => *tick,
            Event::IoStarted { tick, .. } => *tick,
            Event::IoCompleted { tick, .. } => *tick,
            Event::DeadlineMissed { tick, .. } => *tick,
            Event::QuantumExpired { tick, .. } => *tick,
            Event::Finished { tick, .. } => *tick,
            Event::Promoted { tick, .. } => *tick,
            Event::Dispatched { tick, .. } => *tick,
            Event::CpuTick { tick, .. } => *tick,
        }
    }

    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::Admitted { .. } => "Admitted",
            Event::ForcedDispatch { .. } => "ForcedDispatch",
            Event::Preempted { .. } => "Preempted",
            Event::DispatchIgnored { .. } => "DispatchIgnored",
            Event::IoStarted { .. } => "IoStarted",
            Event::IoCompleted { .. } => "IoCompleted",
            Event::DeadlineMissed { .. } => "DeadlineMissed",
            Event::QuantumExpired { .. } => "QuantumExpired",
            Event::Finished { .. } => "Finished",
            Event::Promoted { .. } => "Promoted",
            Event::Dispatched { .. } => "Dispatched",
            Event::CpuTick { .. } => "CpuTick",
        }
    }

    /// Get the pid of the process the event is about
    ///
    /// Unknown pids in ignored dispatches are reported as-is.
    pub fn pid(&self) -> Pid {
        match self {
            Event::Admitted { pid, .. }
            | Event::ForcedDispatch { pid, .. }
            | Event::Preempted { pid, .. }
            | Event::DispatchIgnored { pid, .. }
            | Event::IoStarted { pid, .. }
            | Event::IoCompleted { pid, .. }
            | Event::DeadlineMissed { pid, .. }
            | Event::QuantumExpired { pid, .. }
            | Event::Finished { pid, .. }
            | Event::Promoted { pid, .. }
            | Event::Dispatched { pid, .. }
            | Event::CpuTick { pid, .. } => *pid,
        }
    }
}

/// Event log for storing and querying simulation events.
///
/// This is a simple wrapper around Vec<Event> with convenience methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Get the number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events for a specific tick
    pub fn events_at_tick(&self, tick: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific process
    pub fn events_for_pid(&self, pid: Pid) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.pid() == pid)
            .collect()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
