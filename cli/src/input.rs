//! Workload file parser
//!
//! The file is a stream of whitespace-separated tokens; line breaks carry no
//! meaning.
//!
//! ```text
//! q K N
//! NAME PID ARRIVAL BURST_LEN BURST_COUNT IO_WAIT DEADLINE   (K times)
//! PID TICK                                                  (N times)
//! ```

use scheduler_simulator_core_rs::{ForcedDispatch, Pid, ProcessConfig, SchedulerConfig};
use std::str::SplitWhitespace;
use thiserror::Error;

/// Problems found while reading a workload file
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unexpected end of input while reading {field}")]
    UnexpectedEnd { field: String },

    #[error("{field}: expected an integer, found {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("{field} must not be negative (found {value})")]
    Negative { field: String, value: i64 },

    #[error("{field} is out of range (found {value})")]
    OutOfRange { field: String, value: i64 },

    #[error("{count} unexpected token(s) after the declared processes and events, starting at {first:?}")]
    TrailingTokens { count: usize, first: String },
}

/// Parsed contents of a workload file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    pub quantum: usize,
    pub processes: Vec<ProcessConfig>,
    pub events: Vec<ForcedDispatch>,
}

impl Workload {
    /// Build the scheduler configuration, optionally overriding the tick ceiling
    pub fn into_config(self, max_ticks: Option<usize>) -> SchedulerConfig {
        let config = SchedulerConfig::new(self.quantum, self.processes, self.events);
        match max_ticks {
            Some(limit) => config.with_max_ticks(limit),
            None => config,
        }
    }
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
        }
    }

    fn word(&mut self, field: &str) -> Result<&'a str, InputError> {
        self.inner.next().ok_or_else(|| InputError::UnexpectedEnd {
            field: field.to_string(),
        })
    }

    fn integer(&mut self, field: &str) -> Result<i64, InputError> {
        let token = self.word(field)?;
        let value: i64 = token.parse().map_err(|_| InputError::InvalidNumber {
            field: field.to_string(),
            value: token.to_string(),
        })?;
        if value < 0 {
            return Err(InputError::Negative {
                field: field.to_string(),
                value,
            });
        }
        Ok(value)
    }

    fn count(&mut self, field: &str) -> Result<usize, InputError> {
        let value = self.integer(field)?;
        usize::try_from(value).map_err(|_| InputError::OutOfRange {
            field: field.to_string(),
            value,
        })
    }

    fn pid(&mut self, field: &str) -> Result<Pid, InputError> {
        let value = self.integer(field)?;
        Pid::try_from(value).map_err(|_| InputError::OutOfRange {
            field: field.to_string(),
            value,
        })
    }

    fn finish(mut self) -> Result<(), InputError> {
        match self.inner.next() {
            None => Ok(()),
            Some(first) => Err(InputError::TrailingTokens {
                count: 1 + self.inner.count(),
                first: first.to_string(),
            }),
        }
    }
}

/// Parse a workload file
///
/// Semantic checks (zero quantum, duplicate pids, zero bursts) are left to
/// the orchestrator; this only rejects malformed or negative input.
pub fn parse_workload(text: &str) -> Result<Workload, InputError> {
    let mut tokens = Tokens::new(text);

    let quantum = tokens.count("quantum")?;
    let process_count = tokens.count("process count")?;
    let event_count = tokens.count("event count")?;

    // Header counts are unchecked until the lines are read
    let mut processes = Vec::new();
    for i in 1..=process_count {
        let field = |name: &str| format!("process #{} {}", i, name);
        let name = tokens.word(&field("name"))?.to_string();
        processes.push(ProcessConfig {
            name,
            pid: tokens.pid(&field("pid"))?,
            arrival_tick: tokens.count(&field("arrival"))?,
            burst_length: tokens.count(&field("burst length"))?,
            burst_count: tokens.count(&field("burst count"))?,
            io_wait: tokens.count(&field("io wait"))?,
            deadline_tick: tokens.count(&field("deadline"))?,
        });
    }

    let mut events = Vec::new();
    for i in 1..=event_count {
        let pid = tokens.pid(&format!("event #{} pid", i))?;
        let tick = tokens.count(&format!("event #{} tick", i))?;
        events.push(ForcedDispatch::new(pid, tick));
    }

    tokens.finish()?;

    Ok(Workload {
        quantum,
        processes,
        events,
    })
}
