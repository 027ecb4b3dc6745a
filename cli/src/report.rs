//! Output rendering: tick log lines, CSV and JSON reports

use scheduler_simulator_core_rs::{
    Event, Pid, QueueLevel, SchedulerConfig, SimulationReport, SummaryStats, TickResult,
};
use serde::Serialize;
use std::collections::HashMap;
use std::io::{self, Write};

pub const CSV_HEADER: &str = "Name,PID,State,Interrupts,Turnaround,Response,Waiting";

/// Display names by pid
pub struct NameTable {
    names: HashMap<Pid, String>,
}

impl NameTable {
    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self {
            names: config
                .processes
                .iter()
                .map(|p| (p.pid, p.name.clone()))
                .collect(),
        }
    }

    /// `name(PID=n)`, or just the pid when it names no process
    pub fn label(&self, pid: Pid) -> String {
        match self.names.get(&pid) {
            Some(name) => format!("{}(PID={})", name, pid),
            None => format!("PID={}", pid),
        }
    }
}

// ============================================================================
// Tick log
// ============================================================================

/// One line of the tick log
pub fn describe_event(event: &Event, names: &NameTable) -> String {
    let body = match event {
        Event::Admitted { pid, queue, .. } => {
            format!("New process {} enters READY in {}", names.label(*pid), queue)
        }
        Event::ForcedDispatch {
            pid,
            burst_left,
            quantum,
            ..
        } => format!(
            "[EVENT] {} forced onto the CPU with burst={}, quantum={}",
            names.label(*pid),
            burst_left,
            quantum
        ),
        Event::Preempted { pid, by, .. } => format!(
            "[EVENT] Interrupting {} for {}",
            names.label(*pid),
            names.label(*by)
        ),
        Event::DispatchIgnored { pid, reason, .. } => {
            format!("[EVENT] Dispatch of {} ignored: {}", names.label(*pid), reason)
        }
        Event::IoStarted {
            pid,
            io_wait,
            bursts_remaining,
            ..
        } => format!(
            "{} finished a burst, WAITING on I/O for {} ticks ({} bursts left)",
            names.label(*pid),
            io_wait,
            bursts_remaining
        ),
        Event::IoCompleted {
            pid, queue, front, ..
        } => {
            let place = if *front { "front of " } else { "" };
            format!(
                "{} finished I/O, back to READY at {}{}",
                names.label(*pid),
                place,
                queue
            )
        }
        Event::DeadlineMissed {
            pid, was_running, ..
        } => {
            let where_ = if *was_running { " on the CPU" } else { "" };
            format!("DEADLINE: {} died{}", names.label(*pid), where_)
        }
        Event::QuantumExpired {
            pid, burst_left, ..
        } => format!(
            "{} used its quantum with burst={} left, demoted to {}",
            names.label(*pid),
            burst_left,
            QueueLevel::Low
        ),
        Event::Finished { pid, .. } => format!("{} FINISHED", names.label(*pid)),
        Event::Promoted { pid, .. } => {
            format!("PROMOTION: {} moves from Low to High", names.label(*pid))
        }
        Event::Dispatched {
            pid,
            from,
            burst_left,
            quantum,
            ..
        } => format!(
            "{} enters CPU from {} with burst={}, quantum={}",
            names.label(*pid),
            from,
            burst_left,
            quantum
        ),
        Event::CpuTick {
            pid,
            burst_left,
            quantum_left,
            ..
        } => format!(
            "{} executing, burst={}, quantum={}",
            names.label(*pid),
            burst_left,
            quantum_left
        ),
    };
    format!("[tick {}] {}", event.tick(), body)
}

/// Closing line of each tick in the log
pub fn status_line(result: &TickResult, names: &NameTable) -> String {
    let running = result
        .running
        .map_or_else(|| "none".to_string(), |pid| names.label(pid));
    format!(
        "[tick {}] Status: RUNNING={} | High={} | Low={}",
        result.tick, running, result.high_len, result.low_len
    )
}

// ============================================================================
// Reports
// ============================================================================

/// Write the per-process CSV report, rows sorted by pid
///
/// Absent turnaround and response values are written as -1.
pub fn write_csv<W: Write>(out: &mut W, report: &SimulationReport) -> io::Result<()> {
    writeln!(out, "{}", CSV_HEADER)?;
    for row in &report.processes {
        writeln!(
            out,
            "{},{},{},{},{},{},{}",
            row.name,
            row.pid,
            row.status,
            row.interruptions,
            row.turnaround.unwrap_or(-1),
            row.response.unwrap_or(-1),
            row.waiting
        )?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    #[serde(flatten)]
    report: &'a SimulationReport,
    summary: SummaryStats,
}

/// Write the report and its summary as one pretty-printed JSON document
pub fn write_json<W: Write>(out: &mut W, report: &SimulationReport) -> serde_json::Result<()> {
    let document = JsonDocument {
        report,
        summary: report.summary(),
    };
    serde_json::to_writer_pretty(&mut *out, &document)?;
    writeln!(out).map_err(serde_json::Error::io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scheduler_simulator_core_rs::{Orchestrator, ProcessConfig};

    fn finished_report() -> SimulationReport {
        let config = SchedulerConfig::new(
            2,
            vec![
                ProcessConfig::new("zeta", 9, 0, 2, 1, 0, 50),
                ProcessConfig::new("alpha", 3, 0, 3, 1, 0, 4),
                ProcessConfig::new("late", 5, 10, 1, 1, 0, 3),
            ],
            vec![],
        );
        Orchestrator::new(config).unwrap().run().unwrap()
    }

    fn names() -> NameTable {
        NameTable {
            names: [(1, "shell".to_string())].into_iter().collect(),
        }
    }

    #[test]
    fn test_csv_sorted_with_absent_values() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &finished_report()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], CSV_HEADER);
        // alpha has the closer deadline and runs first; late dies before arriving
        assert_eq!(lines[1], "alpha,3,DEAD,0,5,0,1");
        assert_eq!(lines[2], "late,5,DEAD,0,-6,-1,0");
        assert_eq!(lines[3], "zeta,9,FINISHED,0,7,4,5");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_json_has_rows_and_summary() {
        let mut buf = Vec::new();
        write_json(&mut buf, &finished_report()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["processes"][0]["pid"], 3);
        assert_eq!(value["processes"][0]["status"], "DEAD");
        assert_eq!(value["summary"]["dead"], 2);
        assert_eq!(value["summary"]["finished"], 1);
        assert_eq!(value["final_tick"], 8);
        assert_eq!(value["completed"], true);
    }

    #[test]
    fn test_event_lines() {
        let names = names();
        let dispatched = Event::Dispatched {
            tick: 4,
            pid: 1,
            from: QueueLevel::Low,
            burst_left: 3,
            quantum: 2,
        };
        assert_eq!(
            describe_event(&dispatched, &names),
            "[tick 4] shell(PID=1) enters CPU from Low with burst=3, quantum=2"
        );

        let ignored = Event::DispatchIgnored {
            tick: 7,
            pid: 42,
            reason: "unknown pid".to_string(),
        };
        assert_eq!(
            describe_event(&ignored, &names),
            "[tick 7] [EVENT] Dispatch of PID=42 ignored: unknown pid"
        );
    }

    #[test]
    fn test_status_line_idle_cpu() {
        let result = TickResult {
            tick: 12,
            high_len: 2,
            ..TickResult::default()
        };
        assert_eq!(
            status_line(&result, &names()),
            "[tick 12] Status: RUNNING=none | High=2 | Low=0"
        );
    }
}
