//! Per process timings derived from a trace.

use std::fmt::{self, Display};

use scheduler::{Pid, Process, SchedulingDecision, Ticks};
use serde::Serialize;

use crate::Log;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessStats {
    pub pid: Pid,
    pub arrival: Ticks,
    /// Time the process first got the CPU.
    pub first_start: Option<Ticks>,
    pub finish: Option<Ticks>,
    /// CPU time received.
    pub service: Ticks,
    /// Time spent blocked on I/O.
    pub blocked: Ticks,
}

impl ProcessStats {
    pub fn turnaround(&self) -> Option<Ticks> {
        self.finish.map(|finish| finish - self.arrival)
    }

    pub fn response(&self) -> Option<Ticks> {
        self.first_start.map(|start| start - self.arrival)
    }

    /// Time spent in the ready queue.
    pub fn waiting(&self) -> Option<Ticks> {
        self.turnaround()
            .map(|turnaround| turnaround - self.service - self.blocked)
    }
}

/// Aggregate view over one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub processes: Vec<ProcessStats>,
    /// Time of the last completion.
    pub makespan: Ticks,
    /// Time the CPU spent running bursts.
    pub busy: Ticks,
}

impl Summary {
    pub fn new(processes: &[Process], logs: &[Log]) -> Summary {
        let mut stats: Vec<ProcessStats> = processes
            .iter()
            .map(|process| ProcessStats {
                pid: process.pid(),
                arrival: process.arrival(),
                first_start: None,
                finish: None,
                service: 0,
                blocked: 0,
            })
            .collect();

        for log in logs {
            match log.decision {
                SchedulingDecision::Start { pid, burst } => {
                    if let Some(entry) = stats.get_mut(pid.index()) {
                        entry.first_start.get_or_insert(log.clock);
                        entry.service += burst;
                    }
                }
                SchedulingDecision::Block { pid, duration } => {
                    if let Some(entry) = stats.get_mut(pid.index()) {
                        entry.blocked += duration;
                    }
                }
                SchedulingDecision::Finish { pid } => {
                    if let Some(entry) = stats.get_mut(pid.index()) {
                        entry.finish = Some(log.clock);
                    }
                }
                SchedulingDecision::Idle => {}
            }
        }

        let makespan = stats.iter().filter_map(|s| s.finish).max().unwrap_or(0);
        let busy = stats.iter().map(|s| s.service).sum();
        Summary {
            processes: stats,
            makespan,
            busy,
        }
    }

    pub fn finished(&self) -> usize {
        self.processes.iter().filter(|s| s.finish.is_some()).count()
    }

    fn mean(values: impl Iterator<Item = Ticks>) -> Option<f64> {
        let (sum, count) = values.fold((0, 0), |(sum, count), value| (sum + value, count + 1));
        (count > 0).then(|| sum as f64 / count as f64)
    }

    pub fn mean_turnaround(&self) -> Option<f64> {
        Self::mean(self.processes.iter().filter_map(ProcessStats::turnaround))
    }

    pub fn mean_response(&self) -> Option<f64> {
        Self::mean(self.processes.iter().filter_map(ProcessStats::response))
    }

    pub fn mean_waiting(&self) -> Option<f64> {
        Self::mean(self.processes.iter().filter_map(ProcessStats::waiting))
    }

    /// Fraction of the makespan the CPU was busy.
    pub fn utilization(&self) -> Option<f64> {
        (self.makespan > 0).then(|| self.busy as f64 / self.makespan as f64)
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PID\tARRIVE\tSTART\tFINISH\tTURN\tRESP\tWAIT")?;
        for stats in &self.processes {
            writeln!(
                f,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                stats.pid,
                stats.arrival,
                show(stats.first_start),
                show(stats.finish),
                show(stats.turnaround()),
                show(stats.response()),
                show(stats.waiting()),
            )?;
        }
        write!(
            f,
            "{} of {} processes finished by {}, mean turnaround {}, mean response {}, mean waiting {}, utilization {}",
            self.finished(),
            self.processes.len(),
            self.makespan,
            show_mean(self.mean_turnaround()),
            show_mean(self.mean_response()),
            show_mean(self.mean_waiting()),
            self.utilization()
                .map(|u| format!("{:.1}%", u * 100.0))
                .unwrap_or_else(|| "-".to_string()),
        )
    }
}

fn show(value: Option<Ticks>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn show_mean(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "-".to_string())
}
