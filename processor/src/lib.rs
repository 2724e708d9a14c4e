//! A processor simulation library
//!
//! This is used for replaying a workload under a scheduler from the
//! [`scheduler`] crate. Time is logical: the engine jumps from one
//! instant where something can change to the next.

use std::fmt::Display;

use scheduler::{Engine, Pid, Process, Scheduler, SchedulerError, SchedulingDecision, Ticks};
use serde::Serialize;
use tracing::{debug, trace};

mod error;
mod event_queue;
pub mod input;
mod stats;

pub use crate::error::{InputError, SimError};
pub use crate::event_queue::{Event, EventKind, EventQueue};
pub use crate::stats::{ProcessStats, Summary};

/// A trace entry: a scheduling decision and the time it was taken.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Log {
    pub clock: Ticks,
    #[serde(flatten)]
    pub decision: SchedulingDecision,
}

impl Display for Log {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "At time {}, {}", self.clock, self.decision)
    }
}

/// The engine state that schedulers can reach through [`Engine`].
struct SimState {
    clock: Ticks,
    running_time: Option<Ticks>,
    events: EventQueue,
    processes: Vec<Process>,
    /// Index of the next activity of every process.
    cursors: Vec<usize>,
    logs: Vec<Log>,
}

impl SimState {
    fn process(&self, pid: Pid) -> Result<&Process, SchedulerError> {
        self.processes
            .get(pid.index())
            .ok_or(SchedulerError::UnknownPid(pid))
    }

    fn schedule(&mut self, event: Event) -> Result<(), SchedulerError> {
        if event.time < self.clock {
            return Err(SchedulerError::EventInPast {
                pid: event.pid,
                time: event.time,
                clock: self.clock,
            });
        }
        trace!(%event, "event scheduled");
        self.events.push(event);
        Ok(())
    }

    /// The largest step the clock can take before something has to happen.
    ///
    /// [`None`] when there is nothing queued and nothing running.
    fn time_forward(&mut self) -> Result<Option<Ticks>, SimError> {
        if self.events.has_event() {
            Ok(Some(self.events.peek()?.time - self.clock))
        } else {
            Ok(self.running_time)
        }
    }
}

impl Engine for SimState {
    fn clock(&self) -> Ticks {
        self.clock
    }

    fn running_time(&self) -> Option<Ticks> {
        self.running_time
    }

    fn set_running_time(&mut self, running_time: Option<Ticks>) {
        self.running_time = running_time;
    }

    fn processes(&self) -> &[Process] {
        &self.processes
    }

    fn add_arrival(&mut self, pid: Pid) -> Result<(), SchedulerError> {
        let time = self.process(pid)?.arrival();
        self.schedule(Event::new(EventKind::Arrival, pid, time))
    }

    fn add_unblock_event(&mut self, pid: Pid, delay: Ticks) -> Result<(), SchedulerError> {
        self.process(pid)?;
        let time = self
            .clock
            .checked_add(delay)
            .ok_or(SchedulerError::TimeOverflow { pid })?;
        self.schedule(Event::new(EventKind::Unblock, pid, time))
    }

    fn next_burst(&self, pid: Pid) -> Option<Ticks> {
        let cursor = *self.cursors.get(pid.index())?;
        self.processes[pid.index()].bursts().get(cursor).copied()
    }

    fn take_burst(&mut self, pid: Pid) -> Result<Ticks, SchedulerError> {
        let burst = self.next_burst(pid).ok_or(SchedulerError::NoBurst(pid))?;
        self.cursors[pid.index()] += 1;
        Ok(burst)
    }

    fn record(&mut self, decision: SchedulingDecision) {
        let log = Log {
            clock: self.clock,
            decision,
        };
        debug!(%log, "decision");
        self.logs.push(log);
    }
}

/// The simulation engine.
///
/// The engine owns the clock, the event queue and the remaining time of
/// the burst on the CPU. Everything else, including which process is
/// running, belongs to the scheduler.
pub struct Sim<S: Scheduler> {
    state: SimState,
    scheduler: S,
}

impl<S: Scheduler> Sim<S> {
    /// Prepare a simulation.
    ///
    /// * `processes` - the workload; the PID of every process must be its
    ///                 index in the vector.
    /// * `scheduler` - the policy that decides what runs.
    pub fn new(processes: Vec<Process>, scheduler: S) -> Self {
        debug_assert!(
            processes.iter().enumerate().all(|(i, p)| p.pid() == i),
            "PIDs must match workload positions"
        );
        Sim {
            state: SimState {
                clock: 0,
                running_time: None,
                events: EventQueue::new(),
                cursors: vec![0; processes.len()],
                processes,
                logs: Vec::new(),
            },
            scheduler,
        }
    }

    pub fn clock(&self) -> Ticks {
        self.state.clock
    }

    pub fn processes(&self) -> &[Process] {
        &self.state.processes
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// The decisions taken so far.
    pub fn logs(&self) -> &[Log] {
        &self.state.logs
    }

    /// Run the simulation until nothing is queued and nothing is running,
    /// then return the trace of scheduling decisions.
    pub fn run(mut self) -> Result<Vec<Log>, SimError> {
        self.simulate()?;
        Ok(self.state.logs)
    }

    /// Run the simulation in place; the trace is available from [`Sim::logs`].
    pub fn simulate(&mut self) -> Result<(), SimError> {
        self.scheduler.initialize(&mut self.state)?;

        let mut step = self.state.time_forward()?;
        while let Some(delta) = step {
            if self.handle_time_done(delta)? {
                // a completion can expose further completions at the same instant
                step = self.state.time_forward()?;
                while let Some(delta) = step {
                    if !self.handle_time_done(delta)? {
                        break;
                    }
                    step = self.state.time_forward()?;
                }
            } else {
                if let Some(running_time) = self.state.running_time {
                    self.state.running_time = Some(running_time - delta);
                }
                self.state.clock = self.state.events.peek()?.time;
                trace!(clock = self.state.clock, "clock advanced to next event");
                let event = self.state.events.pop()?;
                self.process_event(event)?;
            }

            while self.state.events.has_event() && self.state.events.peek()?.time == self.state.clock
            {
                let event = self.state.events.pop()?;
                self.process_event(event)?;
            }

            if self.state.running_time.is_none() {
                self.scheduler.idle(&mut self.state)?;
            }
            step = self.state.time_forward()?;
        }

        debug!(clock = self.state.clock, "simulation done");
        Ok(())
    }

    /// Complete the running burst if it ends within `delta`.
    ///
    /// Returns `true` if a burst completed.
    fn handle_time_done(&mut self, delta: Ticks) -> Result<bool, SimError> {
        match self.state.running_time {
            Some(running_time) if running_time <= delta => {
                self.state.clock += running_time;
                self.state.running_time = None;
                trace!(clock = self.state.clock, "burst completed");
                self.scheduler.stop_running(&mut self.state)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn process_event(&mut self, event: Event) -> Result<(), SimError> {
        debug!(%event, "dispatching event");
        match event.kind {
            EventKind::Arrival => self.scheduler.arrive(&mut self.state, event.pid)?,
            EventKind::Unblock => self.scheduler.unblock(&mut self.state, event.pid)?,
        }
        Ok(())
    }
}

/// Format the [`Sim`]'s logs to a [`String`].
///
/// * `logs` - the logs returned by [`Sim::run`].
///
/// ## Example
///
/// ```rust
/// use processor::{format_logs, Sim};
/// use scheduler::{Pid, Process};
///
/// let processes = vec![
///     Process::new(Pid::new(0), 0, vec![5]),
///     Process::new(Pid::new(1), 2, vec![3]),
/// ];
/// let logs = Sim::new(processes, scheduler::fcfs()).run().unwrap();
///
/// println!("{}", format_logs(&logs));
/// ```
pub fn format_logs(logs: &[Log]) -> String {
    logs.iter().map(|log| format!("{log}\n")).collect()
}
