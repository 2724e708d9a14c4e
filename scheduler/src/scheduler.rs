use std::fmt::{self, Display};

use serde::Serialize;

use crate::SchedulerError;

/// Simulated time, both as an instant and as a duration.
pub type Ticks = usize;

/// The PID of a process
///
/// PIDs are assigned by input order and start from 0.
#[derive(PartialEq, Eq, Copy, Clone, Hash, Ord, PartialOrd, Serialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Pid(usize);

impl Pid {
    pub fn new(pid: usize) -> Pid {
        Pid(pid)
    }

    /// Position of the process in the workload.
    pub fn index(self) -> usize {
        self.0
    }
}

impl PartialEq<usize> for Pid {
    fn eq(&self, other: &usize) -> bool {
        self.0 == *other
    }
}

impl Display for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A workload entry.
///
/// Activities alternate between CPU (even positions) and I/O (odd
/// positions). The record itself is never mutated by a simulation, the
/// engine tracks how far each process got with a separate cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pid: Pid,
    arrival: Ticks,
    bursts: Vec<Ticks>,
}

impl Process {
    pub fn new(pid: Pid, arrival: Ticks, bursts: Vec<Ticks>) -> Process {
        Process {
            pid,
            arrival,
            bursts,
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn arrival(&self) -> Ticks {
        self.arrival
    }

    pub fn bursts(&self) -> &[Ticks] {
        &self.bursts
    }

    /// Sum of all the activity durations of the process.
    pub fn total_time(&self) -> Ticks {
        self.bursts.iter().sum()
    }
}

impl Display for Process {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Process {}, Arrive {}: {:?}",
            self.pid, self.arrival, self.bursts
        )
    }
}

/// A decision taken by a scheduler, as it shows up in the trace.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum SchedulingDecision {
    /// The process with PID `pid` got the CPU for a burst of `burst` time units.
    Start { pid: Pid, burst: Ticks },
    /// The process left the CPU and waits `duration` time units for I/O.
    Block { pid: Pid, duration: Ticks },
    /// The process has no activities left.
    Finish { pid: Pid },
    /// Nothing is ready to run.
    Idle,
}

impl Display for SchedulingDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulingDecision::Start { pid, burst } => {
                write!(f, "Process {} started for {} units", pid, burst)
            }
            SchedulingDecision::Block { pid, duration } => {
                write!(f, "Process {} blocked for {} units", pid, duration)
            }
            SchedulingDecision::Finish { pid } => {
                write!(f, "Process {} finished", pid)
            }
            SchedulingDecision::Idle => {
                write!(f, "CPU idle")
            }
        }
    }
}

/// The operations that a simulation engine offers to the scheduler.
///
/// The engine only knows how much of the current burst is left; which
/// process owns the CPU is tracked by the scheduler.
pub trait Engine {
    /// The current simulated time.
    fn clock(&self) -> Ticks;

    /// The remaining time of the burst occupying the CPU, [`None`] if the
    /// CPU is idle.
    fn running_time(&self) -> Option<Ticks>;

    fn set_running_time(&mut self, running_time: Option<Ticks>);

    /// The workload, indexed by PID.
    fn processes(&self) -> &[Process];

    /// Schedule an ARRIVAL event at the arrival time of the process.
    fn add_arrival(&mut self, pid: Pid) -> Result<(), SchedulerError>;

    /// Schedule an UNBLOCK event `delay` time units from now.
    fn add_unblock_event(&mut self, pid: Pid, delay: Ticks) -> Result<(), SchedulerError>;

    /// The next activity of the process, without consuming it.
    fn next_burst(&self, pid: Pid) -> Option<Ticks>;

    /// Consume the next activity of the process.
    fn take_burst(&mut self, pid: Pid) -> Result<Ticks, SchedulerError>;

    /// Append a decision to the trace, stamped with the current clock.
    fn record(&mut self, decision: SchedulingDecision);
}

/// The trait that any scheduler has to implement.
///
/// Every callback receives the engine first. Callbacks must not re-enter
/// the engine's control loop.
pub trait Scheduler {
    /// Called once before the simulation starts.
    fn initialize(&mut self, sim: &mut dyn Engine) -> Result<(), SchedulerError>;

    /// The process reached its arrival time.
    fn arrive(&mut self, sim: &mut dyn Engine, pid: Pid) -> Result<(), SchedulerError>;

    /// The process came back from I/O.
    fn unblock(&mut self, sim: &mut dyn Engine, pid: Pid) -> Result<(), SchedulerError>;

    /// All events of the current instant were handled and the CPU is idle.
    fn idle(&mut self, sim: &mut dyn Engine) -> Result<(), SchedulerError>;

    /// The burst of the running process has elapsed.
    ///
    /// On return the CPU must be idle (`running_time` is [`None`]) or
    /// running a newly selected process.
    fn stop_running(&mut self, sim: &mut dyn Engine) -> Result<(), SchedulerError>;

    /// The time quantum of the running process expired.
    fn timeout(&mut self, sim: &mut dyn Engine) -> Result<(), SchedulerError>;
}
