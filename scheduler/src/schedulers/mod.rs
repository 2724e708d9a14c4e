//! The scheduling policies.
//!
//! Every policy implements the full [`Scheduler`] contract and is
//! listed in [`Policy`], so adding a policy means adding a variant
//! there.

use tracing::debug;

use crate::options::{Algorithm, SchedulerConfig};
use crate::{Engine, Pid, Scheduler, SchedulerError, SchedulingDecision};

mod fcfs;
pub use fcfs::Fcfs;

mod spn;
pub use spn::Spn;

/// The implemented scheduling policies.
#[derive(Debug, Clone)]
pub enum Policy {
    Fcfs(Fcfs),
    Spn(Spn),
}

impl Policy {
    /// Build the policy named by `config`, rejecting missing or
    /// mistyped options.
    pub fn from_config(config: &SchedulerConfig) -> Result<Policy, SchedulerError> {
        config.validate()?;
        match config.algorithm {
            Algorithm::Fcfs => Ok(Policy::Fcfs(Fcfs::new())),
            Algorithm::Spn => Spn::with_options(config).map(Policy::Spn),
            other => Err(SchedulerError::UnsupportedAlgorithm(other)),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Policy::Fcfs(_) => Algorithm::Fcfs,
            Policy::Spn(_) => Algorithm::Spn,
        }
    }
}

impl Scheduler for Policy {
    fn initialize(&mut self, sim: &mut dyn Engine) -> Result<(), SchedulerError> {
        match self {
            Policy::Fcfs(s) => s.initialize(sim),
            Policy::Spn(s) => s.initialize(sim),
        }
    }

    fn arrive(&mut self, sim: &mut dyn Engine, pid: Pid) -> Result<(), SchedulerError> {
        match self {
            Policy::Fcfs(s) => s.arrive(sim, pid),
            Policy::Spn(s) => s.arrive(sim, pid),
        }
    }

    fn unblock(&mut self, sim: &mut dyn Engine, pid: Pid) -> Result<(), SchedulerError> {
        match self {
            Policy::Fcfs(s) => s.unblock(sim, pid),
            Policy::Spn(s) => s.unblock(sim, pid),
        }
    }

    fn idle(&mut self, sim: &mut dyn Engine) -> Result<(), SchedulerError> {
        match self {
            Policy::Fcfs(s) => s.idle(sim),
            Policy::Spn(s) => s.idle(sim),
        }
    }

    fn stop_running(&mut self, sim: &mut dyn Engine) -> Result<(), SchedulerError> {
        match self {
            Policy::Fcfs(s) => s.stop_running(sim),
            Policy::Spn(s) => s.stop_running(sim),
        }
    }

    fn timeout(&mut self, sim: &mut dyn Engine) -> Result<(), SchedulerError> {
        match self {
            Policy::Fcfs(s) => s.timeout(sim),
            Policy::Spn(s) => s.timeout(sim),
        }
    }
}

/// Register the arrival of every process of the workload.
fn add_arrivals(sim: &mut dyn Engine) -> Result<(), SchedulerError> {
    let pids: Vec<Pid> = sim.processes().iter().map(|p| p.pid()).collect();
    for pid in pids {
        sim.add_arrival(pid)?;
    }
    Ok(())
}

/// Give the CPU to `pid` for its next burst.
fn start(sim: &mut dyn Engine, pid: Pid) -> Result<(), SchedulerError> {
    let burst = sim.take_burst(pid)?;
    sim.clock()
        .checked_add(burst)
        .ok_or(SchedulerError::TimeOverflow { pid })?;
    sim.set_running_time(Some(burst));
    debug!(%pid, burst, clock = sim.clock(), "process started");
    sim.record(SchedulingDecision::Start { pid, burst });
    Ok(())
}

/// Returns `false` and records the completion if the process has nothing
/// left to do, so it must not be admitted.
fn admissible(sim: &mut dyn Engine, pid: Pid) -> bool {
    if sim.next_burst(pid).is_some() {
        true
    } else {
        finish(sim, pid);
        false
    }
}

fn finish(sim: &mut dyn Engine, pid: Pid) {
    debug!(%pid, clock = sim.clock(), "process finished");
    sim.record(SchedulingDecision::Finish { pid });
}

/// Hand a process whose CPU burst just elapsed over to its next activity.
///
/// The activity following a CPU burst is I/O, which is modelled as an
/// UNBLOCK event after the I/O duration.
fn release(sim: &mut dyn Engine, pid: Pid) -> Result<(), SchedulerError> {
    if sim.next_burst(pid).is_none() {
        finish(sim, pid);
        return Ok(());
    }
    let duration = sim.take_burst(pid)?;
    sim.add_unblock_event(pid, duration)?;
    debug!(%pid, duration, clock = sim.clock(), "process blocked");
    sim.record(SchedulingDecision::Block { pid, duration });
    Ok(())
}

fn idle(sim: &mut dyn Engine) {
    debug!(clock = sim.clock(), "cpu idle");
    sim.record(SchedulingDecision::Idle);
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::{Engine, Pid, Process, SchedulerError, SchedulingDecision, Ticks};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Pending {
        Arrival(Pid, Ticks),
        Unblock(Pid, Ticks),
    }

    /// An engine that only records what the scheduler asks for.
    pub struct RecordingEngine {
        pub clock: Ticks,
        pub running_time: Option<Ticks>,
        pub processes: Vec<Process>,
        pub cursors: Vec<usize>,
        pub pending: Vec<Pending>,
        pub decisions: Vec<(Ticks, SchedulingDecision)>,
    }

    impl RecordingEngine {
        pub fn new(workload: &[(Ticks, &[Ticks])]) -> Self {
            let processes: Vec<Process> = workload
                .iter()
                .enumerate()
                .map(|(pid, (arrival, bursts))| Process::new(Pid::new(pid), *arrival, bursts.to_vec()))
                .collect();
            RecordingEngine {
                clock: 0,
                running_time: None,
                cursors: vec![0; processes.len()],
                processes,
                pending: Vec::new(),
                decisions: Vec::new(),
            }
        }

        pub fn started(&self) -> Vec<usize> {
            self.decisions
                .iter()
                .filter_map(|(_, decision)| match decision {
                    SchedulingDecision::Start { pid, .. } => Some(pid.index()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Engine for RecordingEngine {
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
            let process = self
                .processes
                .get(pid.index())
                .ok_or(SchedulerError::UnknownPid(pid))?;
            self.pending.push(Pending::Arrival(pid, process.arrival()));
            Ok(())
        }

        fn add_unblock_event(&mut self, pid: Pid, delay: Ticks) -> Result<(), SchedulerError> {
            self.pending.push(Pending::Unblock(pid, self.clock + delay));
            Ok(())
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
            self.decisions.push((self.clock, decision));
        }
    }
}
