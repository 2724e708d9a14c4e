use std::collections::VecDeque;

use crate::{Engine, Pid, Scheduler, SchedulerError};

/// First come, first served.
///
/// Non-preemptive; the ready queue is a plain FIFO.
#[derive(Debug, Clone, Default)]
pub struct Fcfs {
    ready_queue: VecDeque<Pid>,
    running: Option<Pid>,
}

impl Fcfs {
    pub fn new() -> Self {
        Fcfs {
            ready_queue: VecDeque::new(),
            running: None,
        }
    }

    pub fn ready_queue(&self) -> impl Iterator<Item = Pid> + '_ {
        self.ready_queue.iter().copied()
    }

    pub fn running(&self) -> Option<Pid> {
        self.running
    }

    fn admit(&mut self, sim: &mut dyn Engine, pid: Pid) -> Result<(), SchedulerError> {
        if !super::admissible(sim, pid) {
            return Ok(());
        }
        let was_empty = self.ready_queue.is_empty();
        self.ready_queue.push_back(pid);
        if was_empty && sim.running_time().is_none() {
            self.start_next(sim)?;
        }
        Ok(())
    }

    fn start_next(&mut self, sim: &mut dyn Engine) -> Result<bool, SchedulerError> {
        let Some(pid) = self.ready_queue.pop_front() else {
            return Ok(false);
        };
        super::start(sim, pid)?;
        self.running = Some(pid);
        Ok(true)
    }
}

impl Scheduler for Fcfs {
    fn initialize(&mut self, sim: &mut dyn Engine) -> Result<(), SchedulerError> {
        super::add_arrivals(sim)
    }

    fn arrive(&mut self, sim: &mut dyn Engine, pid: Pid) -> Result<(), SchedulerError> {
        self.admit(sim, pid)
    }

    fn unblock(&mut self, sim: &mut dyn Engine, pid: Pid) -> Result<(), SchedulerError> {
        self.admit(sim, pid)
    }

    fn idle(&mut self, sim: &mut dyn Engine) -> Result<(), SchedulerError> {
        if !self.start_next(sim)? {
            super::idle(sim);
        }
        Ok(())
    }

    fn stop_running(&mut self, sim: &mut dyn Engine) -> Result<(), SchedulerError> {
        let pid = self.running.take().ok_or(SchedulerError::NotRunning)?;
        sim.set_running_time(None);
        super::release(sim, pid)
    }

    fn timeout(&mut self, _sim: &mut dyn Engine) -> Result<(), SchedulerError> {
        Ok(())
    }
}
