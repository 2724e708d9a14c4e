use crate::options::{Algorithm, OptionValue, SchedulerConfig};
use crate::{Engine, Pid, Scheduler, SchedulerError};

/// Shortest process next.
///
/// Non-preemptive; the ready queue is ordered by the length of each
/// process's next burst, equal lengths keep their admission order.
#[derive(Debug, Clone, Default)]
pub struct Spn {
    ready_queue: Vec<Pid>,
    running: Option<Pid>,
}

impl Spn {
    pub fn new() -> Self {
        Spn {
            ready_queue: Vec::new(),
            running: None,
        }
    }

    /// Build the policy from its configuration.
    ///
    /// Only actual service times are supported, so `service_given` must
    /// not be `false`. `alpha` has to lie in `(0, 1]`.
    pub fn with_options(config: &SchedulerConfig) -> Result<Self, SchedulerError> {
        if let Some(OptionValue::Bool(false)) = config.get("service_given") {
            return Err(SchedulerError::UnsupportedOption {
                algorithm: Algorithm::Spn,
                option: "service_given",
                value: "false".to_string(),
            });
        }
        if let Some(OptionValue::Float(alpha)) = config.get("alpha") {
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(SchedulerError::UnsupportedOption {
                    algorithm: Algorithm::Spn,
                    option: "alpha",
                    value: alpha.to_string(),
                });
            }
        }
        Ok(Spn::new())
    }

    pub fn ready_queue(&self) -> &[Pid] {
        &self.ready_queue
    }

    pub fn running(&self) -> Option<Pid> {
        self.running
    }

    fn add_to_ready_queue(&mut self, sim: &dyn Engine, pid: Pid) {
        self.ready_queue.push(pid);
        // stable, so earlier admissions win ties
        self.ready_queue.sort_by_key(|pid| sim.next_burst(*pid));
    }

    fn admit(&mut self, sim: &mut dyn Engine, pid: Pid) -> Result<(), SchedulerError> {
        if !super::admissible(sim, pid) {
            return Ok(());
        }
        self.add_to_ready_queue(sim, pid);
        if sim.running_time().is_none() {
            self.start_next_process(sim)?;
        }
        Ok(())
    }

    fn start_next_process(&mut self, sim: &mut dyn Engine) -> Result<bool, SchedulerError> {
        if self.ready_queue.is_empty() {
            return Ok(false);
        }
        let pid = self.ready_queue.remove(0);
        super::start(sim, pid)?;
        self.running = Some(pid);
        Ok(true)
    }
}

impl Scheduler for Spn {
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
        if !self.start_next_process(sim)? {
            super::idle(sim);
        }
        Ok(())
    }

    fn stop_running(&mut self, sim: &mut dyn Engine) -> Result<(), SchedulerError> {
        sim.set_running_time(None);
        let pid = self.running.take().ok_or(SchedulerError::NotRunning)?;
        super::release(sim, pid)
    }

    fn timeout(&mut self, _sim: &mut dyn Engine) -> Result<(), SchedulerError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedulers::testing::{Pending, RecordingEngine};
    use crate::SchedulingDecision;

    #[test]
    fn ready_queue_sorted_by_next_burst() {
        let mut sim = RecordingEngine::new(&[(0, &[10]), (0, &[7]), (0, &[3]), (0, &[7])]);
        let mut spn = Spn::new();
        for pid in 0..4 {
            spn.arrive(&mut sim, Pid::new(pid)).unwrap();
        }

        assert_eq!(spn.running(), Some(Pid::new(0)));
        assert_eq!(
            spn.ready_queue(),
            &[Pid::new(2), Pid::new(1), Pid::new(3)]
        );
    }

    #[test]
    fn does_not_preempt() {
        let mut sim = RecordingEngine::new(&[(0, &[8]), (1, &[4])]);
        let mut spn = Spn::new();
        spn.arrive(&mut sim, Pid::new(0)).unwrap();
        sim.clock = 1;
        sim.running_time = Some(7);
        spn.arrive(&mut sim, Pid::new(1)).unwrap();

        assert_eq!(spn.running(), Some(Pid::new(0)));
        assert_eq!(sim.running_time, Some(7));
        assert_eq!(sim.started(), vec![0]);
    }

    #[test]
    fn stop_running_leaves_cpu_idle() {
        let mut sim = RecordingEngine::new(&[(0, &[2]), (0, &[1])]);
        let mut spn = Spn::new();
        spn.arrive(&mut sim, Pid::new(0)).unwrap();
        spn.arrive(&mut sim, Pid::new(1)).unwrap();

        sim.clock = 2;
        spn.stop_running(&mut sim).unwrap();

        assert_eq!(sim.running_time, None);
        assert_eq!(spn.ready_queue(), &[Pid::new(1)]);
        assert_eq!(
            sim.decisions.last(),
            Some(&(2, SchedulingDecision::Finish { pid: Pid::new(0) }))
        );

        spn.idle(&mut sim).unwrap();
        assert_eq!(sim.running_time, Some(1));
        assert_eq!(sim.started(), vec![0, 1]);
    }

    #[test]
    fn unblock_takes_engine_then_process() {
        // process 1 is the only one that can be unblocked; passing the
        // arguments the other way round would not compile, and a mixup of
        // PIDs would start process 0 instead
        let mut sim = RecordingEngine::new(&[(0, &[4]), (0, &[1, 3, 2])]);
        sim.cursors[1] = 2;
        sim.clock = 7;
        let mut spn = Spn::new();

        spn.unblock(&mut sim, Pid::new(1)).unwrap();

        assert_eq!(spn.running(), Some(Pid::new(1)));
        assert_eq!(sim.running_time, Some(2));
        assert_eq!(
            sim.decisions,
            vec![(
                7,
                SchedulingDecision::Start {
                    pid: Pid::new(1),
                    burst: 2
                }
            )]
        );
    }

    #[test]
    fn unblock_after_final_io_finishes() {
        let mut sim = RecordingEngine::new(&[(0, &[1, 3])]);
        sim.cursors[0] = 2;
        let mut spn = Spn::new();
        spn.unblock(&mut sim, Pid::new(0)).unwrap();

        assert!(spn.ready_queue().is_empty());
        assert_eq!(
            sim.decisions,
            vec![(0, SchedulingDecision::Finish { pid: Pid::new(0) })]
        );
        assert_eq!(sim.pending, Vec::<Pending>::new());
    }

    #[test]
    fn options() {
        let mut config = SchedulerConfig::new(Algorithm::Spn);
        assert!(Spn::with_options(&config).is_ok());

        config.set_option("alpha", "0.5").unwrap();
        config.set_option("service_given", "true").unwrap();
        assert!(Spn::with_options(&config).is_ok());

        config.set_option("alpha", "1.5").unwrap();
        assert!(Spn::with_options(&config).is_err());

        config.set_option("alpha", "0.5").unwrap();
        config.set_option("service_given", "false").unwrap();
        assert_eq!(
            Spn::with_options(&config).unwrap_err(),
            SchedulerError::UnsupportedOption {
                algorithm: Algorithm::Spn,
                option: "service_given",
                value: "false".to_string()
            }
        );
    }
}
