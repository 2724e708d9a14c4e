//! A scheduler library.
//!
//! This library provides the traits and structures necessary
//! to implement a CPU scheduling policy that is driven by a
//! discrete event simulation engine.
//!

mod error;
mod scheduler;

pub mod options;

pub use crate::error::SchedulerError;
pub use crate::options::{Algorithm, OptionValue, SchedulerConfig};
pub use crate::scheduler::{Engine, Pid, Process, Scheduler, SchedulingDecision, Ticks};

mod schedulers;

pub use schedulers::{Fcfs, Policy, Spn};

/// Returns a first come, first served policy.
pub fn fcfs() -> Policy {
    Policy::Fcfs(Fcfs::new())
}

/// Returns a shortest process next policy that uses the actual length
/// of each burst.
pub fn spn() -> Policy {
    Policy::Spn(Spn::new())
}

/// Returns the policy described by `config`.
///
/// * `config` - the algorithm and its options. Construction fails if a
///              required option is missing, if an option has the wrong
///              type, or if the algorithm is declared but not implemented.
pub fn from_config(config: &SchedulerConfig) -> Result<Policy, SchedulerError> {
    Policy::from_config(config)
}
