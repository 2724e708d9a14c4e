use thiserror::Error;

use crate::options::{Algorithm, OptionKind};
use crate::{Pid, Ticks};

/// Errors raised while building or driving a scheduler.
#[derive(Debug, Error, PartialEq)]
pub enum SchedulerError {
    #[error("invalid scheduler id: {0}")]
    UnknownAlgorithm(String),
    #[error("scheduler {0} is not implemented")]
    UnsupportedAlgorithm(Algorithm),
    #[error("scheduler {algorithm} requires option `{option}`")]
    MissingOption {
        algorithm: Algorithm,
        option: &'static str,
    },
    #[error("option `{option}` of scheduler {algorithm} expects {expected}")]
    InvalidOptionValue {
        algorithm: Algorithm,
        option: String,
        expected: OptionKind,
    },
    #[error("scheduler {algorithm} has no option `{option}`")]
    UnknownOption { algorithm: Algorithm, option: String },
    #[error("scheduler {algorithm} does not support {option} = {value}")]
    UnsupportedOption {
        algorithm: Algorithm,
        option: &'static str,
        value: String,
    },
    #[error("process {0} has no activity left")]
    NoBurst(Pid),
    #[error("no process is running")]
    NotRunning,
    #[error("unknown process {0}")]
    UnknownPid(Pid),
    #[error("event for process {pid} at time {time} is earlier than the clock ({clock})")]
    EventInPast { pid: Pid, time: Ticks, clock: Ticks },
    #[error("activity of process {pid} ends past the largest representable time")]
    TimeOverflow { pid: Pid },
}
