use scheduler::SchedulerError;
use thiserror::Error;

/// Errors that stop a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("{operation} on empty EventQueue")]
    EmptyQueue { operation: &'static str },
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
}

/// Errors found while reading a process or scheduler file.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid process at line {line}")]
    InvalidProcess { line: usize },
    #[error("Process with no final CPU activity at line {line}")]
    NoFinalCpu { line: usize },
    #[error("Zero length activity at line {line}")]
    ZeroDuration { line: usize },
    #[error("Scheduler file does not name an algorithm")]
    MissingAlgorithm,
    #[error("Invalid Scheduler option at line {line}")]
    MalformedOption { line: usize },
    #[error("Invalid Scheduler option at line {line}: {source}")]
    InvalidOption {
        line: usize,
        #[source]
        source: SchedulerError,
    },
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}
