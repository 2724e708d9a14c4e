//! Readers for the process file and the scheduler file.
//!
//! A process file holds one process per line: the arrival time followed by
//! the activity durations, all separated by whitespace. Activities alternate
//! between CPU and I/O and must end with a CPU burst.
//!
//! A scheduler file names the algorithm on its first line, followed by one
//! `option = value` pair per line.

use std::fs;
use std::path::Path;

use scheduler::{Algorithm, Pid, Process, SchedulerConfig, Ticks};
use tracing::debug;

use crate::InputError;

fn parse_duration(token: &str, line: usize) -> Result<Ticks, InputError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::InvalidProcess { line });
    }
    token.parse().map_err(|_| InputError::InvalidProcess { line })
}

/// Parse the contents of a process file.
///
/// Blank lines are skipped. PIDs are assigned in input order, starting
/// from 0.
pub fn parse_processes(text: &str) -> Result<Vec<Process>, InputError> {
    let mut processes = Vec::new();
    for (index, content) in text.lines().enumerate() {
        let line = index + 1;
        if content.trim().is_empty() {
            continue;
        }
        let numbers = content
            .split_whitespace()
            .map(|token| parse_duration(token, line))
            .collect::<Result<Vec<Ticks>, InputError>>()?;

        let (arrival, activities) = match numbers.split_first() {
            Some((arrival, activities)) => (*arrival, activities),
            None => return Err(InputError::InvalidProcess { line }),
        };
        if activities.len() % 2 == 0 {
            return Err(InputError::NoFinalCpu { line });
        }
        if activities.contains(&0) {
            return Err(InputError::ZeroDuration { line });
        }

        let process = Process::new(Pid::new(processes.len()), arrival, activities.to_vec());
        debug!(%process, "parsed process");
        processes.push(process);
    }
    Ok(processes)
}

pub fn read_processes(path: impl AsRef<Path>) -> Result<Vec<Process>, InputError> {
    parse_processes(&fs::read_to_string(path)?)
}

/// Parse the contents of a scheduler file.
///
/// Options are checked against the option table of the algorithm. Whether
/// required options are present is checked when the policy is built.
pub fn parse_scheduler_config(text: &str) -> Result<SchedulerConfig, InputError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, content)| (index + 1, content.trim()))
        .filter(|(_, content)| !content.is_empty());

    let (_, id) = lines.next().ok_or(InputError::MissingAlgorithm)?;
    let algorithm: Algorithm = id.parse()?;
    let mut config = SchedulerConfig::new(algorithm);

    for (line, content) in lines {
        let (name, value) = content
            .split_once('=')
            .map(|(name, value)| (name.trim(), value.trim()))
            .filter(|(name, value)| !name.is_empty() && !value.is_empty() && !value.contains('='))
            .ok_or(InputError::MalformedOption { line })?;
        config
            .set_option(name, value)
            .map_err(|source| InputError::InvalidOption { line, source })?;
    }
    debug!(?config, "parsed scheduler configuration");
    Ok(config)
}

pub fn read_scheduler_config(path: impl AsRef<Path>) -> Result<SchedulerConfig, InputError> {
    parse_scheduler_config(&fs::read_to_string(path)?)
}
