//! Scheduler identifiers and the options each of them accepts.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::Serialize;

use crate::SchedulerError;

/// The closed set of scheduling algorithms a configuration may name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Algorithm {
    #[serde(rename = "FCFS")]
    Fcfs,
    #[serde(rename = "RR")]
    Rr,
    #[serde(rename = "SPN")]
    Spn,
    #[serde(rename = "SRT")]
    Srt,
    #[serde(rename = "HRRN")]
    Hrrn,
    #[serde(rename = "FEEDBACK")]
    Feedback,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Fcfs,
        Algorithm::Rr,
        Algorithm::Spn,
        Algorithm::Srt,
        Algorithm::Hrrn,
        Algorithm::Feedback,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Algorithm::Fcfs => "FCFS",
            Algorithm::Rr => "RR",
            Algorithm::Spn => "SPN",
            Algorithm::Srt => "SRT",
            Algorithm::Hrrn => "HRRN",
            Algorithm::Feedback => "FEEDBACK",
        }
    }

    /// The options declared for this algorithm.
    pub fn options(self) -> impl Iterator<Item = &'static OptionSpec> {
        SCHEDULER_OPTIONS
            .iter()
            .filter(move |spec| spec.algorithms.contains(&self))
    }

    pub fn option(self, name: &str) -> Option<&'static OptionSpec> {
        self.options().find(|spec| spec.name == name)
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Algorithm {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.id() == s)
            .ok_or_else(|| SchedulerError::UnknownAlgorithm(s.to_string()))
    }
}

/// The type of value an option holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OptionKind {
    Int,
    Bool,
    Float,
}

impl OptionKind {
    /// Parse the textual form of an option value.
    ///
    /// Integers are plain digit strings, booleans are `true` or `false`.
    pub fn parse(self, value: &str) -> Option<OptionValue> {
        match self {
            OptionKind::Int => {
                if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                value.parse().ok().map(OptionValue::Int)
            }
            OptionKind::Bool => match value {
                "true" => Some(OptionValue::Bool(true)),
                "false" => Some(OptionValue::Bool(false)),
                _ => None,
            },
            OptionKind::Float => value.parse().ok().map(OptionValue::Float),
        }
    }
}

impl Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::Int => write!(f, "an integer"),
            OptionKind::Bool => write!(f, "a boolean"),
            OptionKind::Float => write!(f, "a number"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Int(u64),
    Bool(bool),
    Float(f64),
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Int(_) => OptionKind::Int,
            OptionValue::Bool(_) => OptionKind::Bool,
            OptionValue::Float(_) => OptionKind::Float,
        }
    }
}

impl Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Int(value) => write!(f, "{value}"),
            OptionValue::Bool(value) => write!(f, "{value}"),
            OptionValue::Float(value) => write!(f, "{value}"),
        }
    }
}

/// An entry of the option table.
#[derive(Debug)]
pub struct OptionSpec {
    pub algorithms: &'static [Algorithm],
    pub name: &'static str,
    pub kind: OptionKind,
    pub required: bool,
}

pub const SCHEDULER_OPTIONS: &[OptionSpec] = &[
    OptionSpec {
        algorithms: &[Algorithm::Rr, Algorithm::Feedback],
        name: "quantum",
        kind: OptionKind::Int,
        required: true,
    },
    OptionSpec {
        algorithms: &[Algorithm::Feedback],
        name: "num_priorities",
        kind: OptionKind::Int,
        required: false,
    },
    OptionSpec {
        algorithms: &[Algorithm::Spn, Algorithm::Srt, Algorithm::Hrrn],
        name: "service_given",
        kind: OptionKind::Bool,
        required: false,
    },
    OptionSpec {
        algorithms: &[Algorithm::Spn, Algorithm::Srt, Algorithm::Hrrn],
        name: "alpha",
        kind: OptionKind::Float,
        required: false,
    },
];

/// An algorithm together with its options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerConfig {
    pub algorithm: Algorithm,
    pub options: BTreeMap<String, OptionValue>,
}

impl SchedulerConfig {
    pub fn new(algorithm: Algorithm) -> SchedulerConfig {
        SchedulerConfig {
            algorithm,
            options: BTreeMap::new(),
        }
    }

    /// Parse and store an option given in textual form.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), SchedulerError> {
        let spec = self
            .algorithm
            .option(name)
            .ok_or_else(|| SchedulerError::UnknownOption {
                algorithm: self.algorithm,
                option: name.to_string(),
            })?;
        let value = spec
            .kind
            .parse(value)
            .ok_or_else(|| SchedulerError::InvalidOptionValue {
                algorithm: self.algorithm,
                option: name.to_string(),
                expected: spec.kind,
            })?;
        self.options.insert(name.to_string(), value);
        Ok(())
    }

    /// Check the options against the option table.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        for (name, value) in &self.options {
            let spec = self
                .algorithm
                .option(name)
                .ok_or_else(|| SchedulerError::UnknownOption {
                    algorithm: self.algorithm,
                    option: name.clone(),
                })?;
            if value.kind() != spec.kind {
                return Err(SchedulerError::InvalidOptionValue {
                    algorithm: self.algorithm,
                    option: name.clone(),
                    expected: spec.kind,
                });
            }
        }
        if let Some(missing) = self
            .algorithm
            .options()
            .find(|spec| spec.required && !self.options.contains_key(spec.name))
        {
            return Err(SchedulerError::MissingOption {
                algorithm: self.algorithm,
                option: missing.name,
            });
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<OptionValue> {
        self.options.get(name).copied()
    }
}

impl From<Algorithm> for SchedulerConfig {
    fn from(algorithm: Algorithm) -> Self {
        SchedulerConfig::new(algorithm)
    }
}
