// SPDX-License-Identifier: MIT

//! Audit-journal record types.
//!
//! One [`AuditRecord`] is written per pipeline substep checkpoint. The
//! journal built from these records is the sole source of truth for
//! crash recovery (see [`crate::resume`]).

use std::fmt;
use std::time::SystemTime;

/// One of the six steps of the transfer pipeline, `0` meaning "between
/// files" (no step in progress).
pub type Step = u8;

/// Checkpoint within a step: start-record, precondition, side-effect,
/// verify, stop-record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Substep {
    A,
    B,
    C,
    D,
    E,
}

impl Substep {
    pub const ALL: [Substep; 5] = [Substep::A, Substep::B, Substep::C, Substep::D, Substep::E];

    fn as_str(self) -> &'static str {
        match self {
            Substep::A => "a",
            Substep::B => "b",
            Substep::C => "c",
            Substep::D => "d",
            Substep::E => "e",
        }
    }
}

impl fmt::Display for Substep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Substep {
    type Err = AuditParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" => Ok(Substep::A),
            "b" => Ok(Substep::B),
            "c" => Ok(Substep::C),
            "d" => Ok(Substep::D),
            "e" => Ok(Substep::E),
            other => Err(AuditParseError::BadField {
                field: "substep",
                value: other.to_string(),
            }),
        }
    }
}

/// Whether a record marks the start or the stop of a substep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Start,
    Stop,
}

impl RecordStatus {
    fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Start => "start",
            RecordStatus::Stop => "stop",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RecordStatus {
    type Err = AuditParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(RecordStatus::Start),
            "stop" => Ok(RecordStatus::Stop),
            other => Err(AuditParseError::BadField {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// The outcome of a record. Only `stop` records ever carry `pass`/`fail`;
/// `start` records are always `tbd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordResult {
    Tbd,
    Pass,
    Fail,
}

impl RecordResult {
    fn as_str(self) -> &'static str {
        match self {
            RecordResult::Tbd => "tbd",
            RecordResult::Pass => "pass",
            RecordResult::Fail => "fail",
        }
    }
}

impl fmt::Display for RecordResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RecordResult {
    type Err = AuditParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tbd" => Ok(RecordResult::Tbd),
            "pass" => Ok(RecordResult::Pass),
            "fail" => Ok(RecordResult::Fail),
            other => Err(AuditParseError::BadField {
                field: "result",
                value: other.to_string(),
            }),
        }
    }
}

/// A single journal line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub timestamp: SystemTime,
    pub feed: String,
    /// Just the file's basename; empty when no file is in flight.
    pub fn_: String,
    pub step: Step,
    pub substep: Substep,
    pub status: RecordStatus,
    pub result: RecordResult,
    pub bytes: Option<u64>,
    pub error: Option<String>,
}

/// A line in the journal that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuditParseError {
    #[error("too few fields in journal line (got {got}, need at least {need})")]
    TooFewFields { got: usize, need: usize },
    #[error("bad {field} value {value:?}")]
    BadField { field: &'static str, value: String },
}
