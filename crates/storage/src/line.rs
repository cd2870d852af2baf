// SPDX-License-Identifier: MIT

//! The on-disk line codec for one audit record.
//!
//! Each journal line is `timestamp\tfeed\tfn\tstep\tsubstep\tstatus\tresult[\tbytes=N][\terror=...]`.
//! Unlike the event WAL this format is externally specified (spec.md
//! Section 6): flat, tab-separated, and forwards-compatible readers
//! must tolerate extra trailing fields.

use bfq_core::audit::{AuditParseError, RecordResult, RecordStatus, Step, Substep};
use bfq_core::AuditRecord;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LineError {
    #[error(transparent)]
    Parse(#[from] AuditParseError),
    #[error("bad timestamp {0:?}")]
    BadTimestamp(String),
    #[error("bad step {0:?}")]
    BadStep(String),
}

pub fn encode(record: &AuditRecord) -> String {
    let ts = record
        .timestamp
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    let mut line = format!(
        "{ts}\t{feed}\t{fn_}\t{step}\t{substep}\t{status}\t{result}",
        feed = record.feed,
        fn_ = record.fn_,
        step = record.step,
        substep = record.substep,
        status = record.status,
        result = record.result,
    );
    if let Some(bytes) = record.bytes {
        line.push_str(&format!("\tbytes={bytes}"));
    }
    if let Some(err) = &record.error {
        // Newlines would break the one-record-per-line invariant; they
        // can't occur in a transport error message we generate, but
        // guard anyway rather than trust it blindly.
        line.push_str(&format!("\terror={}", err.replace('\n', " ")));
    }
    line
}

pub fn decode(line: &str) -> Result<AuditRecord, LineError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 7 {
        return Err(LineError::Parse(AuditParseError::TooFewFields {
            got: fields.len(),
            need: 7,
        }));
    }

    let ts_nanos: u128 = fields[0]
        .parse()
        .map_err(|_| LineError::BadTimestamp(fields[0].to_string()))?;
    let timestamp = UNIX_EPOCH + std::time::Duration::from_nanos(ts_nanos as u64);

    let step: Step = fields[3]
        .parse()
        .map_err(|_| LineError::BadStep(fields[3].to_string()))?;

    let substep: Substep = fields[4].parse()?;
    let status: RecordStatus = fields[5].parse()?;
    let result: RecordResult = fields[6].parse()?;

    let mut bytes = None;
    let mut error = None;
    // Tolerate (and ignore) any further unrecognized trailing fields.
    for extra in &fields[7..] {
        if let Some(v) = extra.strip_prefix("bytes=") {
            bytes = v.parse().ok();
        } else if let Some(v) = extra.strip_prefix("error=") {
            error = Some(v.to_string());
        }
    }

    Ok(AuditRecord {
        timestamp,
        feed: fields[1].to_string(),
        fn_: fields[2].to_string(),
        step,
        substep,
        status,
        result,
        bytes,
        error,
    })
}

pub fn now() -> SystemTime {
    SystemTime::now()
}

#[cfg(test)]
#[path = "line_tests.rs"]
mod tests;
