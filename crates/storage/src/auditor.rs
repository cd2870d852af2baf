// SPDX-License-Identifier: MIT

//! Per-feed append-only audit journal.
//!
//! Writes are durable (`fsync`) before the caller is told to proceed,
//! matching the write-ahead discipline spec.md Section 4.2 requires:
//! the journal must record a step's `start` before the step's side
//! effect begins, and its `stop` only after the side effect completes.
//!
//! Reading only ever needs the tail of the file, but a crash can leave
//! a half-written last line; `last_record` tolerates that the way the
//! teacher's own WAL scan (`Wal::scan_wal`) tolerates a truncated final
//! entry, by treating an unparseable last line as simply "not there".

use crate::line::{decode, encode, now};
use bfq_core::audit::{RecordResult, RecordStatus, Step, Substep};
use bfq_core::{in_recovery as core_in_recovery, recovery_action, AuditRecord, RecoveryAction};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditorError {
    #[error("io error on {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}

impl AuditorError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        AuditorError::Io { path: path.to_owned(), source }
    }
}

/// An append-only per-feed journal: `<feed_audit_dir>/<feed>.audit`.
pub struct Auditor {
    path: PathBuf,
    feed: String,
}

impl Auditor {
    /// Open (creating if absent) the journal for `feed` under
    /// `feed_audit_dir`.
    pub fn open(feed_audit_dir: &Path, feed: &str) -> Result<Self, AuditorError> {
        fs::create_dir_all(feed_audit_dir)
            .map_err(|e| AuditorError::io(feed_audit_dir, e))?;
        let path = feed_audit_dir.join(format!("{feed}.audit"));
        // Touch the file so later reads never have to distinguish
        // "doesn't exist" from "empty".
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| AuditorError::io(&path, e))?;
        Ok(Self { path, feed: feed.to_string() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record. Durable (fsync'd) before returning: this is
    /// what makes the write-ahead property hold across a crash.
    pub fn record(
        &self,
        step: Step,
        substep: Substep,
        status: RecordStatus,
        result: RecordResult,
        fn_: &str,
    ) -> Result<(), AuditorError> {
        self.record_full(step, substep, status, result, fn_, None, None)
    }

    /// Full form of [`Auditor::record`] with the optional `bytes`/`error`
    /// fields spec.md Section 3 allows.
    #[allow(clippy::too_many_arguments)]
    pub fn record_full(
        &self,
        step: Step,
        substep: Substep,
        status: RecordStatus,
        result: RecordResult,
        fn_: &str,
        bytes: Option<u64>,
        error: Option<String>,
    ) -> Result<(), AuditorError> {
        let record = AuditRecord {
            timestamp: now(),
            feed: self.feed.clone(),
            fn_: fn_.to_string(),
            step,
            substep,
            status,
            result,
            bytes,
            error,
        };
        let line = encode(&record);

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| AuditorError::io(&self.path, e))?;
        writeln!(file, "{line}").map_err(|e| AuditorError::io(&self.path, e))?;
        file.sync_all().map_err(|e| AuditorError::io(&self.path, e))?;
        Ok(())
    }

    /// The most recent parseable record, or `None` for an empty or
    /// brand-new journal. A dangling, unparseable last line (a write
    /// that was interrupted mid-fsync) is treated the same as "absent":
    /// it can never be the durable tail, since a line is only durable
    /// once its trailing fsync in [`Auditor::record_full`] returns.
    pub fn last_record(&self) -> Result<Option<AuditRecord>, AuditorError> {
        let file = File::open(&self.path).map_err(|e| AuditorError::io(&self.path, e))?;
        let reader = BufReader::new(file);
        let mut last = None;
        for line in reader.lines() {
            let line = line.map_err(|e| AuditorError::io(&self.path, e))?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match decode(trimmed) {
                Ok(record) => last = Some(record),
                Err(_) => {
                    // A half-written tail line; ignore it and keep the
                    // last fully-written record as the durable tail.
                    continue;
                }
            }
        }
        Ok(last)
    }

    /// True iff the journal tail says a prior run died mid-step, left a
    /// caught failure, or stopped between two steps of the same file
    /// (spec.md Section 4.2 plus the reconciliation documented in
    /// DESIGN.md).
    pub fn in_recovery(&self) -> Result<bool, AuditorError> {
        Ok(core_in_recovery(self.last_record()?.as_ref()))
    }

    /// The `fn` to retry, or `""` if there is nothing to recover.
    pub fn recovery_target(&self) -> Result<String, AuditorError> {
        let last = self.last_record()?;
        Ok(match recovery_action(last.as_ref()) {
            RecoveryAction::RetryFile { fn_, .. } | RecoveryAction::ResumeAtNextStep { fn_, .. } => fn_,
            RecoveryAction::Clean | RecoveryAction::Terminal => String::new(),
        })
    }

    /// The computed recovery action for the current journal tail.
    pub fn recovery_action(&self) -> Result<RecoveryAction, AuditorError> {
        Ok(recovery_action(self.last_record()?.as_ref()))
    }
}

#[cfg(test)]
#[path = "auditor_tests.rs"]
mod tests;
