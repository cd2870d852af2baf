// SPDX-License-Identifier: MIT

//! Pure resume-pointer logic: turning the tail of the audit journal into
//! the action the next `FeedRunner` pass should take.
//!
//! This is deliberately a pure function over `&[AuditRecord]` (really
//! just the last one or two records) so the six-row table in the spec
//! can be unit-tested without touching a filesystem.

use crate::audit::{AuditRecord, RecordResult, RecordStatus, Step, Substep};

/// What the next pass should do, derived from the journal tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// `step=0` or an empty journal: process all candidates from
    /// scratch.
    Clean,
    /// Retry `fn_` starting at `step` (died before or during the side
    /// effect, or a caught failure): the pipeline must restart this
    /// exact step, relying on its idempotency.
    RetryFile { fn_: String, step: Step },
    /// `fn_`'s step finished but the next one never started: resume at
    /// `step + 1` for the same file.
    ResumeAtNextStep { fn_: String, step: Step },
    /// Step 6 finished cleanly: nothing to recover, advance to the next
    /// candidate.
    Terminal,
}

/// Compute the recovery action from the single most recent audit
/// record, or `Clean` if the journal is empty.
///
/// This implements the table in spec.md Section 4.4 ("Resume rules").
pub fn recovery_action(last: Option<&AuditRecord>) -> RecoveryAction {
    let Some(last) = last else {
        return RecoveryAction::Clean;
    };

    if last.step == 0 {
        return RecoveryAction::Clean;
    }

    match (last.status, last.substep, last.result) {
        // Died before the side effect started.
        (RecordStatus::Start, Substep::A | Substep::B, _) => RecoveryAction::RetryFile {
            fn_: last.fn_.clone(),
            step: last.step,
        },
        // Died during or right after the side effect; every side effect
        // is idempotent by construction, so restarting the step is safe.
        (RecordStatus::Start, Substep::C | Substep::D, _) => RecoveryAction::RetryFile {
            fn_: last.fn_.clone(),
            step: last.step,
        },
        // A start record can't legally be followed at e: `e` always
        // appears as a `stop`. Treat defensively as a retry.
        (RecordStatus::Start, Substep::E, _) => RecoveryAction::RetryFile {
            fn_: last.fn_.clone(),
            step: last.step,
        },
        // Caller caught a failure at verify.
        (RecordStatus::Stop, Substep::D, RecordResult::Fail) => RecoveryAction::RetryFile {
            fn_: last.fn_.clone(),
            step: last.step,
        },
        // Step finished cleanly.
        (RecordStatus::Stop, Substep::E, RecordResult::Pass) => {
            if last.step >= 6 {
                RecoveryAction::Terminal
            } else {
                RecoveryAction::ResumeAtNextStep {
                    fn_: last.fn_.clone(),
                    step: last.step,
                }
            }
        }
        // Any other stop/fail combination: still a broken file, retry
        // its step rather than silently treating it as clean.
        (_, _, RecordResult::Fail) => RecoveryAction::RetryFile {
            fn_: last.fn_.clone(),
            step: last.step,
        },
        _ => RecoveryAction::Clean,
    }
}

/// True iff the journal tail indicates a prior run died mid-step or
/// left a caught failure behind (spec.md Section 4.2, `in_recovery`).
pub fn in_recovery(last: Option<&AuditRecord>) -> bool {
    !matches!(
        recovery_action(last),
        RecoveryAction::Clean | RecoveryAction::Terminal
    )
}

#[cfg(test)]
#[path = "resume_tests.rs"]
mod tests;
