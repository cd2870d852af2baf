// SPDX-License-Identifier: MIT

//! The six-step transfer state machine (spec.md Section 4.4).
//!
//! Each step runs through substeps `a..e`; `a`-`d` each write a durable
//! `start` record to the journal *before* anything that substep does,
//! and only then perform that substep's work (the write-ahead
//! discipline spec.md Section 4.2 requires). `e` writes the step's
//! final `stop, pass` record. A [`FaultHook`] is consulted right after
//! each substep's `start` record lands, reproducing the
//! `FAIL_STEP`/`FAIL_SUBSTEP`/`FAIL_CATCH` test matrix without any
//! process-wide mutable state (spec.md Section 9).

use std::path::Path;

use bfq_adapters::Transport;
use bfq_core::audit::{RecordResult, RecordStatus, Step, Substep};
use bfq_core::{DestPostAction, FaultAction, FaultHook, Feed, MoverError, SourcePostAction, TransportErrorKind};
use bfq_storage::Auditor;

/// Executes all six steps of the transfer for exactly one file per
/// `run` call.
pub struct TransferPipeline<'a> {
    feed: &'a Feed,
    auditor: &'a Auditor,
    source: &'a mut dyn Transport,
    dest: &'a mut dyn Transport,
    fault: &'a dyn FaultHook,
    /// Local staging directory used when both endpoints are remote
    /// (spec.md Section 4.1: "files stream through a local temp path
    /// under the mover's working directory").
    staging_dir: &'a Path,
}

impl<'a> TransferPipeline<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        feed: &'a Feed,
        auditor: &'a Auditor,
        source: &'a mut dyn Transport,
        dest: &'a mut dyn Transport,
        fault: &'a dyn FaultHook,
        staging_dir: &'a Path,
    ) -> Self {
        Self { feed, auditor, source, dest, fault, staging_dir }
    }

    /// Run steps `start_step..=6` for `fn_`. Callers resuming after a
    /// crash pass the step named by the recovery pointer; a clean run
    /// always passes `1`.
    pub fn run(&mut self, fn_: &str, start_step: Step) -> Result<(), MoverError> {
        if start_step <= 1 {
            self.step1_claim(fn_)?;
        }
        if start_step <= 2 {
            self.step2_put(fn_)?;
        }
        if start_step <= 3 {
            self.step3_verify(fn_)?;
        }
        if start_step <= 4 {
            self.step4_promote(fn_)?;
        }
        if start_step <= 5 {
            self.step5_dest_post(fn_)?;
        }
        if start_step <= 6 {
            self.step6_source_post(fn_)?;
        }
        Ok(())
    }

    fn step1_claim(&mut self, fn_: &str) -> Result<(), MoverError> {
        self.run_substep(1, Substep::A, fn_, |_| Ok(()))?;
        self.run_substep(1, Substep::B, fn_, |_| Ok(()))?;
        self.run_substep(1, Substep::C, fn_, |_| Ok(()))?;
        self.run_substep(1, Substep::D, fn_, |_| Ok(()))?;
        self.finish(1, fn_)
    }

    fn step2_put(&mut self, fn_: &str) -> Result<(), MoverError> {
        self.run_substep(2, Substep::A, fn_, |_| Ok(()))?;
        self.run_substep(2, Substep::B, fn_, |p| p.check_source_exists(fn_))?;
        self.run_substep(2, Substep::C, fn_, |p| p.do_put(fn_))?;
        self.run_substep(2, Substep::D, fn_, |p| p.check_dest_temp_exists(fn_))?;
        self.finish(2, fn_)
    }

    fn step3_verify(&mut self, fn_: &str) -> Result<(), MoverError> {
        self.run_substep(3, Substep::A, fn_, |_| Ok(()))?;
        self.run_substep(3, Substep::B, fn_, |p| p.check_dest_temp_exists(fn_))?;
        self.run_substep(3, Substep::C, fn_, |_| Ok(()))?;
        self.run_substep(3, Substep::D, fn_, |p| p.do_verify(fn_))?;
        self.finish(3, fn_)
    }

    fn step4_promote(&mut self, fn_: &str) -> Result<(), MoverError> {
        self.run_substep(4, Substep::A, fn_, |_| Ok(()))?;
        self.run_substep(4, Substep::B, fn_, |_| Ok(()))?;
        self.run_substep(4, Substep::C, fn_, |p| p.do_promote(fn_))?;
        self.run_substep(4, Substep::D, fn_, |p| p.check_dest_final_exists(fn_))?;
        self.finish(4, fn_)
    }

    fn step5_dest_post(&mut self, fn_: &str) -> Result<(), MoverError> {
        self.run_substep(5, Substep::A, fn_, |_| Ok(()))?;
        self.run_substep(5, Substep::B, fn_, |_| Ok(()))?;
        self.run_substep(5, Substep::C, fn_, |p| p.do_dest_post(fn_))?;
        self.run_substep(5, Substep::D, fn_, |_| Ok(()))?;
        self.finish(5, fn_)
    }

    fn step6_source_post(&mut self, fn_: &str) -> Result<(), MoverError> {
        self.run_substep(6, Substep::A, fn_, |_| Ok(()))?;
        self.run_substep(6, Substep::B, fn_, |_| Ok(()))?;
        self.run_substep(6, Substep::C, fn_, |p| p.do_source_post(fn_))?;
        self.run_substep(6, Substep::D, fn_, |_| Ok(()))?;
        self.finish(6, fn_)
    }

    // -- substep machinery --------------------------------------------

    /// Write the substep's `start` record, consult the fault hook, and
    /// (if it lets us through) run `action`. A real error from `action`
    /// always gets a `stop, fail` record — only the fault hook can
    /// produce the "uncaught" case that leaves a dangling `start`.
    fn run_substep(
        &mut self,
        step: Step,
        substep: Substep,
        fn_: &str,
        action: impl FnOnce(&mut Self) -> Result<(), MoverError>,
    ) -> Result<(), MoverError> {
        self.begin(step, substep, fn_)?;
        if let FaultAction::Abort { catch } = self.fault.check(step, substep) {
            let err = injected_fault_error(step, substep);
            if catch {
                self.stop_fail(step, substep, fn_, &err)?;
            }
            return Err(err);
        }
        match action(self) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.stop_fail(step, substep, fn_, &e)?;
                Err(e)
            }
        }
    }

    /// The step's final `e`: fault-check, then `stop, pass`.
    fn finish(&mut self, step: Step, fn_: &str) -> Result<(), MoverError> {
        if let FaultAction::Abort { catch } = self.fault.check(step, Substep::E) {
            let err = injected_fault_error(step, Substep::E);
            if catch {
                self.stop_fail(step, Substep::E, fn_, &err)?;
            }
            return Err(err);
        }
        self.auditor
            .record(step, Substep::E, RecordStatus::Stop, RecordResult::Pass, fn_)
            .map_err(|e| MoverError::JournalWrite(e.to_string()))
    }

    fn begin(&self, step: Step, substep: Substep, fn_: &str) -> Result<(), MoverError> {
        self.auditor
            .record(step, substep, RecordStatus::Start, RecordResult::Tbd, fn_)
            .map_err(|e| MoverError::JournalWrite(e.to_string()))
    }

    fn stop_fail(&self, step: Step, substep: Substep, fn_: &str, err: &MoverError) -> Result<(), MoverError> {
        if !err.is_recordable() {
            // The journal write discipline is itself broken; don't try
            // to write through it again.
            return Ok(());
        }
        self.auditor
            .record_full(step, substep, RecordStatus::Stop, RecordResult::Fail, fn_, None, Some(err.to_string()))
            .map_err(|e| MoverError::JournalWrite(e.to_string()))
    }

    // -- step actions ---------------------------------------------------

    fn check_source_exists(&mut self, fn_: &str) -> Result<(), MoverError> {
        let path = self.feed.source_dir.join(fn_);
        let stat = self.source.stat(&path)?;
        if !stat.exists {
            return Err(not_found(&path));
        }
        Ok(())
    }

    fn check_dest_temp_exists(&mut self, fn_: &str) -> Result<(), MoverError> {
        let path = self.dest_temp_path(fn_);
        let stat = self.dest.stat(&path)?;
        if !stat.exists {
            return Err(not_found(&path));
        }
        Ok(())
    }

    fn check_dest_final_exists(&mut self, fn_: &str) -> Result<(), MoverError> {
        let path = self.dest_final_path(fn_);
        let stat = self.dest.stat(&path)?;
        if !stat.exists {
            return Err(not_found(&path));
        }
        Ok(())
    }

    fn do_put(&mut self, fn_: &str) -> Result<(), MoverError> {
        let source_path = self.feed.source_dir.join(fn_);
        let dest_temp = self.dest_temp_path(fn_);

        let staged = if self.feed.source_is_local() {
            source_path
        } else {
            let staged = self.staging_dir.join(fn_);
            self.source.get(&source_path, &staged)?;
            staged
        };
        self.dest.put(&staged, &dest_temp)
    }

    fn do_verify(&mut self, fn_: &str) -> Result<(), MoverError> {
        let source_path = self.feed.source_dir.join(fn_);
        let dest_temp = self.dest_temp_path(fn_);

        let source_size = self.source.stat(&source_path)?.size;
        let dest_stat = self.dest.stat(&dest_temp)?;
        if dest_stat.size != source_size {
            return Err(MoverError::Verify { path: dest_temp, expected: source_size, actual: dest_stat.size });
        }
        Ok(())
    }

    fn do_promote(&mut self, fn_: &str) -> Result<(), MoverError> {
        let dest_temp = self.dest_temp_path(fn_);
        let dest_final = self.dest_final_path(fn_);

        let temp_stat = self.dest.stat(&dest_temp)?;
        if temp_stat.exists {
            return self.dest.rename(&dest_temp, &dest_final);
        }
        // Idempotent retry: a prior run may have already promoted this
        // file before it died.
        let final_stat = self.dest.stat(&dest_final)?;
        if final_stat.exists {
            return Ok(());
        }
        Err(not_found(&dest_temp))
    }

    fn do_dest_post(&mut self, fn_: &str) -> Result<(), MoverError> {
        let dest_final = self.dest_final_path(fn_);
        let dest_name = self.feed.dest_name_for(fn_);

        match &self.feed.dest_post_action {
            DestPostAction::None => Ok(()),
            DestPostAction::Symlink { dir, name } => {
                let link_path = dir.join(name.clone().unwrap_or_else(|| dest_name.clone()));
                self.dest.mkdir_p(dir)?;
                self.dest.symlink(&dest_final, &link_path)
            }
            DestPostAction::Move { dir, name } => {
                let target_path = dir.join(name.clone().unwrap_or_else(|| dest_name.clone()));
                if !self.dest.stat(&dest_final)?.exists {
                    if self.dest.stat(&target_path)?.exists {
                        return Ok(());
                    }
                    return Err(MoverError::PostAction(format!(
                        "{} missing before destination move",
                        dest_final.display()
                    )));
                }
                self.dest.mkdir_p(dir)?;
                self.dest.rename(&dest_final, &target_path)
            }
        }
    }

    fn do_source_post(&mut self, fn_: &str) -> Result<(), MoverError> {
        let source_path = self.feed.source_dir.join(fn_);

        match &self.feed.source_post_action {
            SourcePostAction::None => Ok(()),
            SourcePostAction::Delete => self.source.remove(&source_path),
            SourcePostAction::Move { dir } => {
                let target_path = dir.join(fn_);
                if !self.source.stat(&source_path)?.exists {
                    if self.source.stat(&target_path)?.exists {
                        return Ok(());
                    }
                    return Err(MoverError::PostAction(format!(
                        "{} missing before source move",
                        source_path.display()
                    )));
                }
                self.source.mkdir_p(dir)?;
                self.source.rename(&source_path, &target_path)
            }
        }
    }

    fn dest_temp_path(&self, fn_: &str) -> std::path::PathBuf {
        self.feed.dest_dir.join(format!("{}.temp", self.feed.dest_name_for(fn_)))
    }

    fn dest_final_path(&self, fn_: &str) -> std::path::PathBuf {
        self.feed.dest_dir.join(self.feed.dest_name_for(fn_))
    }
}

fn injected_fault_error(step: Step, substep: Substep) -> MoverError {
    MoverError::transport(TransportErrorKind::Io, format!("fault injected at step {step} substep {substep}"))
}

fn not_found(path: &Path) -> MoverError {
    MoverError::transport(TransportErrorKind::NotFound, format!("{} not found", path.display()))
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
