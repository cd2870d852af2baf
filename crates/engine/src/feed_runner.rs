// SPDX-License-Identifier: MIT

//! Drives one feed from lock acquisition through the candidate loop
//! (spec.md Section 4.5).

use std::path::Path;

use bfq_adapters::{resolve_identity_path, LocalTransport, SshEndpoint, SshTransport, Transport};
use bfq_core::{FaultHook, Feed, MoverError, NoFault, RecoveryAction};
use bfq_storage::{Auditor, AuditorError, FeedLock, LockError};
use thiserror::Error;
use tracing::info;

use crate::file_selector::FileSelector;
use crate::pipeline::TransferPipeline;

#[derive(Debug, Error)]
pub enum FeedRunError {
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error(transparent)]
    Auditor(#[from] AuditorError),
    #[error(transparent)]
    Transfer(#[from] MoverError),
}

/// Owns one feed for the duration of a single pass: the single-instance
/// lock, the audit journal, both transport endpoints, and the decision
/// between recovering the one interrupted file and walking the full
/// candidate list.
pub struct FeedRunner<'a> {
    feed: &'a Feed,
    feed_audit_dir: &'a Path,
    staging_dir: &'a Path,
    fault: &'a dyn FaultHook,
}

impl<'a> FeedRunner<'a> {
    pub fn new(feed: &'a Feed, feed_audit_dir: &'a Path, staging_dir: &'a Path) -> Self {
        Self { feed, feed_audit_dir, staging_dir, fault: &NoFault }
    }

    #[cfg(test)]
    pub fn with_fault(mut self, fault: &'a dyn FaultHook) -> Self {
        self.fault = fault;
        self
    }

    /// Run one pass. Returns the number of files the pipeline completed
    /// (0 or 1 during recovery, 0..=`limit_total` on a clean pass).
    pub fn run(&self) -> Result<usize, FeedRunError> {
        let _lock = FeedLock::acquire(self.feed_audit_dir, &self.feed.name)?;
        let auditor = Auditor::open(self.feed_audit_dir, &self.feed.name)?;

        let mut source = self.build_transport(self.feed.source_is_local(), &self.feed.source_host, &self.feed.source_user);
        let mut dest = self.build_transport(self.feed.dest_is_local(), &self.feed.dest_host, &self.feed.dest_user);

        if auditor.in_recovery()? {
            let (fn_, start_step) = match auditor.recovery_action()? {
                RecoveryAction::RetryFile { fn_, step } => (fn_, step),
                RecoveryAction::ResumeAtNextStep { fn_, step } => (fn_, step + 1),
                // `in_recovery()` already excludes these two variants.
                RecoveryAction::Clean | RecoveryAction::Terminal => return Ok(0),
            };
            info!(feed = %self.feed.name, fn_ = %fn_, step = start_step, "resuming interrupted file");
            let mut pipeline =
                TransferPipeline::new(self.feed, &auditor, source.as_mut(), dest.as_mut(), self.fault, self.staging_dir);
            pipeline.run(&fn_, start_step)?;
            // A recovery pass never advances past its one file, even if
            // more candidates are waiting (spec.md Section 4.4).
            return Ok(1);
        }

        let candidates = FileSelector::candidates(source.as_mut(), self.feed)?;
        let mut processed = 0;
        for fn_ in &candidates {
            let mut pipeline =
                TransferPipeline::new(self.feed, &auditor, source.as_mut(), dest.as_mut(), self.fault, self.staging_dir);
            pipeline.run(fn_, 1)?;
            processed += 1;
        }
        info!(feed = %self.feed.name, processed, "feed pass complete");
        Ok(processed)
    }

    fn build_transport(&self, is_local: bool, host: &str, user: &str) -> Box<dyn Transport> {
        if is_local {
            Box::new(LocalTransport)
        } else {
            let identity_file = resolve_identity_path(self.feed.key_filename.as_deref().and_then(|p| p.to_str()));
            Box::new(SshTransport::new(SshEndpoint {
                host: host.to_string(),
                port: self.feed.port,
                user: user.to_string(),
                identity_file,
                strict_host_key_checking: true,
            }))
        }
    }
}

#[cfg(test)]
#[path = "feed_runner_tests.rs"]
mod tests;
