// SPDX-License-Identifier: MIT

//! Polls one feed on an interval until shutdown (spec.md Section 4.6).

use std::path::PathBuf;
use std::time::Duration;

use bfq_core::{Feed, FeedState, MoverError};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

use crate::feed_runner::{FeedRunError, FeedRunner};

/// One feed per process, matching the CLI shape `--config-fqfn <file>`.
/// Loops: run one [`FeedRunner`] pass, sleep `polling_seconds`, repeat,
/// until SIGINT/SIGTERM arrives. The signal is only ever observed
/// between passes, never mid-file (spec.md Section 5, "Suspension
/// points").
pub struct Scheduler {
    feed: Feed,
    feed_audit_dir: PathBuf,
    staging_dir: PathBuf,
}

impl Scheduler {
    pub fn new(feed: Feed, feed_audit_dir: PathBuf, staging_dir: PathBuf) -> Self {
        Self { feed, feed_audit_dir, staging_dir }
    }

    /// Run until a termination signal arrives, or immediately if the
    /// feed is disabled.
    pub async fn run(&self) -> Result<(), FeedRunError> {
        if self.feed.status != FeedState::Enabled {
            info!(feed = %self.feed.name, "feed disabled, nothing to do");
            return Ok(());
        }

        let mut sigterm = signal(SignalKind::terminate())
            .map_err(|e| FeedRunError::Transfer(MoverError::Config(format!("signal setup: {e}"))))?;
        let mut sigint = signal(SignalKind::interrupt())
            .map_err(|e| FeedRunError::Transfer(MoverError::Config(format!("signal setup: {e}"))))?;

        loop {
            let runner = FeedRunner::new(&self.feed, &self.feed_audit_dir, &self.staging_dir);
            match runner.run() {
                Ok(processed) if processed > 0 => {
                    info!(feed = %self.feed.name, processed, "poll complete");
                }
                Ok(_) => {}
                Err(e) => error!(feed = %self.feed.name, error = %e, "feed pass failed"),
            }

            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(self.feed.polling_seconds)) => {}
                _ = sigterm.recv() => {
                    info!(feed = %self.feed.name, "received SIGTERM, shutting down");
                    return Ok(());
                }
                _ = sigint.recv() => {
                    info!(feed = %self.feed.name, "received SIGINT, shutting down");
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
