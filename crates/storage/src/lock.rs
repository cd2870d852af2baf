// SPDX-License-Identifier: MIT

//! Single-instance advisory lock per feed (spec.md Section 5).
//!
//! An exclusive lock on `<feed_audit_dir>/<feed>.lock`, released when
//! the holding process exits (OS-guaranteed) or the guard is dropped.
//! Mirrors the daemon PID-lock pattern in the teacher's own lifecycle
//! module, minus the PID bookkeeping this program has no use for.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("feed {feed} is already being processed by another instance")]
    Busy { feed: String },
    #[error("io error opening lock for {feed}: {source}")]
    Io { feed: String, source: std::io::Error },
}

/// RAII guard for the per-feed lock. Dropping it releases the lock.
pub struct FeedLock {
    _file: File,
    path: PathBuf,
}

impl FeedLock {
    /// Try to acquire the lock for `feed` under `feed_audit_dir`.
    /// Fails immediately (never blocks) if another process already
    /// holds it.
    pub fn acquire(feed_audit_dir: &Path, feed: &str) -> Result<Self, LockError> {
        std::fs::create_dir_all(feed_audit_dir).map_err(|e| LockError::Io {
            feed: feed.to_string(),
            source: e,
        })?;
        let path = feed_audit_dir.join(format!("{feed}.lock"));
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&path)
            .map_err(|e| LockError::Io { feed: feed.to_string(), source: e })?;

        file.try_lock_exclusive().map_err(|e| {
            if e.kind() == std::io::ErrorKind::WouldBlock {
                LockError::Busy { feed: feed.to_string() }
            } else {
                LockError::Io { feed: feed.to_string(), source: e }
            }
        })?;

        Ok(Self { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
