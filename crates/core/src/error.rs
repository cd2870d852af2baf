// SPDX-License-Identifier: MIT

//! The error taxonomy shared across the mover (spec.md Section 7).

use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a transport failure, surfaced by both the
/// local and SSH transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Auth,
    Connect,
    NotFound,
    Permission,
    Io,
    Timeout,
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransportErrorKind::Auth => "auth",
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::NotFound => "not_found",
            TransportErrorKind::Permission => "permission",
            TransportErrorKind::Io => "io",
            TransportErrorKind::Timeout => "timeout",
        };
        write!(f, "{s}")
    }
}

/// Top-level error type for every fallible operation in the mover.
#[derive(Debug, Error)]
pub enum MoverError {
    #[error("config error: {0}")]
    Config(String),

    #[error("lock busy: feed {feed} is already being processed by another instance")]
    LockBusy { feed: String },

    #[error("transport error ({kind}): {detail}")]
    Transport { kind: TransportErrorKind, detail: String },

    #[error("verify failed for {path}: expected {expected} bytes, got {actual} bytes")]
    Verify { path: PathBuf, expected: u64, actual: u64 },

    #[error("post-action failed: {0}")]
    PostAction(String),

    #[error("journal write failed: {0}")]
    JournalWrite(String),

    #[error("cancelled")]
    Cancelled,
}

impl MoverError {
    pub fn transport(kind: TransportErrorKind, detail: impl Into<String>) -> Self {
        MoverError::Transport { kind, detail: detail.into() }
    }

    /// `true` for the class of error the [`crate::fault::FaultHook`]
    /// produces and the pipeline is expected to catch and record as
    /// `stop, result=fail` rather than let the process die on.
    pub fn is_recordable(&self) -> bool {
        !matches!(self, MoverError::JournalWrite(_))
    }
}
