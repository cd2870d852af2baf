// SPDX-License-Identifier: MIT

//! The `Feed` record: one configured source -> destination movement rule.

use std::path::PathBuf;

/// How candidate file names are ordered before processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    /// Preserve the order the directory listing returned.
    None,
    /// Lexicographic ascending by the full file name.
    Name,
    /// Ascending by the substring following `<label>-` up to the next
    /// `.` or `_`, ties broken by name.
    Field(String),
}

/// What happens to the source file after a successful transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcePostAction {
    /// Leave the source file in place.
    None,
    /// Remove the source file.
    Delete,
    /// Rename the source file into `dir`.
    Move { dir: PathBuf },
}

/// What happens to the destination file after a successful promote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestPostAction {
    /// Leave the destination file under its final name.
    None,
    /// Create a symlink to the destination file under `dir`, named
    /// `name` or (if absent) the destination file's own name.
    Symlink { dir: PathBuf, name: Option<String> },
    /// Rename the destination file into `dir`, as `name` or (if absent)
    /// its own name.
    Move { dir: PathBuf, name: Option<String> },
}

/// Whether a feed participates in the scheduler's polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    Enabled,
    Disabled,
}

/// One configured feed: a source, a destination, and the rules for
/// moving files from one to the other. Immutable for the duration of a
/// single `FeedRunner` pass.
#[derive(Debug, Clone)]
pub struct Feed {
    pub name: String,
    pub status: FeedState,

    pub source_host: String,
    pub source_user: String,
    pub source_dir: PathBuf,
    pub source_fn: String,

    pub dest_host: String,
    pub dest_user: String,
    pub dest_dir: PathBuf,
    pub dest_fn: Option<String>,

    pub port: u16,

    pub sort_key: SortKey,

    pub source_post_action: SourcePostAction,
    pub dest_post_action: DestPostAction,

    pub polling_seconds: u64,
    /// 0 means unbounded.
    pub limit_total: usize,

    pub key_filename: Option<PathBuf>,
}

impl Feed {
    /// True when the feed's endpoint should be treated as the local
    /// filesystem rather than an SSH remote (`host == "localhost"`).
    pub fn source_is_local(&self) -> bool {
        is_local_host(&self.source_host)
    }

    /// See [`Feed::source_is_local`].
    pub fn dest_is_local(&self) -> bool {
        is_local_host(&self.dest_host)
    }

    /// The name the file must have on the destination: `dest_fn` if set,
    /// else the source basename.
    pub fn dest_name_for(&self, source_basename: &str) -> String {
        self.dest_fn.clone().unwrap_or_else(|| source_basename.to_string())
    }
}

fn is_local_host(host: &str) -> bool {
    host.is_empty() || host == "localhost" || host == "127.0.0.1"
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
