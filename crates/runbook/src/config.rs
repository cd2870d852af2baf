// SPDX-License-Identifier: MIT

//! Loads one feed's configuration document (spec.md Section 6).
//!
//! The original mover reads a single feed per YAML document — no
//! `feeds:` list wrapper — so `RawFeed` deserializes the document
//! directly. Unknown keys are ignored (no `deny_unknown_fields`);
//! missing `source_dir`/`dest_dir` is the one hard startup error.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use bfq_core::{DestPostAction, Feed, FeedState, SortKey, SourcePostAction};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{field} must be set")]
    MissingField { field: &'static str },
    #[error("invalid {field} value {value:?}")]
    InvalidField { field: &'static str, value: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFeed {
    name: Option<String>,
    status: Option<String>,
    polling_seconds: Option<u64>,
    limit_total: Option<usize>,
    log_dir: Option<String>,
    source_host: Option<String>,
    source_user: Option<String>,
    source_dir: Option<String>,
    source_fn: Option<String>,
    dest_host: Option<String>,
    dest_user: Option<String>,
    dest_dir: Option<String>,
    dest_fn: Option<String>,
    port: Option<u16>,
    source_post_action: Option<String>,
    source_post_dir: Option<String>,
    dest_post_action: Option<String>,
    dest_post_dir: Option<String>,
    dest_post_fn: Option<String>,
    sort_key: Option<String>,
    key_filename: Option<String>,
}

const DEFAULT_POLLING_SECONDS: u64 = 60;
const DEFAULT_PORT: u16 = 22;

/// Read and parse the feed document at `path`.
pub fn load_feed(path: &Path) -> Result<Feed, ConfigError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_owned(), source })?;
    parse_feed(&contents)
}

/// Parse a feed document already read into memory.
pub fn parse_feed(contents: &str) -> Result<Feed, ConfigError> {
    let raw: RawFeed = serde_yaml::from_str(contents)?;
    build_feed(raw)
}

/// Read just the `log_dir` key, independent of the rest of the feed
/// (the CLI needs it to set up logging before the feed is fully
/// validated, and log_dir is not itself part of the `Feed` record).
pub fn load_log_dir(path: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_owned(), source })?;
    let raw: RawFeed = serde_yaml::from_str(&contents)?;
    Ok(raw.log_dir.filter(|s| !s.is_empty()).map(PathBuf::from))
}

fn build_feed(raw: RawFeed) -> Result<Feed, ConfigError> {
    let source_dir = raw
        .source_dir
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingField { field: "source_dir" })?;
    let dest_dir = raw
        .dest_dir
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingField { field: "dest_dir" })?;

    let status = match raw.status.as_deref() {
        None | Some("enabled") => FeedState::Enabled,
        Some("disabled") => FeedState::Disabled,
        Some(other) => {
            return Err(ConfigError::InvalidField { field: "status", value: other.to_string() })
        }
    };

    let sort_key = parse_sort_key(raw.sort_key.as_deref())?;
    let source_post_action =
        parse_source_post_action(raw.source_post_action.as_deref(), raw.source_post_dir)?;
    let dest_post_action = parse_dest_post_action(
        raw.dest_post_action.as_deref(),
        raw.dest_post_dir,
        raw.dest_post_fn,
    )?;

    Ok(Feed {
        name: raw.name.unwrap_or_default(),
        status,
        source_host: raw.source_host.unwrap_or_else(|| "localhost".to_string()),
        source_user: raw.source_user.unwrap_or_default(),
        source_dir: PathBuf::from(source_dir),
        source_fn: raw.source_fn.unwrap_or_else(|| "*".to_string()),
        dest_host: raw.dest_host.unwrap_or_else(|| "localhost".to_string()),
        dest_user: raw.dest_user.unwrap_or_default(),
        dest_dir: PathBuf::from(dest_dir),
        dest_fn: raw.dest_fn.filter(|s| !s.is_empty()),
        port: raw.port.unwrap_or(DEFAULT_PORT),
        sort_key,
        source_post_action,
        dest_post_action,
        polling_seconds: raw.polling_seconds.unwrap_or(DEFAULT_POLLING_SECONDS),
        limit_total: raw.limit_total.unwrap_or(0),
        key_filename: raw.key_filename.map(PathBuf::from),
    })
}

fn parse_sort_key(value: Option<&str>) -> Result<SortKey, ConfigError> {
    match value {
        None | Some("none") | Some("") => Ok(SortKey::None),
        Some("name") => Ok(SortKey::Name),
        Some(other) => match other.strip_prefix("field:") {
            Some(label) if !label.is_empty() => Ok(SortKey::Field(label.to_string())),
            _ => Err(ConfigError::InvalidField { field: "sort_key", value: other.to_string() }),
        },
    }
}

fn parse_source_post_action(
    action: Option<&str>,
    dir: Option<String>,
) -> Result<SourcePostAction, ConfigError> {
    match action {
        None | Some("none") | Some("") => Ok(SourcePostAction::None),
        // spec.md Section 9's open question: `pass` is a documented
        // synonym of `none`, flagged rather than silently accepted.
        Some("pass") => {
            tracing::warn!("source_post_action: 'pass' is a deprecated synonym for 'none'");
            Ok(SourcePostAction::None)
        }
        Some("delete") => Ok(SourcePostAction::Delete),
        Some("move") => {
            let dir = dir
                .filter(|s| !s.is_empty())
                .ok_or(ConfigError::MissingField { field: "source_post_dir" })?;
            Ok(SourcePostAction::Move { dir: PathBuf::from(dir) })
        }
        Some(other) => {
            Err(ConfigError::InvalidField { field: "source_post_action", value: other.to_string() })
        }
    }
}

fn parse_dest_post_action(
    action: Option<&str>,
    dir: Option<String>,
    name: Option<String>,
) -> Result<DestPostAction, ConfigError> {
    match action {
        None | Some("none") | Some("") => Ok(DestPostAction::None),
        Some("symlink") => {
            let dir = dir
                .filter(|s| !s.is_empty())
                .ok_or(ConfigError::MissingField { field: "dest_post_dir" })?;
            Ok(DestPostAction::Symlink { dir: PathBuf::from(dir), name: name.filter(|s| !s.is_empty()) })
        }
        Some("move") => {
            let dir = dir
                .filter(|s| !s.is_empty())
                .ok_or(ConfigError::MissingField { field: "dest_post_dir" })?;
            Ok(DestPostAction::Move { dir: PathBuf::from(dir), name: name.filter(|s| !s.is_empty()) })
        }
        Some(other) => {
            Err(ConfigError::InvalidField { field: "dest_post_action", value: other.to_string() })
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
