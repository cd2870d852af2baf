// SPDX-License-Identifier: MIT

//! The `Transport` capability (spec.md Section 4.1): uniform file
//! operations against a local or remote (SSH/SFTP) endpoint.

use std::path::Path;

use bfq_core::{MoverError, TransportErrorKind};

/// Metadata about a path on an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub exists: bool,
    pub size: u64,
    pub is_file: bool,
    pub is_symlink: bool,
}

impl Stat {
    pub fn missing() -> Self {
        Stat { exists: false, size: 0, is_file: false, is_symlink: false }
    }
}

/// One endpoint's worth of file operations, local or remote.
///
/// Implementations choose between [`crate::local::LocalTransport`] and
/// [`crate::ssh::SshTransport`] based on `host == "localhost"`
/// (spec.md Section 9's resolution of that Open Question).
pub trait Transport: Send {
    /// List the basenames of entries directly inside `dir`.
    fn list(&mut self, dir: &Path) -> Result<Vec<String>, MoverError>;

    fn stat(&mut self, path: &Path) -> Result<Stat, MoverError>;

    /// Copy the bytes at `local_path` (always a path on the local
    /// filesystem) to `remote_path` on this endpoint.
    fn put(&mut self, local_path: &Path, remote_path: &Path) -> Result<(), MoverError>;

    /// Copy the bytes at `remote_path` on this endpoint to
    /// `local_path` on the local filesystem.
    fn get(&mut self, remote_path: &Path, local_path: &Path) -> Result<(), MoverError>;

    /// Atomic rename within this endpoint.
    fn rename(&mut self, old: &Path, new: &Path) -> Result<(), MoverError>;

    fn remove(&mut self, path: &Path) -> Result<(), MoverError>;

    /// Create `link_path` as a symlink pointing at `target`, replacing
    /// any existing link at `link_path`.
    fn symlink(&mut self, target: &Path, link_path: &Path) -> Result<(), MoverError>;

    fn mkdir_p(&mut self, dir: &Path) -> Result<(), MoverError>;
}

pub(crate) fn not_found(path: &Path) -> MoverError {
    MoverError::transport(TransportErrorKind::NotFound, format!("{} not found", path.display()))
}

pub(crate) fn io_err(path: &Path, source: &std::io::Error) -> MoverError {
    let kind = match source.kind() {
        std::io::ErrorKind::NotFound => TransportErrorKind::NotFound,
        std::io::ErrorKind::PermissionDenied => TransportErrorKind::Permission,
        std::io::ErrorKind::TimedOut => TransportErrorKind::Timeout,
        _ => TransportErrorKind::Io,
    };
    MoverError::transport(kind, format!("{}: {}", path.display(), source))
}
