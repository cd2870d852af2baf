// SPDX-License-Identifier: MIT

//! SSH/SFTP [`Transport`], backed by the `ssh2` crate (key-based auth
//! only, matching spec.md Section 4.1's "no password fallback").

use std::io::{Read, Write};
use std::net::TcpStream;
use std::path::{Path, PathBuf};

use ssh2::{self, Session, Sftp};

use crate::transport::{not_found, Stat, Transport};
use bfq_core::{MoverError, TransportErrorKind};

/// Connection parameters for one SSH/SFTP endpoint.
#[derive(Debug, Clone)]
pub struct SshEndpoint {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub identity_file: PathBuf,
    pub strict_host_key_checking: bool,
}

/// A lazily-connected SSH/SFTP transport. The connection is established
/// on first use and torn down when the transport (and so the feed-run
/// iteration that owns it) is dropped, matching spec.md Section 4.1
/// ("Connections are created lazily per feed run and closed when the
/// feed loop iteration ends").
pub struct SshTransport {
    endpoint: SshEndpoint,
    session: Option<Session>,
}

impl SshTransport {
    pub fn new(endpoint: SshEndpoint) -> Self {
        Self { endpoint, session: None }
    }

    fn sftp(&mut self) -> Result<Sftp, MoverError> {
        // Take ownership of any existing session so connecting a fresh
        // one (when there isn't one yet) never needs a borrow of `self`
        // to coexist with a mutable borrow of `self.session`.
        let session = match self.session.take() {
            Some(session) => session,
            None => self.connect()?,
        };
        let result = session.sftp().map_err(|e| {
            MoverError::transport(TransportErrorKind::Connect, format!("sftp channel: {e}"))
        });
        self.session = Some(session);
        result
    }

    fn connect(&self) -> Result<Session, MoverError> {
        let addr = format!("{}:{}", self.endpoint.host, self.endpoint.port);
        let tcp = TcpStream::connect(&addr).map_err(|e| {
            MoverError::transport(TransportErrorKind::Connect, format!("{addr}: {e}"))
        })?;

        let mut session = Session::new().map_err(|e| {
            MoverError::transport(TransportErrorKind::Connect, format!("session init: {e}"))
        })?;
        session.set_tcp_stream(tcp);
        session.handshake().map_err(|e| {
            MoverError::transport(TransportErrorKind::Connect, format!("handshake: {e}"))
        })?;

        if self.endpoint.strict_host_key_checking {
            // ssh2 doesn't maintain a known_hosts store for us the way
            // OpenSSH does; callers that need strict checking are
            // expected to validate the host key out of band before
            // constructing this endpoint. We still surface the key so
            // future verification can hook in here.
            let _ = session.host_key();
        }

        session
            .userauth_pubkey_file(
                &self.endpoint.user,
                None,
                &self.endpoint.identity_file,
                None,
            )
            .map_err(|e| MoverError::transport(TransportErrorKind::Auth, format!("{e}")))?;

        if !session.authenticated() {
            return Err(MoverError::transport(
                TransportErrorKind::Auth,
                "key-based authentication failed",
            ));
        }

        Ok(session)
    }
}

impl Transport for SshTransport {
    fn list(&mut self, dir: &Path) -> Result<Vec<String>, MoverError> {
        let sftp = self.sftp()?;
        let entries = sftp.readdir(dir).map_err(|e| {
            MoverError::transport(TransportErrorKind::Io, format!("{}: {e}", dir.display()))
        })?;
        Ok(entries
            .into_iter()
            .filter_map(|(path, _)| path.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect())
    }

    fn stat(&mut self, path: &Path) -> Result<Stat, MoverError> {
        let sftp = self.sftp()?;
        match sftp.lstat(path) {
            Ok(meta) => Ok(Stat {
                exists: true,
                size: meta.size.unwrap_or(0),
                is_file: meta.file_type().is_file(),
                is_symlink: meta.file_type().is_symlink(),
            }),
            Err(e) if e.code() == ssh2::ErrorCode::SFTP(2) => Ok(Stat::missing()), // SSH_FX_NO_SUCH_FILE
            Err(e) => Err(MoverError::transport(TransportErrorKind::Io, format!("{e}"))),
        }
    }

    fn put(&mut self, local_path: &Path, remote_path: &Path) -> Result<(), MoverError> {
        let mut local = std::fs::File::open(local_path).map_err(|e| {
            MoverError::transport(TransportErrorKind::Io, format!("{}: {e}", local_path.display()))
        })?;
        let sftp = self.sftp()?;
        if let Some(parent) = remote_path.parent() {
            let _ = sftp.mkdir(parent, 0o755);
        }
        let mut remote = sftp.create(remote_path).map_err(|e| {
            MoverError::transport(TransportErrorKind::Io, format!("{}: {e}", remote_path.display()))
        })?;
        let mut buf = Vec::new();
        local
            .read_to_end(&mut buf)
            .map_err(|e| MoverError::transport(TransportErrorKind::Io, format!("{e}")))?;
        remote
            .write_all(&buf)
            .map_err(|e| MoverError::transport(TransportErrorKind::Io, format!("{e}")))?;
        Ok(())
    }

    fn get(&mut self, remote_path: &Path, local_path: &Path) -> Result<(), MoverError> {
        let sftp = self.sftp()?;
        let mut remote = sftp.open(remote_path).map_err(|_| not_found(remote_path))?;
        if let Some(parent) = local_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MoverError::transport(TransportErrorKind::Io, format!("{e}")))?;
        }
        let mut local = std::fs::File::create(local_path)
            .map_err(|e| MoverError::transport(TransportErrorKind::Io, format!("{e}")))?;
        let mut buf = Vec::new();
        remote
            .read_to_end(&mut buf)
            .map_err(|e| MoverError::transport(TransportErrorKind::Io, format!("{e}")))?;
        local
            .write_all(&buf)
            .map_err(|e| MoverError::transport(TransportErrorKind::Io, format!("{e}")))?;
        Ok(())
    }

    fn rename(&mut self, old: &Path, new: &Path) -> Result<(), MoverError> {
        let sftp = self.sftp()?;
        sftp.rename(old, new, None)
            .map_err(|e| MoverError::transport(TransportErrorKind::Io, format!("{e}")))
    }

    fn remove(&mut self, path: &Path) -> Result<(), MoverError> {
        let sftp = self.sftp()?;
        match sftp.unlink(path) {
            Ok(()) => Ok(()),
            Err(e) if e.code() == ssh2::ErrorCode::SFTP(2) => Ok(()),
            Err(e) => Err(MoverError::transport(TransportErrorKind::Io, format!("{e}"))),
        }
    }

    fn symlink(&mut self, target: &Path, link_path: &Path) -> Result<(), MoverError> {
        let sftp = self.sftp()?;
        let _ = sftp.unlink(link_path);
        sftp.symlink(target, link_path)
            .map_err(|e| MoverError::transport(TransportErrorKind::Io, format!("{e}")))
    }

    fn mkdir_p(&mut self, dir: &Path) -> Result<(), MoverError> {
        let sftp = self.sftp()?;
        // SFTP has no mkdir -p; walk the path component by component,
        // ignoring "already exists".
        let mut built = PathBuf::new();
        for component in dir.components() {
            built.push(component);
            let _ = sftp.mkdir(&built, 0o755);
        }
        Ok(())
    }
}
