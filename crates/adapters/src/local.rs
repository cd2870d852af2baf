// SPDX-License-Identifier: MIT

//! Local-filesystem [`Transport`].

use std::fs;
use std::path::Path;

use crate::transport::{io_err, Stat, Transport};
use bfq_core::MoverError;

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalTransport;

impl Transport for LocalTransport {
    fn list(&mut self, dir: &Path) -> Result<Vec<String>, MoverError> {
        let entries = fs::read_dir(dir).map_err(|e| io_err(dir, &e))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_err(dir, &e))?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn stat(&mut self, path: &Path) -> Result<Stat, MoverError> {
        match fs::symlink_metadata(path) {
            Ok(meta) => Ok(Stat {
                exists: true,
                size: meta.len(),
                is_file: meta.is_file(),
                is_symlink: meta.file_type().is_symlink(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Stat::missing()),
            Err(e) => Err(io_err(path, &e)),
        }
    }

    fn put(&mut self, local_path: &Path, remote_path: &Path) -> Result<(), MoverError> {
        if let Some(parent) = remote_path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_err(parent, &e))?;
        }
        fs::copy(local_path, remote_path).map_err(|e| io_err(remote_path, &e))?;
        Ok(())
    }

    fn get(&mut self, remote_path: &Path, local_path: &Path) -> Result<(), MoverError> {
        if let Some(parent) = local_path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_err(parent, &e))?;
        }
        fs::copy(remote_path, local_path).map_err(|e| io_err(remote_path, &e))?;
        Ok(())
    }

    fn rename(&mut self, old: &Path, new: &Path) -> Result<(), MoverError> {
        fs::rename(old, new).map_err(|e| io_err(old, &e))
    }

    fn remove(&mut self, path: &Path) -> Result<(), MoverError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(path, &e)),
        }
    }

    fn symlink(&mut self, target: &Path, link_path: &Path) -> Result<(), MoverError> {
        if let Some(parent) = link_path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_err(parent, &e))?;
        }
        // Replace atomically: build the new link next to the target
        // name, then rename over any existing one. A stale tmp left
        // behind by a prior crash between the symlink and the rename
        // must not make a retry fail with AlreadyExists.
        let tmp = link_path.with_extension("symlink_tmp");
        match fs::remove_file(&tmp) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(io_err(&tmp, &e)),
        }
        #[cfg(unix)]
        std::os::unix::fs::symlink(target, &tmp).map_err(|e| io_err(&tmp, &e))?;
        #[cfg(not(unix))]
        {
            let _ = target;
            return Err(io_err(
                link_path,
                &std::io::Error::new(std::io::ErrorKind::Unsupported, "symlinks require unix"),
            ));
        }
        fs::rename(&tmp, link_path).map_err(|e| io_err(link_path, &e))?;
        Ok(())
    }

    fn mkdir_p(&mut self, dir: &Path) -> Result<(), MoverError> {
        fs::create_dir_all(dir).map_err(|e| io_err(dir, &e))
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
