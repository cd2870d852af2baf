// SPDX-License-Identifier: MIT

//! An in-memory [`Transport`] for engine-crate tests, in the same spirit
//! as the teacher's `FakeSessionAdapter`/`FakeAgentAdapter`: exercise
//! the pipeline's step logic without touching a filesystem at all.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::transport::{Stat, Transport};
use bfq_core::MoverError;

#[derive(Debug, Default)]
pub struct FakeTransport {
    files: BTreeMap<PathBuf, Vec<u8>>,
    symlinks: BTreeMap<PathBuf, PathBuf>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_bytes(&mut self, path: &Path, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.to_path_buf(), bytes.into());
    }

    pub fn contents(&self, path: &Path) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn symlink_target(&self, path: &Path) -> Option<&Path> {
        self.symlinks.get(path).map(PathBuf::as_path)
    }
}

impl Transport for FakeTransport {
    fn list(&mut self, dir: &Path) -> Result<Vec<String>, MoverError> {
        let mut names: Vec<String> = self
            .files
            .keys()
            .chain(self.symlinks.keys())
            .filter_map(|p| {
                if p.parent() == Some(dir) {
                    p.file_name().and_then(|n| n.to_str()).map(str::to_string)
                } else {
                    None
                }
            })
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn stat(&mut self, path: &Path) -> Result<Stat, MoverError> {
        if let Some(target) = self.symlinks.get(path) {
            let size = self.files.get(target).map(|b| b.len() as u64).unwrap_or(0);
            return Ok(Stat { exists: true, size, is_file: false, is_symlink: true });
        }
        match self.files.get(path) {
            Some(bytes) => Ok(Stat { exists: true, size: bytes.len() as u64, is_file: true, is_symlink: false }),
            None => Ok(Stat::missing()),
        }
    }

    fn put(&mut self, local_path: &Path, remote_path: &Path) -> Result<(), MoverError> {
        let bytes = self.files.get(local_path).cloned().unwrap_or_default();
        self.files.insert(remote_path.to_path_buf(), bytes);
        Ok(())
    }

    fn get(&mut self, remote_path: &Path, local_path: &Path) -> Result<(), MoverError> {
        let bytes = self.files.get(remote_path).cloned().unwrap_or_default();
        self.files.insert(local_path.to_path_buf(), bytes);
        Ok(())
    }

    fn rename(&mut self, old: &Path, new: &Path) -> Result<(), MoverError> {
        if let Some(bytes) = self.files.remove(old) {
            self.files.insert(new.to_path_buf(), bytes);
        }
        Ok(())
    }

    fn remove(&mut self, path: &Path) -> Result<(), MoverError> {
        self.files.remove(path);
        Ok(())
    }

    fn symlink(&mut self, target: &Path, link_path: &Path) -> Result<(), MoverError> {
        self.symlinks.insert(link_path.to_path_buf(), target.to_path_buf());
        Ok(())
    }

    fn mkdir_p(&mut self, _dir: &Path) -> Result<(), MoverError> {
        Ok(())
    }
}
