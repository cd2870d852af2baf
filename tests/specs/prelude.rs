//! Test helpers for behavioral specifications.
//!
//! These tests are black-box: they spawn the `buffalofq-mover` binary
//! against a real feed configuration and assert on the resulting
//! filesystem state, the way `test_buffalofq_mover_functional.py`
//! exercised the original mover.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output};
use std::time::{Duration, Instant};

/// Returns the path to a binary, checking llvm-cov target directory
/// first (works with both standard builds and llvm-cov coverage runs).
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

fn mover_binary() -> PathBuf {
    binary_path("buffalofq-mover")
}

/// Run the mover once against `config_fqfn` and return its output.
pub fn run_mover_no_args() -> Output {
    Command::new(mover_binary()).output().expect("mover binary should run")
}

/// Run the mover once against `config_fqfn` and return its output
/// (used for startup-error specs that exit before the scheduler loop
/// ever starts, so a plain `output()` call is enough — no process to
/// tear down).
pub fn run_mover(config_fqfn: &Path) -> Output {
    Command::new(mover_binary())
        .arg("--config-fqfn")
        .arg(config_fqfn)
        .output()
        .expect("mover binary should run")
}

/// Spawn the mover as a background process; the caller polls for the
/// expected filesystem state, then calls `stop()`.
pub struct MoverProcess {
    child: Child,
}

impl MoverProcess {
    pub fn spawn(config_fqfn: &Path) -> Self {
        let child = Command::new(mover_binary())
            .arg("--config-fqfn")
            .arg(config_fqfn)
            .spawn()
            .expect("mover binary should spawn");
        Self { child }
    }

    /// Tear down the background process. These specs assert on
    /// filesystem state, not on the scheduler's own exit code, so a
    /// hard kill is sufficient teardown.
    pub fn stop(mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Poll `condition` until it's true or `timeout` elapses. Returns
/// whether the condition was observed.
pub fn wait_for<F: FnMut() -> bool>(timeout: Duration, mut condition: F) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    condition()
}

/// Count entries directly under `dir` whose filename starts with `prefix`.
pub fn count_with_prefix(dir: &Path, prefix: &str) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.file_name().to_string_lossy().starts_with(prefix))
                .count()
        })
        .unwrap_or(0)
}

/// A tempdir-backed feed fixture mirroring the original functional
/// test's directory layout: separate source/dest/archive/post dirs,
/// plus a config dir that doubles as the feed's audit/lock directory.
pub struct FeedFixture {
    _root: tempfile::TempDir,
    pub source_dir: PathBuf,
    pub source_arc_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub dest_post_dir: PathBuf,
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl FeedFixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let source_dir = root.path().join("source");
        let source_arc_dir = root.path().join("source_arc");
        let dest_dir = root.path().join("dest");
        let dest_post_dir = root.path().join("dest_post");
        let config_dir = root.path().join("config");
        let log_dir = root.path().join("log");
        for dir in [&source_dir, &source_arc_dir, &dest_dir, &dest_post_dir, &config_dir, &log_dir] {
            std::fs::create_dir_all(dir).expect("create fixture dir");
        }
        Self { _root: root, source_dir, source_arc_dir, dest_dir, dest_post_dir, config_dir, log_dir }
    }

    /// Create a small file named `<prefix>_<n>.dat` under `dir`.
    pub fn make_file(&self, dir: &Path, prefix: &str, n: usize) {
        let path = dir.join(format!("{prefix}_{n}.dat"));
        std::fs::write(path, format!("{prefix} payload {n}")).expect("write fixture file");
    }

    /// Write a `buffalofq.yml` document under `config_dir` and return
    /// its path. `extra_yaml` must set `polling_seconds` explicitly;
    /// there's no safe default since it determines how many poll
    /// cycles a test's wait window will see.
    pub fn write_config(&self, extra_yaml: &str) -> PathBuf {
        let path = self.config_dir.join("buffalofq.yml");
        let yaml = format!(
            "name: test-feed\n\
             source_dir: {source_dir}\n\
             dest_dir: {dest_dir}\n\
             log_dir: {log_dir}\n\
             {extra_yaml}\n",
            source_dir = self.source_dir.display(),
            dest_dir = self.dest_dir.display(),
            log_dir = self.log_dir.display(),
        );
        std::fs::write(&path, yaml).expect("write config");
        path
    }
}

impl Default for FeedFixture {
    fn default() -> Self {
        Self::new()
    }
}
