// SPDX-License-Identifier: MIT

//! buffalofq-mover: the process-launcher binary for one configured feed.
//!
//! Thin by design (spec.md Section 1 lists "the process-launcher shim"
//! as out of scope for the core): parse `--config-fqfn`, set up
//! logging, load the feed, and hand off to [`bfq_engine::Scheduler`].

mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "buffalofq-mover", about = "File-feed mover daemon for one configured feed")]
struct Args {
    /// Fully-qualified path to the feed's YAML configuration document.
    #[arg(long = "config-fqfn")]
    config_fqfn: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let Some(config_fqfn) = args.config_fqfn else {
        println!("a config file must be provided");
        return ExitCode::from(1);
    };

    let log_dir = bfq_runbook::load_log_dir(&config_fqfn).ok().flatten();
    let _log_guard = logging::init(log_dir.as_deref());

    let feed = match bfq_runbook::load_feed(&config_fqfn) {
        Ok(feed) => feed,
        Err(e) => {
            error!(config = %config_fqfn.display(), error = %e, "failed to load feed configuration");
            return ExitCode::from(1);
        }
    };

    // The audit journal and lock for this feed live alongside its
    // config file, matching the original mover's own layout.
    let feed_audit_dir = config_fqfn
        .parent()
        .map(std::path::Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let staging_dir = std::env::temp_dir().join("buffalofq-mover").join(&feed.name);
    if let Err(e) = std::fs::create_dir_all(&staging_dir) {
        error!(dir = %staging_dir.display(), error = %e, "failed to create staging directory");
        return ExitCode::from(1);
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to start async runtime");
            return ExitCode::from(1);
        }
    };

    let scheduler = bfq_engine::Scheduler::new(feed, feed_audit_dir, staging_dir);
    match runtime.block_on(scheduler.run()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "feed scheduler exited with an error");
            ExitCode::from(1)
        }
    }
}
