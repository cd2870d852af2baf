// SPDX-License-Identifier: MIT

//! Logging setup, grounded in the teacher daemon's own `setup_logging`:
//! an `EnvFilter` defaulting to `info`, a non-blocking writer, and (when
//! the feed configures `log_dir`) a rolling file appender instead of
//! stderr.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global subscriber. The returned guard must be kept
/// alive for the lifetime of the process; dropping it flushes and
/// detaches the non-blocking writer.
pub fn init(log_dir: Option<&Path>) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (non_blocking, guard) = match log_dir {
        Some(dir) => {
            let _ = std::fs::create_dir_all(dir);
            let appender = tracing_appender::rolling::never(dir, "buffalofq-mover.log");
            tracing_appender::non_blocking(appender)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    guard
}
