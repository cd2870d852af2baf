// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bfq-runbook: loads a feed's configuration document from disk.

mod config;

pub use config::{load_feed, load_log_dir, parse_feed, ConfigError};
