// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bfq-storage: the per-feed audit journal and single-instance lock.

mod auditor;
mod line;
mod lock;

pub use auditor::{Auditor, AuditorError};
pub use lock::{FeedLock, LockError};
