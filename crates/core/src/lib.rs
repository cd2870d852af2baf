// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bfq-core: domain types for the buffalofq file-feed mover.

pub mod audit;
pub mod error;
pub mod fault;
pub mod feed;
pub mod resume;

pub use audit::{AuditRecord, RecordResult, RecordStatus, Step, Substep};
pub use error::{MoverError, TransportErrorKind};
pub use fault::{FaultAction, FaultHook, NoFault};
pub use feed::{DestPostAction, Feed, FeedState, SortKey, SourcePostAction};
pub use resume::{in_recovery, recovery_action, RecoveryAction};

#[cfg(any(test, feature = "test-support"))]
pub use fault::ScriptedFault;
