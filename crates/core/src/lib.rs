// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! drover-core: session documents, edit scripts, and agent contracts.
//!
//! A build session is a single persisted document (a "talk"). Agents are
//! idempotent transition rules over one talk; super-agents are rules over
//! the whole collection. Nothing in this crate performs I/O — storage and
//! the outside world live behind the `Talks` and adapter seams.

pub mod agent;
pub mod clock;
pub mod edit;
pub mod precondition;
pub mod schema;
pub mod talk;
pub mod talks;

pub use agent::{Agent, AgentError, FaultSink, SuperAgent};
pub use clock::{Clock, FakeClock, SystemClock};
pub use edit::{Edit, EditError};
pub use precondition::{Assertion, Required};
pub use schema::{validate, SchemaError};
pub use talk::{
    Daemon, Ec2, LogEntry, Request, RequestKind, ShellConn, Talk, TalkError, Wire,
};
pub use talks::{Talks, TalksError};
