// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! drover-adapters: seams to the outside world.
//!
//! Every external collaborator — the cloud provider, the remote shell,
//! the result notifier, the fault sink — is reached through a narrow
//! trait with a subprocess-backed implementation and a recording fake.
//! Nothing here caches external state; every call re-observes the world.

pub mod cloud;
pub mod notify;
pub mod shell;
pub mod sink;
pub mod subprocess;

pub use cloud::{AwsCliProvider, CloudError, CloudProvider, InstanceInfo, InstanceState, LaunchSpec};
pub use notify::{LogNotifier, Notifier, NotifyError};
pub use shell::{ExecOutcome, RemoteShell, ShellError, SshShell};
pub use sink::LogFaultSink;

#[cfg(any(test, feature = "test-support"))]
pub use cloud::{CloudCall, FakeCloudProvider, FakeInstance};
#[cfg(any(test, feature = "test-support"))]
pub use notify::{Delivery, FakeNotifier};
#[cfg(any(test, feature = "test-support"))]
pub use shell::{ExecCall, FakeShell};
#[cfg(any(test, feature = "test-support"))]
pub use sink::{FakeFaultSink, Fault};
