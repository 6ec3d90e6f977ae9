// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote shell adapters.
//!
//! The shell is the execution primitive the build pipeline runs on top
//! of: one authenticated command at a time against the endpoint recorded
//! in the talk. The reachability probe is simply `exec` of a minimal
//! command where only success/failure is consumed.

mod ssh;

pub use ssh::SshShell;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ExecCall, FakeShell};

use async_trait::async_trait;
use drover_core::ShellConn;
use thiserror::Error;

/// Errors from shell operations.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("exec failed: {0}")]
    Exec(String),
}

/// Result of one remote command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutcome {
    pub code: i32,
    pub stdout: String,
}

impl ExecOutcome {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Adapter for executing commands on the remote endpoint.
#[async_trait]
pub trait RemoteShell: Clone + Send + Sync + 'static {
    /// Run one command over the connection.
    async fn exec(&self, conn: &ShellConn, cmd: &str) -> Result<ExecOutcome, ShellError>;

    /// Reachability probe: one minimal authenticated command. Only
    /// success or failure is consumed, never the output.
    async fn probe(&self, conn: &ShellConn) -> bool {
        matches!(self.exec(conn, "pwd").await, Ok(outcome) if outcome.success())
    }
}
