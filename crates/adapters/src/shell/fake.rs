// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake remote shell for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ExecOutcome, RemoteShell, ShellError};
use async_trait::async_trait;
use drover_core::ShellConn;
use parking_lot::Mutex;
use std::sync::Arc;

/// Recorded exec call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecCall {
    pub host: String,
    pub cmd: String,
}

struct FakeShellState {
    reachable: bool,
    stubs: Vec<(String, ExecOutcome)>,
    calls: Vec<ExecCall>,
}

/// Fake remote shell with scriptable outcomes.
///
/// Commands are matched against stubs by substring, most recent stub
/// wins; unmatched commands succeed with empty output.
#[derive(Clone)]
pub struct FakeShell {
    inner: Arc<Mutex<FakeShellState>>,
}

impl Default for FakeShell {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeShellState {
                reachable: true,
                stubs: Vec::new(),
                calls: Vec::new(),
            })),
        }
    }
}

impl FakeShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every exec fail as unreachable
    pub fn set_reachable(&self, reachable: bool) {
        self.inner.lock().reachable = reachable;
    }

    /// Stub the outcome for commands containing `fragment`.
    /// The most recently added stub wins when several match.
    pub fn stub(&self, fragment: &str, code: i32, stdout: &str) {
        self.inner.lock().stubs.insert(
            0,
            (
                fragment.to_string(),
                ExecOutcome {
                    code,
                    stdout: stdout.to_string(),
                },
            ),
        );
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ExecCall> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl RemoteShell for FakeShell {
    async fn exec(&self, conn: &ShellConn, cmd: &str) -> Result<ExecOutcome, ShellError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ExecCall {
            host: conn.host.clone(),
            cmd: cmd.to_string(),
        });
        if !inner.reachable {
            return Err(ShellError::Connect(format!("{} unreachable", conn.host)));
        }
        let outcome = inner
            .stubs
            .iter()
            .find(|(fragment, _)| cmd.contains(fragment))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or(ExecOutcome {
                code: 0,
                stdout: String::new(),
            });
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
