// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Releases the shell once the daemon is gone.

use async_trait::async_trait;
use drover_core::{Agent, AgentError, Assertion, Edit, Talk};
use tracing::info;

/// Removes a shell that no longer has a daemon to serve.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemovesShell;

impl RemovesShell {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for RemovesShell {
    fn name(&self) -> &str {
        "removes-shell"
    }

    fn requires(&self) -> &[Assertion] {
        const REQUIRES: &[Assertion] = &[
            Assertion::Exists("shell"),
            Assertion::Absent("daemon"),
        ];
        REQUIRES
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        info!(talk = %talk.name, "shell released");
        Ok(vec![Edit::RemoveShell])
    }
}

#[cfg(test)]
#[path = "removes_tests.rs"]
mod tests;
