// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Folds a finished daemon into the archive.
//!
//! The archive record inherits the request's index, which is how the
//! collection-wide counter stays continuous across history. Must run
//! while the request is still present — assembly places it before the
//! reporter that removes the request.

use async_trait::async_trait;
use drover_core::{Agent, AgentError, Assertion, Edit, LogEntry, Talk};
use tracing::info;

/// Replaces the ended daemon with an archive log record.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchivesDaemon;

impl ArchivesDaemon {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for ArchivesDaemon {
    fn name(&self) -> &str {
        "archives-daemon"
    }

    fn requires(&self) -> &[Assertion] {
        const REQUIRES: &[Assertion] = &[
            Assertion::Exists("daemon/ended"),
            Assertion::Exists("daemon/code"),
            Assertion::Exists("request/index"),
            Assertion::Exists("request/success"),
        ];
        REQUIRES
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        let (Some(daemon), Some(request)) = (talk.daemon.as_ref(), talk.request.as_ref()) else {
            return Ok(Vec::new());
        };
        let Some(index) = request.index else {
            return Ok(Vec::new());
        };
        let outcome = if daemon.code == Some(0) {
            "done"
        } else {
            "failed"
        };
        let entry = LogEntry {
            id: daemon.id.clone(),
            title: format!("{} #{} {}", request.kind, index, outcome),
            index,
        };
        info!(talk = %talk.name, index, outcome, "daemon archived");
        Ok(vec![Edit::AppendLog(entry), Edit::RemoveDaemon])
    }
}

#[cfg(test)]
#[path = "archives_tests.rs"]
mod tests;
