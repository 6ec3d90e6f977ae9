// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Records the request outcome from the finished daemon.

use async_trait::async_trait;
use drover_core::{Agent, AgentError, Assertion, Edit, Talk};
use tracing::info;

/// Sets `request.success` once the daemon has an exit code.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndsRequest;

impl EndsRequest {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for EndsRequest {
    fn name(&self) -> &str {
        "ends-request"
    }

    fn requires(&self) -> &[Assertion] {
        const REQUIRES: &[Assertion] = &[
            Assertion::Exists("request/index"),
            Assertion::Absent("request/success"),
            Assertion::Exists("daemon/ended"),
            Assertion::Exists("daemon/code"),
        ];
        REQUIRES
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        let Some(code) = talk.daemon.as_ref().and_then(|d| d.code) else {
            return Ok(Vec::new());
        };
        let success = code == 0;
        info!(talk = %talk.name, code, success, "request finished");
        Ok(vec![Edit::MarkRequestDone { success }])
    }
}

#[cfg(test)]
#[path = "ends_tests.rs"]
mod tests;
