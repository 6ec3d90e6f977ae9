// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turns an indexed request into a build daemon.
//!
//! The script comes from the configured template for the request kind,
//! with the request arguments exported as shell variables ahead of it.
//! Runs only after the index sweep, so the daemon title and the later
//! archive record can carry the sequence number.

use async_trait::async_trait;
use drover_core::{Agent, AgentError, Assertion, Daemon, Edit, Talk};
use std::collections::BTreeMap;
use tracing::info;

/// Materializes the daemon for a pending request.
pub struct StartsRequest {
    scripts: BTreeMap<String, String>,
}

impl StartsRequest {
    pub fn new(scripts: BTreeMap<String, String>) -> Self {
        Self { scripts }
    }

    fn render(&self, kind: &str, args: &BTreeMap<String, String>) -> String {
        let mut lines = Vec::new();
        for (key, value) in args {
            lines.push(format!("{}={}", key, shell_quote(value)));
        }
        let template = self
            .scripts
            .get(kind)
            .map(String::as_str)
            .unwrap_or_default();
        lines.push(template.trim_end().to_string());
        lines.join("\n")
    }
}

/// Single-quote a value for safe interpolation into a bash script.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[async_trait]
impl Agent for StartsRequest {
    fn name(&self) -> &str {
        "starts-request"
    }

    fn requires(&self) -> &[Assertion] {
        const REQUIRES: &[Assertion] = &[
            Assertion::Exists("request/index"),
            Assertion::Absent("daemon"),
        ];
        REQUIRES
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        let Some(request) = talk.request.as_ref() else {
            return Ok(Vec::new());
        };
        let index = request.index.unwrap_or(0);
        let script = self.render(&request.kind.to_string(), &request.args);
        info!(talk = %talk.name, kind = %request.kind, index, "request turned into daemon");
        Ok(vec![Edit::SetDaemon(Daemon {
            id: request.id.clone(),
            title: format!("{} #{}", request.kind, index),
            script,
            dir: None,
            started: None,
            ended: None,
            code: None,
            tail: None,
        })])
    }
}

#[cfg(test)]
#[path = "starts_tests.rs"]
mod tests;
