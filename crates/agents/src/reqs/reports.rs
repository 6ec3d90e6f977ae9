// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delivers the outcome through the wire callback and closes the request.
//!
//! Delivery failures propagate, so the report is retried on the next
//! tick instead of being lost; the request is removed only after the
//! notifier accepted the message.

use async_trait::async_trait;
use drover_adapters::Notifier;
use drover_core::{Agent, AgentError, Assertion, Edit, Talk};
use tracing::info;

/// Reports the finished request and removes it.
pub struct Reports<N: Notifier> {
    notifier: N,
}

impl<N: Notifier> Reports<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl<N: Notifier> Agent for Reports<N> {
    fn name(&self) -> &str {
        "reports"
    }

    fn requires(&self) -> &[Assertion] {
        const REQUIRES: &[Assertion] = &[
            Assertion::Exists("request/success"),
            Assertion::Exists("wire"),
        ];
        REQUIRES
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        let (Some(request), Some(wire)) = (talk.request.as_ref(), talk.wire.as_ref()) else {
            return Ok(Vec::new());
        };
        let success = request.success.unwrap_or(false);
        let index = request.index.unwrap_or(0);
        let title = format!("{} #{}", request.kind, index);
        let message = if success {
            format!("{} succeeded", title)
        } else {
            let detail = talk
                .archive
                .iter()
                .rev()
                .find(|l| l.index == index)
                .map(|l| l.title.clone())
                .unwrap_or_else(|| "see the build log".to_string());
            format!("{} failed: {}", title, detail)
        };
        self.notifier
            .deliver(&wire.href, &title, &message)
            .await
            .map_err(AgentError::external)?;
        info!(talk = %talk.name, href = %wire.href, success, "request reported");
        Ok(vec![Edit::RemoveRequest])
    }
}

#[cfg(test)]
#[path = "reports_tests.rs"]
mod tests;
