// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The build-hung-too-long guard.
//!
//! A daemon running past the configured maximum gets its instance
//! stopped (not terminated) so the machine can still be inspected.
//! No document mutation here: the end-of-daemon bookkeeping belongs to
//! the agents that observe the stopped instance.

use async_trait::async_trait;
use chrono::Duration;
use drover_adapters::CloudProvider;
use drover_core::{Agent, AgentError, Assertion, Clock, Edit, Talk};
use std::sync::Arc;
use tracing::warn;

/// Stops the instance of a build that exceeded its time budget.
pub struct KillsInstance<C: CloudProvider> {
    api: C,
    max_runtime: Duration,
    clock: Arc<dyn Clock>,
}

impl<C: CloudProvider> KillsInstance<C> {
    pub fn new(api: C, max_runtime: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            max_runtime,
            clock,
        }
    }
}

#[async_trait]
impl<C: CloudProvider> Agent for KillsInstance<C> {
    fn name(&self) -> &str {
        "kills-instance"
    }

    fn requires(&self) -> &[Assertion] {
        const REQUIRES: &[Assertion] = &[
            Assertion::Exists("daemon/started"),
            Assertion::Absent("daemon/ended"),
            Assertion::Exists("ec2"),
        ];
        REQUIRES
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        let Some(started) = talk.daemon.as_ref().and_then(|d| d.started) else {
            return Ok(Vec::new());
        };
        let Some(ec2) = talk.ec2.as_ref() else {
            return Ok(Vec::new());
        };
        let elapsed = self.clock.now() - started;
        if elapsed <= self.max_runtime {
            return Ok(Vec::new());
        }
        warn!(
            talk = %talk.name,
            instance = %ec2.instance,
            elapsed_mins = elapsed.num_minutes(),
            "build exceeded its time budget, stopping instance"
        );
        self.api
            .stop_instance(&ec2.instance)
            .await
            .map_err(AgentError::external)?;
        Ok(Vec::new())
    }
}

#[cfg(test)]
#[path = "kills_tests.rs"]
mod tests;
