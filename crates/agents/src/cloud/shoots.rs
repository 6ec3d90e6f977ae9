// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The never-connected timeout guard.
//!
//! An instance that has an address but still no registered shell after
//! the configured maximum age is not going to connect; terminate it.
//! The document is left untouched — reconciliation removes the record
//! once the provider reports the instance gone.

use async_trait::async_trait;
use chrono::Duration;
use drover_adapters::{CloudProvider, InstanceState};
use drover_core::{Agent, AgentError, Assertion, Clock, Edit, Talk};
use std::sync::Arc;
use tracing::warn;

/// Terminates instances that never connected.
pub struct ShootsInstance<C: CloudProvider> {
    api: C,
    max_age: Duration,
    clock: Arc<dyn Clock>,
}

impl<C: CloudProvider> ShootsInstance<C> {
    pub fn new(api: C, max_age: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            max_age,
            clock,
        }
    }
}

#[async_trait]
impl<C: CloudProvider> Agent for ShootsInstance<C> {
    fn name(&self) -> &str {
        "shoots-instance"
    }

    fn requires(&self) -> &[Assertion] {
        const REQUIRES: &[Assertion] = &[
            Assertion::Exists("ec2/instance"),
            Assertion::Exists("ec2/host"),
            Assertion::Absent("shell"),
        ];
        REQUIRES
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        let Some(ec2) = talk.ec2.as_ref() else {
            return Ok(Vec::new());
        };
        let Some(info) = self
            .api
            .describe_instance(&ec2.instance)
            .await
            .map_err(AgentError::external)?
        else {
            return Ok(Vec::new());
        };
        if info.state == InstanceState::Terminated {
            return Ok(Vec::new());
        }
        let Some(launched_at) = info.launched_at else {
            return Ok(Vec::new());
        };
        let age = self.clock.now() - launched_at;
        if age <= self.max_age {
            return Ok(Vec::new());
        }
        warn!(
            talk = %talk.name,
            instance = %ec2.instance,
            age_mins = age.num_minutes(),
            "instance never connected, terminating"
        );
        self.api
            .terminate_instance(&ec2.instance)
            .await
            .map_err(AgentError::external)?;
        Ok(Vec::new())
    }
}

#[cfg(test)]
#[path = "shoots_tests.rs"]
mod tests;
