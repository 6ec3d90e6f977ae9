// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drops the local record of a terminated instance.
//!
//! Self-healing reconciliation: the provider said terminated, so the
//! `ec2` element is stale and goes away. Not an error — an expected,
//! continuously corrected condition.

use async_trait::async_trait;
use drover_adapters::{CloudProvider, InstanceState};
use drover_core::{Agent, AgentError, Assertion, Edit, Talk};
use tracing::info;

/// Removes `ec2` when the provider reports the instance terminated.
pub struct DetachesInstance<C: CloudProvider> {
    api: C,
}

impl<C: CloudProvider> DetachesInstance<C> {
    pub fn new(api: C) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<C: CloudProvider> Agent for DetachesInstance<C> {
    fn name(&self) -> &str {
        "detaches-instance"
    }

    fn requires(&self) -> &[Assertion] {
        const REQUIRES: &[Assertion] = &[Assertion::Exists("ec2/instance")];
        REQUIRES
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        let Some(ec2) = talk.ec2.as_ref() else {
            return Ok(Vec::new());
        };
        let status = self
            .api
            .instance_status(&ec2.instance)
            .await
            .map_err(AgentError::external)?;
        if status != Some(InstanceState::Terminated) {
            return Ok(Vec::new());
        }
        info!(talk = %talk.name, instance = %ec2.instance, "terminated instance detached");
        Ok(vec![Edit::RemoveInstance])
    }
}

#[cfg(test)]
#[path = "detaches_tests.rs"]
mod tests;
