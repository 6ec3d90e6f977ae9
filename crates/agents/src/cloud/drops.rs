// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drops the local record of an instance the provider no longer knows.

use async_trait::async_trait;
use drover_adapters::CloudProvider;
use drover_core::{Agent, AgentError, Assertion, Edit, Talk};
use tracing::info;

/// Removes `ec2` when the provider has no such instance at all.
pub struct DropsInstance<C: CloudProvider> {
    api: C,
}

impl<C: CloudProvider> DropsInstance<C> {
    pub fn new(api: C) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<C: CloudProvider> Agent for DropsInstance<C> {
    fn name(&self) -> &str {
        "drops-instance"
    }

    fn requires(&self) -> &[Assertion] {
        const REQUIRES: &[Assertion] = &[Assertion::Exists("ec2/instance")];
        REQUIRES
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        let Some(ec2) = talk.ec2.as_ref() else {
            return Ok(Vec::new());
        };
        let described = self
            .api
            .describe_instance(&ec2.instance)
            .await
            .map_err(AgentError::external)?;
        if described.is_some() {
            return Ok(Vec::new());
        }
        info!(talk = %talk.name, instance = %ec2.instance, "vanished instance dropped");
        Ok(vec![Edit::RemoveInstance])
    }
}

#[cfg(test)]
#[path = "drops_tests.rs"]
mod tests;
