// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polls the provider until the instance has an address.
//!
//! The provider is eventually consistent: an instance can report
//! `running` before it has a public address. Either gap is a plain
//! no-op, retried next tick.

use async_trait::async_trait;
use drover_adapters::{CloudProvider, InstanceState};
use drover_core::{Agent, AgentError, Assertion, Edit, Talk};
use tracing::{debug, info};

/// Records the instance address once the provider reports it running.
pub struct DescribesInstance<C: CloudProvider> {
    api: C,
}

impl<C: CloudProvider> DescribesInstance<C> {
    pub fn new(api: C) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<C: CloudProvider> Agent for DescribesInstance<C> {
    fn name(&self) -> &str {
        "describes-instance"
    }

    fn requires(&self) -> &[Assertion] {
        const REQUIRES: &[Assertion] = &[
            Assertion::Exists("daemon"),
            Assertion::Exists("ec2"),
            Assertion::Absent("ec2/host"),
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
            debug!(talk = %talk.name, instance = %ec2.instance, "instance not described yet");
            return Ok(Vec::new());
        };
        if info.state != InstanceState::Running {
            debug!(talk = %talk.name, instance = %ec2.instance, state = %info.state, "not running yet");
            return Ok(Vec::new());
        }
        let Some(host) = info.public_host else {
            debug!(talk = %talk.name, instance = %ec2.instance, "running but no address yet");
            return Ok(Vec::new());
        };
        info!(talk = %talk.name, instance = %ec2.instance, host = %host, "instance address recorded");
        Ok(vec![Edit::SetInstanceHost(host)])
    }
}

#[cfg(test)]
#[path = "describes_tests.rs"]
mod tests;
