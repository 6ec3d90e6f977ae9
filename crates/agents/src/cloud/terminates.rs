// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Releases the instance once the job is done.
//!
//! A provider failure here propagates: the containment wrapper at
//! assembly level reports it and the next tick tries again.

use async_trait::async_trait;
use drover_adapters::CloudProvider;
use drover_core::{Agent, AgentError, Assertion, Edit, Talk};
use tracing::info;

/// Terminates the instance of a finished job and drops the record.
pub struct TerminatesInstance<C: CloudProvider> {
    api: C,
}

impl<C: CloudProvider> TerminatesInstance<C> {
    pub fn new(api: C) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<C: CloudProvider> Agent for TerminatesInstance<C> {
    fn name(&self) -> &str {
        "terminates-instance"
    }

    fn requires(&self) -> &[Assertion] {
        const REQUIRES: &[Assertion] = &[
            Assertion::Exists("ec2/instance"),
            Assertion::Exists("ec2/host"),
            Assertion::Absent("daemon"),
        ];
        REQUIRES
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        let Some(ec2) = talk.ec2.as_ref() else {
            return Ok(Vec::new());
        };
        self.api
            .terminate_instance(&ec2.instance)
            .await
            .map_err(AgentError::external)?;
        info!(talk = %talk.name, instance = %ec2.instance, "instance terminated");
        Ok(vec![Edit::RemoveInstance])
    }
}

#[cfg(test)]
#[path = "terminates_tests.rs"]
mod tests;
