// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launches the cloud instance for a waiting daemon.
//!
//! The requested type is validated against the two-tier allow-list
//! before any provider call; a refusal is written into the daemon's
//! script field instead of launching, so the user sees why nothing
//! happened. The fresh instance is tagged with the management tag and
//! the talk name.

use crate::policy::TypePolicy;
use async_trait::async_trait;
use drover_adapters::{CloudProvider, LaunchSpec};
use drover_core::{Agent, AgentError, Assertion, Edit, Talk};
use tracing::{info, warn};

/// Request argument naming an explicit instance type.
pub const TYPE_ARG: &str = "instance_type";

/// Provisions an instance and records its id.
pub struct StartsInstance<C: CloudProvider> {
    api: C,
    spec: LaunchSpec,
    policy: TypePolicy,
    tag: String,
}

impl<C: CloudProvider> StartsInstance<C> {
    pub fn new(api: C, spec: LaunchSpec, policy: TypePolicy, tag: impl Into<String>) -> Self {
        Self {
            api,
            spec,
            policy,
            tag: tag.into(),
        }
    }
}

#[async_trait]
impl<C: CloudProvider> Agent for StartsInstance<C> {
    fn name(&self) -> &str {
        "starts-instance"
    }

    fn requires(&self) -> &[Assertion] {
        const REQUIRES: &[Assertion] = &[
            Assertion::Exists("daemon"),
            Assertion::Exists("wire"),
            Assertion::Absent("ec2"),
            Assertion::Absent("shell"),
        ];
        REQUIRES
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        let Some(wire) = talk.wire.as_ref() else {
            return Ok(Vec::new());
        };
        let instance_type = talk
            .request
            .as_ref()
            .and_then(|r| r.args.get(TYPE_ARG))
            .cloned()
            .unwrap_or_else(|| self.spec.instance_type.clone());

        if let Err(refusal) = self.policy.permits(wire.org(), &instance_type) {
            warn!(talk = %talk.name, org = wire.org(), %instance_type, "provisioning refused");
            return Ok(vec![Edit::ReplaceScript(format!(
                "Refusing to provision an instance: {}",
                refusal
            ))]);
        }

        let spec = LaunchSpec {
            instance_type,
            ..self.spec.clone()
        };
        let id = self
            .api
            .run_instance(&spec)
            .await
            .map_err(AgentError::external)?;
        self.api
            .create_tags(
                &id,
                &[
                    (self.tag.clone(), "yes".to_string()),
                    ("talk".to_string(), talk.name.clone()),
                ],
            )
            .await
            .map_err(AgentError::external)?;
        info!(
            talk = %talk.name,
            instance = %id,
            image = %spec.image,
            instance_type = %spec.instance_type,
            "instance launched"
        );
        Ok(vec![Edit::SetInstance { id }])
    }
}

#[cfg(test)]
#[path = "starts_tests.rs"]
mod tests;
