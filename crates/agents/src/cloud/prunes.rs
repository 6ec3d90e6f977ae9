// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fleet-wide leak guard.
//!
//! Lists every instance carrying the management tag and terminates any
//! that outlived the maximum, whether or not a session still references
//! it. The safety net under every per-session agent above.

use async_trait::async_trait;
use chrono::Duration;
use drover_adapters::{CloudProvider, InstanceState};
use drover_core::{AgentError, Clock, SuperAgent, Talks};
use std::sync::Arc;
use tracing::{info, warn};

/// Terminates over-age instances across the whole fleet.
pub struct PrunesInstances<C: CloudProvider> {
    api: C,
    tag: String,
    max_age: Duration,
    clock: Arc<dyn Clock>,
}

impl<C: CloudProvider> PrunesInstances<C> {
    pub fn new(api: C, tag: impl Into<String>, max_age: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            tag: tag.into(),
            max_age,
            clock,
        }
    }
}

#[async_trait]
impl<C: CloudProvider> SuperAgent for PrunesInstances<C> {
    fn name(&self) -> &str {
        "prunes-instances"
    }

    async fn execute(&self, _talks: &dyn Talks) -> Result<(), AgentError> {
        let instances = self
            .api
            .list_tagged(&self.tag, "yes")
            .await
            .map_err(AgentError::external)?;
        let mut seen = 0;
        for instance in instances {
            if instance.state == InstanceState::Terminated {
                continue;
            }
            seen += 1;
            let Some(launched_at) = instance.launched_at else {
                continue;
            };
            let age = self.clock.now() - launched_at;
            if age <= self.max_age {
                continue;
            }
            self.api
                .terminate_instance(&instance.id)
                .await
                .map_err(AgentError::external)?;
            warn!(
                instance = %instance.id,
                state = %instance.state,
                age_mins = age.num_minutes(),
                "instance too old, terminated"
            );
        }
        info!(tag = %self.tag, seen, "fleet prune finished");
        Ok(())
    }
}

#[cfg(test)]
#[path = "prunes_tests.rs"]
mod tests;
