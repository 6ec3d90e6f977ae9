// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deactivation sweep.
//!
//! A talk with no request, no daemon, no shell, and not deferred has
//! nothing left to do; this sweep flips it inactive so the tick loop
//! stops visiting it. The document itself is kept.

use async_trait::async_trait;
use drover_core::{AgentError, SuperAgent, Talks};
use tracing::info;

/// Deactivates every finished talk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeactivatesTalks;

impl DeactivatesTalks {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SuperAgent for DeactivatesTalks {
    fn name(&self) -> &str {
        "deactivates-talks"
    }

    async fn execute(&self, talks: &dyn Talks) -> Result<(), AgentError> {
        for name in talks.active()? {
            let talk = talks.get(&name)?;
            if talk.is_finished() {
                talks.deactivate(&name)?;
                info!(talk = %name, number = talk.number, "talk deactivated");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "deactivates_tests.rs"]
mod tests;
