// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collection-wide request index assignment.
//!
//! Indexes give a total order over everything the system ever did. The
//! running maximum is recomputed from the authoritative documents on
//! every sweep — live requests and archived log records across all
//! active talks — so no cached counter can drift from persisted state.

use async_trait::async_trait;
use drover_core::{AgentError, Edit, SuperAgent, Talks};
use tracing::info;

/// Assigns the next unused index to every pending request.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexesRequests;

impl IndexesRequests {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SuperAgent for IndexesRequests {
    fn name(&self) -> &str {
        "indexes-requests"
    }

    async fn execute(&self, talks: &dyn Talks) -> Result<(), AgentError> {
        let mut names = talks.active()?;
        names.sort();

        let mut max = 0;
        let mut pending = Vec::new();
        for name in &names {
            let talk = talks.get(name)?;
            max = max.max(talk.max_index());
            if talk
                .request
                .as_ref()
                .is_some_and(|r| r.index.is_none())
            {
                pending.push(name.clone());
            }
        }

        for name in pending {
            max += 1;
            let mut talk = talks.get(&name)?;
            talk.modify(vec![Edit::AssignIndex(max)])?;
            talks.save(&talk)?;
            info!(talk = %name, index = max, "request indexed");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "indexes_tests.rs"]
mod tests;
