// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent contracts.
//!
//! An agent is one idempotent transition rule: when its preconditions
//! hold it derives an edit script from the current document (re-observing
//! the outside world on every call, never caching), and the script is
//! applied atomically. A super-agent is the same contract scoped to the
//! whole collection.

use crate::edit::Edit;
use crate::precondition::{Assertion, Required};
use crate::talk::{Talk, TalkError};
use crate::talks::{Talks, TalksError};
use async_trait::async_trait;
use thiserror::Error;

/// Errors escaping an agent.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Talk(#[from] TalkError),
    #[error(transparent)]
    Talks(#[from] TalksError),
    #[error("{0}")]
    External(String),
    #[error("talk {name}: {source}")]
    InTalk {
        name: String,
        #[source]
        source: Box<AgentError>,
    },
}

impl AgentError {
    /// Wrap an external collaborator's failure.
    pub fn external(err: impl std::fmt::Display) -> Self {
        AgentError::External(err.to_string())
    }

    /// Attach the session name for diagnosability at pipeline boundaries.
    pub fn in_talk(self, name: impl Into<String>) -> Self {
        AgentError::InTalk {
            name: name.into(),
            source: Box::new(self),
        }
    }
}

/// A transition rule scoped to one session document.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Name used in logs and fault reports.
    fn name(&self) -> &str;

    /// Preconditions gating [`Agent::process`].
    fn requires(&self) -> &[Assertion];

    /// Derive the edit script from the current document. Called only when
    /// the preconditions hold; may observe external systems. Returning an
    /// empty script means no forward progress this tick.
    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError>;

    /// Evaluate preconditions and apply the edit script atomically.
    /// Returns whether the document changed.
    async fn execute(&self, talk: &mut Talk) -> Result<bool, AgentError> {
        if !Required::new(self.requires()).satisfied_by(talk) {
            return Ok(false);
        }
        let edits = self.process(talk).await?;
        Ok(talk.modify(edits)?)
    }
}

/// A transition rule scoped to the whole collection of sessions.
#[async_trait]
pub trait SuperAgent: Send + Sync {
    /// Name used in logs and fault reports.
    fn name(&self) -> &str;

    /// Inspect and mutate the collection through the store.
    async fn execute(&self, talks: &dyn Talks) -> Result<(), AgentError>;
}

/// Receives uncaught agent faults for operator visibility.
/// Fire-and-forget: implementations must never block the pipeline.
pub trait FaultSink: Send + Sync {
    fn report(&self, talk: &str, agent: &str, error: &AgentError);
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
