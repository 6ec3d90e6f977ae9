// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The collection contract: how agents reach the set of sessions.
//!
//! Storage implements this; agents and super-agents depend only on the
//! trait. Documents are never deleted — a finished talk is deactivated
//! and drops out of `active()`.

use crate::talk::{Talk, TalkError};
use thiserror::Error;

/// Errors from the talk store.
#[derive(Debug, Error)]
pub enum TalksError {
    #[error("talk not found: {0}")]
    NotFound(String),
    #[error("talk already exists: {0}")]
    Duplicate(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Talk(#[from] TalkError),
}

/// The persisted collection of session documents.
pub trait Talks: Send + Sync {
    /// Create a fresh talk with the next sequential number.
    fn create(&self, name: &str) -> Result<Talk, TalksError>;

    /// Load a talk by name, validating it against the schema.
    fn get(&self, name: &str) -> Result<Talk, TalksError>;

    /// Persist a talk atomically, validating it first.
    fn save(&self, talk: &Talk) -> Result<(), TalksError>;

    /// Names of all active talks.
    fn active(&self) -> Result<Vec<String>, TalksError>;

    /// Exclude a talk from future ticks. The document is kept.
    fn deactivate(&self, name: &str) -> Result<(), TalksError>;

    /// Whether a talk with this name exists (active or not).
    fn exists(&self, name: &str) -> Result<bool, TalksError>;
}
