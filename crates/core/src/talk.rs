// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The session document ("talk").
//!
//! One talk per build session, persisted as JSON and validated against
//! the schema in [`crate::schema`]. Children appear and disappear as the
//! session advances: a `request` becomes a `daemon`, the daemon acquires
//! a `shell` (possibly through an `ec2` instance), and finished work is
//! folded into the `archive`. All mutation goes through [`Talk::modify`],
//! which applies an edit script all-or-nothing.

use crate::edit::Edit;
use crate::schema::{self, SchemaError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors from document mutation.
#[derive(Debug, Error)]
pub enum TalkError {
    #[error("edit rejected: {0}")]
    Edit(#[from] crate::edit::EditError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Routing information for a session. Immutable once set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire {
    /// Originating repository, as an `org/repo` slug.
    pub repo: String,
    /// Issue or pull request number the session belongs to.
    pub issue: u64,
    /// Callback URL for result delivery.
    pub href: String,
}

impl Wire {
    /// Organization part of the repository slug.
    pub fn org(&self) -> &str {
        self.repo.split('/').next().unwrap_or(&self.repo)
    }
}

/// What kind of work a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Merge,
    Release,
    Deploy,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Merge => write!(f, "merge"),
            RequestKind::Release => write!(f, "release"),
            RequestKind::Deploy => write!(f, "deploy"),
        }
    }
}

/// The command a session was asked to execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: String,
    pub kind: RequestKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub args: BTreeMap<String, String>,
    /// Collection-wide sequence number, assigned by the index sweep.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
    /// Outcome, recorded once the daemon finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

/// Connection descriptor for the remote execution endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConn {
    /// Correlates the shell to the daemon that needed it.
    pub id: String,
    pub host: String,
    pub port: u16,
    pub login: String,
    /// Path to the private key file.
    pub key: String,
}

/// The build process running (or finished) on the remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Daemon {
    pub id: String,
    pub title: String,
    pub script: String,
    /// Remote working directory, set once the script is launched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    /// Last lines of output, kept for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tail: Option<String>,
}

/// Cloud instance descriptor. The provider owns the truth; this is the
/// local record being reconciled against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ec2 {
    pub instance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

/// Record of a completed step, kept in the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub title: String,
    /// Continues the collection-wide request counter.
    pub index: u64,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// The session document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Talk {
    /// Unique sequential number across the collection.
    pub number: u64,
    /// Unique human-readable name.
    pub name: String,
    /// A deferred talk is kept active even when it looks finished.
    #[serde(default, skip_serializing_if = "is_false")]
    pub deferred: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wire: Option<Wire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<Request>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<ShellConn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daemon: Option<Daemon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ec2: Option<Ec2>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub archive: Vec<LogEntry>,
}

impl Talk {
    /// Create a fresh talk with no children.
    pub fn new(number: u64, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            deferred: false,
            public: None,
            wire: None,
            request: None,
            shell: None,
            daemon: None,
            ec2: None,
            archive: Vec::new(),
        }
    }

    /// JSON form of the document, as validated and persisted.
    ///
    /// Serialization of this struct shape cannot fail; the fallback keeps
    /// the conversion total without a panic path.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Apply an edit script all-or-nothing.
    ///
    /// Edits run against a scratch copy which must validate against the
    /// schema before it replaces the document. An empty script leaves the
    /// talk byte-for-byte unchanged. Returns whether anything changed.
    pub fn modify(&mut self, edits: Vec<Edit>) -> Result<bool, TalkError> {
        if edits.is_empty() {
            return Ok(false);
        }
        let mut scratch = self.clone();
        for edit in edits {
            edit.apply(&mut scratch)?;
        }
        schema::validate(&scratch.to_value())?;
        let changed = scratch != *self;
        *self = scratch;
        Ok(changed)
    }

    /// A talk with nothing left to do: no request, no daemon, no shell,
    /// and not deferred. Such talks are eligible for deactivation.
    pub fn is_finished(&self) -> bool {
        self.request.is_none()
            && self.daemon.is_none()
            && self.shell.is_none()
            && !self.deferred
    }

    /// Highest index recorded in this talk, over the live request and the
    /// archived log entries.
    pub fn max_index(&self) -> u64 {
        let archived = self.archive.iter().map(|l| l.index).max().unwrap_or(0);
        let live = self.request.as_ref().and_then(|r| r.index).unwrap_or(0);
        archived.max(live)
    }
}

#[cfg(test)]
#[path = "talk_tests.rs"]
mod tests;
