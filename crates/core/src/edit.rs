// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Edit scripts: the typed mutations agents produce.
//!
//! An agent never touches the document directly; it returns a list of
//! edits which [`crate::talk::Talk::modify`] applies atomically. Each
//! edit checks its own structural guard, so an ill-ordered script is
//! rejected as a whole rather than half-applied.

use crate::talk::{Daemon, Ec2, LogEntry, Request, ShellConn, Talk, Wire};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Structural guard violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("wire is already set")]
    WireAlreadySet,
    #[error("no request to edit")]
    NoRequest,
    #[error("request already has index {0}")]
    IndexAlreadySet(u64),
    #[error("a request is already present")]
    RequestAlreadySet,
    #[error("shell requires a daemon")]
    ShellWithoutDaemon,
    #[error("a shell is already registered")]
    ShellAlreadySet,
    #[error("no shell to remove")]
    NoShell,
    #[error("a daemon is already present")]
    DaemonAlreadySet,
    #[error("no daemon to edit")]
    NoDaemon,
    #[error("instance requires a daemon")]
    InstanceWithoutDaemon,
    #[error("an instance is already recorded")]
    InstanceAlreadySet,
    #[error("instance may not be added while a shell is registered")]
    InstanceAfterShell,
    #[error("no instance to edit")]
    NoInstance,
}

/// One mutation of the session document.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Attach routing info. Rejected when wire is already present.
    AttachWire(Wire),
    /// Install a new request. Rejected when one is already present.
    SetRequest(Request),
    /// Assign the collection-wide index to the pending request.
    AssignIndex(u64),
    /// Record the request outcome.
    MarkRequestDone { success: bool },
    RemoveRequest,
    /// Register the remote endpoint. Requires a daemon and no shell.
    SetShell(ShellConn),
    RemoveShell,
    /// Materialize the build daemon. Requires no existing daemon.
    SetDaemon(Daemon),
    /// The script was launched remotely.
    MarkDaemonStarted { at: DateTime<Utc>, dir: String },
    /// Replace the script text, used to surface configuration failures
    /// to the user instead of running anything.
    ReplaceScript(String),
    /// The build finished (or was declared dead).
    EndDaemon {
        at: DateTime<Utc>,
        code: i32,
        tail: String,
    },
    RemoveDaemon,
    /// Record a freshly launched cloud instance. Requires a daemon and
    /// neither an instance nor a shell.
    SetInstance { id: String },
    /// The provider reported the instance address.
    SetInstanceHost(String),
    RemoveInstance,
    /// Append a completed-step record to the archive.
    AppendLog(LogEntry),
    SetDeferred(bool),
}

impl Edit {
    /// Apply this edit to the document, enforcing its structural guard.
    pub fn apply(self, talk: &mut Talk) -> Result<(), EditError> {
        match self {
            Edit::AttachWire(wire) => {
                if talk.wire.is_some() {
                    return Err(EditError::WireAlreadySet);
                }
                talk.wire = Some(wire);
            }
            Edit::SetRequest(request) => {
                if talk.request.is_some() {
                    return Err(EditError::RequestAlreadySet);
                }
                talk.request = Some(request);
            }
            Edit::AssignIndex(index) => {
                let request = talk.request.as_mut().ok_or(EditError::NoRequest)?;
                if let Some(existing) = request.index {
                    return Err(EditError::IndexAlreadySet(existing));
                }
                request.index = Some(index);
            }
            Edit::MarkRequestDone { success } => {
                let request = talk.request.as_mut().ok_or(EditError::NoRequest)?;
                request.success = Some(success);
            }
            Edit::RemoveRequest => {
                if talk.request.take().is_none() {
                    return Err(EditError::NoRequest);
                }
            }
            Edit::SetShell(conn) => {
                if talk.daemon.is_none() {
                    return Err(EditError::ShellWithoutDaemon);
                }
                if talk.shell.is_some() {
                    return Err(EditError::ShellAlreadySet);
                }
                talk.shell = Some(conn);
            }
            Edit::RemoveShell => {
                if talk.shell.take().is_none() {
                    return Err(EditError::NoShell);
                }
            }
            Edit::SetDaemon(daemon) => {
                if talk.daemon.is_some() {
                    return Err(EditError::DaemonAlreadySet);
                }
                talk.daemon = Some(daemon);
            }
            Edit::MarkDaemonStarted { at, dir } => {
                let daemon = talk.daemon.as_mut().ok_or(EditError::NoDaemon)?;
                daemon.started = Some(at);
                daemon.dir = Some(dir);
            }
            Edit::ReplaceScript(script) => {
                let daemon = talk.daemon.as_mut().ok_or(EditError::NoDaemon)?;
                daemon.script = script;
            }
            Edit::EndDaemon { at, code, tail } => {
                let daemon = talk.daemon.as_mut().ok_or(EditError::NoDaemon)?;
                daemon.ended = Some(at);
                daemon.code = Some(code);
                daemon.tail = Some(tail);
            }
            Edit::RemoveDaemon => {
                if talk.daemon.take().is_none() {
                    return Err(EditError::NoDaemon);
                }
            }
            Edit::SetInstance { id } => {
                if talk.daemon.is_none() {
                    return Err(EditError::InstanceWithoutDaemon);
                }
                if talk.ec2.is_some() {
                    return Err(EditError::InstanceAlreadySet);
                }
                if talk.shell.is_some() {
                    return Err(EditError::InstanceAfterShell);
                }
                talk.ec2 = Some(Ec2 {
                    instance: id,
                    host: None,
                });
            }
            Edit::SetInstanceHost(host) => {
                let ec2 = talk.ec2.as_mut().ok_or(EditError::NoInstance)?;
                ec2.host = Some(host);
            }
            Edit::RemoveInstance => {
                if talk.ec2.take().is_none() {
                    return Err(EditError::NoInstance);
                }
            }
            Edit::AppendLog(entry) => {
                talk.archive.push(entry);
            }
            Edit::SetDeferred(deferred) => {
                talk.deferred = deferred;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "edit_tests.rs"]
mod tests;
