// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collects the result of a finished build.
//!
//! The launcher leaves the exit code in `status` next to the script;
//! until that file exists the build is still running and this agent is
//! a no-op. Shell trouble here is transient by definition — the next
//! tick observes again.

use async_trait::async_trait;
use drover_adapters::RemoteShell;
use drover_core::{Agent, AgentError, Assertion, Clock, Edit, Talk};
use std::sync::Arc;
use tracing::{info, warn};

const TAIL_LINES: u32 = 20;

/// Records `ended`, exit `code`, and a `tail` of output.
pub struct EndsDaemon<S: RemoteShell> {
    shell: S,
    clock: Arc<dyn Clock>,
}

impl<S: RemoteShell> EndsDaemon<S> {
    pub fn new(shell: S, clock: Arc<dyn Clock>) -> Self {
        Self { shell, clock }
    }
}

#[async_trait]
impl<S: RemoteShell> Agent for EndsDaemon<S> {
    fn name(&self) -> &str {
        "ends-daemon"
    }

    fn requires(&self) -> &[Assertion] {
        const REQUIRES: &[Assertion] = &[
            Assertion::Exists("daemon/started"),
            Assertion::Exists("daemon/dir"),
            Assertion::Absent("daemon/ended"),
            Assertion::Exists("shell"),
        ];
        REQUIRES
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        let (Some(daemon), Some(conn)) = (talk.daemon.as_ref(), talk.shell.as_ref()) else {
            return Ok(Vec::new());
        };
        let Some(dir) = daemon.dir.as_deref() else {
            return Ok(Vec::new());
        };

        let check = format!("if [ -e {dir}/status ]; then cat {dir}/status; else echo RUNNING; fi");
        let outcome = match self.shell.exec(conn, &check).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(talk = %talk.name, error = %e, "status check failed, will retry");
                return Ok(Vec::new());
            }
        };
        let status = outcome.stdout.trim().to_string();
        if status == "RUNNING" || status.is_empty() {
            return Ok(Vec::new());
        }
        let Ok(code) = status.parse::<i32>() else {
            warn!(talk = %talk.name, status = %status, "unreadable status file, will retry");
            return Ok(Vec::new());
        };

        let tail = match self
            .shell
            .exec(conn, &format!("tail -n {} {}/stdout", TAIL_LINES, dir))
            .await
        {
            Ok(outcome) if outcome.success() => outcome.stdout,
            _ => String::new(),
        };

        info!(talk = %talk.name, code, "daemon ended");
        Ok(vec![Edit::EndDaemon {
            at: self.clock.now(),
            code,
            tail,
        }])
    }
}

#[cfg(test)]
#[path = "ends_tests.rs"]
mod tests;
