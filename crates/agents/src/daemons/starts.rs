// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launches the build script on the registered shell.
//!
//! The script is uploaded as `run.sh` and started detached; `status`
//! receives the exit code when it finishes, `stdout` the output. When
//! the launch itself fails the daemon is ended with code 128 and the
//! error in its tail — visible to the user, retried by nobody.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use drover_adapters::RemoteShell;
use drover_core::{Agent, AgentError, Assertion, Clock, Edit, Talk};
use std::sync::Arc;
use tracing::{info, warn};

/// Marks the daemon started and launches it remotely.
pub struct StartsDaemon<S: RemoteShell> {
    shell: S,
    clock: Arc<dyn Clock>,
}

impl<S: RemoteShell> StartsDaemon<S> {
    pub fn new(shell: S, clock: Arc<dyn Clock>) -> Self {
        Self { shell, clock }
    }

    fn launch_command(dir: &str, script: &str) -> String {
        let body = [
            "#!/bin/bash",
            "set -x",
            "set -e",
            "set -o pipefail",
            "cd $(dirname $0)",
            "echo $$ > pid",
            "date",
            "uptime",
            script,
        ]
        .join("\n");
        format!(
            "mkdir -p {dir} && cd {dir} && cat > run.sh <<'__DROVER__'\n{body}\n__DROVER__\n\
             chmod a+x run.sh && \
             echo 'run.sh failed to start' > stdout && \
             ( ( nohup ./run.sh </dev/null >stdout 2>&1; echo $? >status ) </dev/null >/dev/null 2>&1 & )",
        )
    }
}

#[async_trait]
impl<S: RemoteShell> Agent for StartsDaemon<S> {
    fn name(&self) -> &str {
        "starts-daemon"
    }

    fn requires(&self) -> &[Assertion] {
        const REQUIRES: &[Assertion] = &[
            Assertion::Exists("daemon"),
            Assertion::Absent("daemon/started"),
            Assertion::Absent("daemon/ended"),
            Assertion::Exists("shell/host"),
        ];
        REQUIRES
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        let (Some(daemon), Some(conn)) = (talk.daemon.as_ref(), talk.shell.as_ref()) else {
            return Ok(Vec::new());
        };
        let at: DateTime<Utc> = self.clock.now();
        let dir = format!("/tmp/drover-{}", daemon.id);
        let command = Self::launch_command(&dir, &daemon.script);

        let started = Edit::MarkDaemonStarted {
            at,
            dir: dir.clone(),
        };
        match self.shell.exec(conn, &command).await {
            Ok(outcome) if outcome.success() => {
                info!(talk = %talk.name, dir = %dir, "daemon started");
                Ok(vec![started])
            }
            Ok(outcome) => {
                warn!(talk = %talk.name, code = outcome.code, "daemon failed to launch");
                Ok(vec![
                    started,
                    Edit::EndDaemon {
                        at,
                        code: 128,
                        tail: outcome.stdout,
                    },
                ])
            }
            Err(e) => {
                warn!(talk = %talk.name, error = %e, "daemon launch errored");
                Ok(vec![
                    started,
                    Edit::EndDaemon {
                        at,
                        code: 128,
                        tail: e.to_string(),
                    },
                ])
            }
        }
    }
}

#[cfg(test)]
#[path = "starts_tests.rs"]
mod tests;
