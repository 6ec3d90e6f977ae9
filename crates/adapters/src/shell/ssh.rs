// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SSH shell adapter backed by the `ssh` binary.

use super::{ExecOutcome, RemoteShell, ShellError};
use crate::subprocess::{run_with_timeout, SSH_TIMEOUT};
use async_trait::async_trait;
use tokio::process::Command;

/// Remote shell that shells out to `ssh`.
///
/// BatchMode keeps the client from ever prompting; host keys are not
/// checked because the endpoints are short-lived instances whose keys
/// were never seen before.
#[derive(Clone, Debug, Default)]
pub struct SshShell;

impl SshShell {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RemoteShell for SshShell {
    async fn exec(
        &self,
        conn: &drover_core::ShellConn,
        cmd: &str,
    ) -> Result<ExecOutcome, ShellError> {
        let mut ssh = Command::new("ssh");
        ssh.args([
            "-p",
            &conn.port.to_string(),
            "-i",
            &conn.key,
            "-o",
            "BatchMode=yes",
            "-o",
            "StrictHostKeyChecking=no",
            "-o",
            "UserKnownHostsFile=/dev/null",
            "-o",
            "ConnectTimeout=10",
            &format!("{}@{}", conn.login, conn.host),
            cmd,
        ]);
        let output = run_with_timeout(ssh, SSH_TIMEOUT, "ssh exec")
            .await
            .map_err(ShellError::Connect)?;
        // ssh reserves 255 for its own failures (unreachable host, auth);
        // anything else is the remote command's exit code.
        Ok(ExecOutcome {
            code: output.status.code().unwrap_or(255),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        })
    }
}

#[cfg(test)]
#[path = "ssh_tests.rs"]
mod tests;
