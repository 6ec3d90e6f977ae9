// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registers the statically configured shell endpoint.
//!
//! The static-pool alternative to the cloud pipeline: when builds run on
//! a fixed host, the daemon gets its shell straight from configuration.
//! Assembly disables this agent whenever the cloud mode is on.

use crate::config::StaticShellConfig;
use async_trait::async_trait;
use drover_core::{Agent, AgentError, Assertion, Edit, ShellConn, Talk};
use tracing::info;

/// Hands the fixed endpoint to any daemon waiting for a shell.
pub struct RegistersShell {
    endpoint: StaticShellConfig,
}

impl RegistersShell {
    pub fn new(endpoint: StaticShellConfig) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl Agent for RegistersShell {
    fn name(&self) -> &str {
        "registers-shell"
    }

    fn requires(&self) -> &[Assertion] {
        const REQUIRES: &[Assertion] = &[
            Assertion::Exists("daemon"),
            Assertion::Absent("shell"),
            Assertion::Absent("ec2"),
        ];
        REQUIRES
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        let Some(daemon) = talk.daemon.as_ref() else {
            return Ok(Vec::new());
        };
        info!(talk = %talk.name, host = %self.endpoint.host, "static shell registered");
        Ok(vec![Edit::SetShell(ShellConn {
            id: daemon.id.clone(),
            host: self.endpoint.host.clone(),
            port: self.endpoint.port,
            login: self.endpoint.login.clone(),
            key: self.endpoint.key.clone(),
        })])
    }
}

#[cfg(test)]
#[path = "registers_tests.rs"]
mod tests;
