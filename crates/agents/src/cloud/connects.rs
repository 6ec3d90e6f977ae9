// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Confirms the booted instance answers over SSH.
//!
//! One probe per tick. Success registers the shell; failure logs the
//! instance age and provider-reported status for diagnosis and leaves
//! the talk in the booting state. Probe failure never throws — a slow
//! boot is not an error.

use async_trait::async_trait;
use drover_adapters::{CloudProvider, RemoteShell};
use drover_core::{Agent, AgentError, Assertion, Clock, Edit, ShellConn, Talk};
use std::sync::Arc;
use tracing::{info, warn};

/// Connection defaults for freshly launched instances.
#[derive(Debug, Clone)]
pub struct ConnectSettings {
    pub port: u16,
    pub login: String,
    /// Path to the private key file.
    pub key: String,
}

/// Registers the shell once the instance is reachable.
pub struct ConnectsInstance<C: CloudProvider, S: RemoteShell> {
    api: C,
    shell: S,
    settings: ConnectSettings,
    clock: Arc<dyn Clock>,
}

impl<C: CloudProvider, S: RemoteShell> ConnectsInstance<C, S> {
    pub fn new(api: C, shell: S, settings: ConnectSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            shell,
            settings,
            clock,
        }
    }
}

#[async_trait]
impl<C: CloudProvider, S: RemoteShell> Agent for ConnectsInstance<C, S> {
    fn name(&self) -> &str {
        "connects-instance"
    }

    fn requires(&self) -> &[Assertion] {
        const REQUIRES: &[Assertion] = &[
            Assertion::Exists("daemon"),
            Assertion::Exists("ec2/host"),
            Assertion::Absent("shell"),
        ];
        REQUIRES
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        let (Some(daemon), Some(ec2)) = (talk.daemon.as_ref(), talk.ec2.as_ref()) else {
            return Ok(Vec::new());
        };
        let Some(host) = ec2.host.clone() else {
            return Ok(Vec::new());
        };
        let conn = ShellConn {
            id: daemon.id.clone(),
            host,
            port: self.settings.port,
            login: self.settings.login.clone(),
            key: self.settings.key.clone(),
        };

        if self.shell.probe(&conn).await {
            info!(talk = %talk.name, instance = %ec2.instance, host = %conn.host, "instance connected");
            return Ok(vec![Edit::SetShell(conn)]);
        }

        // Not reachable yet: pull the provider's view for the log.
        let described = self
            .api
            .describe_instance(&ec2.instance)
            .await
            .unwrap_or(None);
        let status = described
            .as_ref()
            .map(|i| i.state.to_string())
            .unwrap_or_else(|| "absent".to_string());
        let age_secs = described
            .and_then(|i| i.launched_at)
            .map(|t| (self.clock.now() - t).num_seconds())
            .unwrap_or(-1);
        warn!(
            talk = %talk.name,
            instance = %ec2.instance,
            host = %conn.host,
            status = %status,
            age_secs,
            "instance not reachable yet"
        );
        Ok(Vec::new())
    }
}

#[cfg(test)]
#[path = "connects_tests.rs"]
mod tests;
