// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Liveness check on the connected instance.
//!
//! The only bounded-retry loop in the system: up to three probes with a
//! fixed pause between attempts, inside one invocation. After the last
//! failure the instance is presumed dead — the daemon is force-ended
//! (or removed, if it never started) and the cleanup agents take over.

use async_trait::async_trait;
use drover_adapters::RemoteShell;
use drover_core::{Agent, AgentError, Assertion, Clock, Edit, Talk};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

const ATTEMPTS: u32 = 3;
const PAUSE: Duration = Duration::from_secs(1);

/// Probes the registered shell and declares the daemon dead on repeated
/// failure.
pub struct PingsInstance<S: RemoteShell> {
    shell: S,
    clock: Arc<dyn Clock>,
    pause: Duration,
}

impl<S: RemoteShell> PingsInstance<S> {
    pub fn new(shell: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            shell,
            clock,
            pause: PAUSE,
        }
    }

    /// Override the inter-attempt pause (tests).
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }
}

#[async_trait]
impl<S: RemoteShell> Agent for PingsInstance<S> {
    fn name(&self) -> &str {
        "pings-instance"
    }

    fn requires(&self) -> &[Assertion] {
        const REQUIRES: &[Assertion] = &[
            Assertion::Exists("shell"),
            Assertion::Exists("daemon"),
        ];
        REQUIRES
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        let (Some(daemon), Some(conn)) = (talk.daemon.as_ref(), talk.shell.as_ref()) else {
            return Ok(Vec::new());
        };

        for attempt in 1..=ATTEMPTS {
            if self.shell.probe(conn).await {
                return Ok(Vec::new());
            }
            warn!(
                talk = %talk.name,
                host = %conn.host,
                attempt,
                "liveness probe failed"
            );
            if attempt < ATTEMPTS {
                tokio::time::sleep(self.pause).await;
            }
        }

        warn!(talk = %talk.name, host = %conn.host, "instance presumed dead");
        if daemon.started.is_some() {
            Ok(vec![Edit::EndDaemon {
                at: self.clock.now(),
                code: 1,
                tail: format!("The host {} stopped answering", conn.host),
            }])
        } else {
            Ok(vec![Edit::RemoveDaemon])
        }
    }
}

#[cfg(test)]
#[path = "pings_tests.rs"]
mod tests;
