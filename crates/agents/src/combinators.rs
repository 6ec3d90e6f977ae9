// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent combinators: the state-machine plumbing around the rules.
//!
//! Combinators implement [`Agent`] themselves by overriding `execute`,
//! so a wrapped agent composes like any other. The edit-script hook
//! (`process`) is never reached on a combinator.

use async_trait::async_trait;
use drover_core::{Agent, AgentError, Assertion, Edit, FaultSink, SuperAgent, Talk, Talks};
use regex::Regex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Fixed ordered sequence of agents run against the same document.
///
/// Later agents see the mutations of earlier ones in the same tick. A
/// child's error aborts the remaining children; wrap children in
/// [`Contained`] where that is not acceptable.
pub struct Chain {
    children: Vec<Box<dyn Agent>>,
}

impl Chain {
    pub fn new(children: Vec<Box<dyn Agent>>) -> Self {
        Self { children }
    }
}

#[async_trait]
impl Agent for Chain {
    fn name(&self) -> &str {
        "chain"
    }

    fn requires(&self) -> &[Assertion] {
        &[]
    }

    async fn process(&self, _talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        // Unreachable: execute is overridden below.
        Ok(Vec::new())
    }

    async fn execute(&self, talk: &mut Talk) -> Result<bool, AgentError> {
        let mut changed = false;
        let mut total = 0;
        for agent in &self.children {
            changed |= agent.execute(talk).await?;
            total += 1;
        }
        debug!(total, talk = %talk.name, "executed agent(s)");
        Ok(changed)
    }
}

/// Error containment: log, forward to the fault sink, swallow.
///
/// One misbehaving agent must not block the rest of the pipeline or the
/// other sessions.
pub struct Contained {
    inner: Box<dyn Agent>,
    sink: Arc<dyn FaultSink>,
}

impl Contained {
    pub fn new(inner: Box<dyn Agent>, sink: Arc<dyn FaultSink>) -> Self {
        Self { inner, sink }
    }
}

#[async_trait]
impl Agent for Contained {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn requires(&self) -> &[Assertion] {
        self.inner.requires()
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        self.inner.process(talk).await
    }

    async fn execute(&self, talk: &mut Talk) -> Result<bool, AgentError> {
        match self.inner.execute(talk).await {
            Ok(changed) => Ok(changed),
            Err(e) => {
                error!(agent = self.inner.name(), talk = %talk.name, error = %e, "agent fault contained");
                self.sink.report(&talk.name, self.inner.name(), &e);
                Ok(false)
            }
        }
    }
}

/// Threshold above which [`Timed`] complains.
pub const SLOW_AGENT_THRESHOLD: Duration = Duration::from_secs(10);

/// Duration monitoring: a loud warning when the inner agent is slow.
/// An operability signal only — execution is never aborted.
pub struct Timed {
    inner: Box<dyn Agent>,
    threshold: Duration,
}

impl Timed {
    pub fn new(inner: Box<dyn Agent>) -> Self {
        Self {
            inner,
            threshold: SLOW_AGENT_THRESHOLD,
        }
    }

    pub fn with_threshold(inner: Box<dyn Agent>, threshold: Duration) -> Self {
        Self { inner, threshold }
    }
}

#[async_trait]
impl Agent for Timed {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn requires(&self) -> &[Assertion] {
        self.inner.requires()
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        self.inner.process(talk).await
    }

    async fn execute(&self, talk: &mut Talk) -> Result<bool, AgentError> {
        let start = Instant::now();
        let result = self.inner.execute(talk).await;
        let elapsed = start.elapsed();
        if elapsed > self.threshold {
            warn!(
                agent = self.inner.name(),
                talk = %talk.name,
                elapsed_ms = elapsed.as_millis() as u64,
                "agent is running slowly"
            );
        }
        result
    }
}

/// Context enrichment: rethrow errors with the session name attached.
/// Used at the pipeline boundary, where a bare error would not say which
/// session failed.
pub struct Verbose {
    inner: Box<dyn Agent>,
}

impl Verbose {
    pub fn new(inner: Box<dyn Agent>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Agent for Verbose {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn requires(&self) -> &[Assertion] {
        self.inner.requires()
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        self.inner.process(talk).await
    }

    async fn execute(&self, talk: &mut Talk) -> Result<bool, AgentError> {
        let name = talk.name.clone();
        self.inner
            .execute(talk)
            .await
            .map_err(|e| e.in_talk(name))
    }
}

/// Conditional disabling: a static boolean feature flag.
pub struct Disabled {
    inner: Box<dyn Agent>,
    disable: bool,
}

impl Disabled {
    pub fn new(inner: Box<dyn Agent>, disable: bool) -> Self {
        Self { inner, disable }
    }
}

#[async_trait]
impl Agent for Disabled {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn requires(&self) -> &[Assertion] {
        self.inner.requires()
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        self.inner.process(talk).await
    }

    async fn execute(&self, talk: &mut Talk) -> Result<bool, AgentError> {
        if self.disable {
            return Ok(false);
        }
        self.inner.execute(talk).await
    }
}

/// Name-pattern exclusion: skip sessions whose name matches.
pub struct ExceptNamed {
    inner: Box<dyn Agent>,
    pattern: Regex,
}

impl ExceptNamed {
    pub fn new(inner: Box<dyn Agent>, pattern: Regex) -> Self {
        Self { inner, pattern }
    }
}

#[async_trait]
impl Agent for ExceptNamed {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn requires(&self) -> &[Assertion] {
        self.inner.requires()
    }

    async fn process(&self, talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        self.inner.process(talk).await
    }

    async fn execute(&self, talk: &mut Talk) -> Result<bool, AgentError> {
        if self.pattern.is_match(&talk.name) {
            debug!(talk = %talk.name, pattern = %self.pattern, "talk excluded by name");
            return Ok(false);
        }
        self.inner.execute(talk).await
    }
}

/// Sequential composition for collection-scope agents.
///
/// Each child sweep is contained on its own: a failing sweep is logged
/// and the remaining sweeps still run.
pub struct SweepChain {
    children: Vec<Box<dyn SuperAgent>>,
}

impl SweepChain {
    pub fn new(children: Vec<Box<dyn SuperAgent>>) -> Self {
        Self { children }
    }
}

#[async_trait]
impl SuperAgent for SweepChain {
    fn name(&self) -> &str {
        "sweep-chain"
    }

    async fn execute(&self, talks: &dyn Talks) -> Result<(), AgentError> {
        for sweep in &self.children {
            if let Err(e) = sweep.execute(talks).await {
                error!(sweep = sweep.name(), error = %e, "sweep failed");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "combinators_tests.rs"]
mod tests;
