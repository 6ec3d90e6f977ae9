// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fault sink implementations.
//!
//! The sink receives agent faults the containment combinator swallowed,
//! for operator visibility. Reporting must never block or fail the
//! pipeline.

use drover_core::{AgentError, FaultSink};

/// Fault sink that writes to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogFaultSink;

impl LogFaultSink {
    pub fn new() -> Self {
        Self
    }
}

impl FaultSink for LogFaultSink {
    fn report(&self, talk: &str, agent: &str, error: &AgentError) {
        tracing::error!(talk, agent, error = %error, "agent fault");
    }
}

/// Recorded fault, for assertions in tests.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub talk: String,
    pub agent: String,
    pub message: String,
}

/// Fault sink that records reports.
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone, Default)]
pub struct FakeFaultSink {
    faults: std::sync::Arc<parking_lot::Mutex<Vec<Fault>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeFaultSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn faults(&self) -> Vec<Fault> {
        self.faults.lock().clone()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl FaultSink for FakeFaultSink {
    fn report(&self, talk: &str, agent: &str, error: &AgentError) {
        self.faults.lock().push(Fault {
            talk: talk.to_string(),
            agent: agent.to_string(),
            message: error.to_string(),
        });
    }
}
