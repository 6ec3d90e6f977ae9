// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cloud provider adapters.
//!
//! The provider owns the truth about instances; everything returned here
//! is a point-in-time, eventually-consistent observation. An instance may
//! report `Running` before it has an address, and a described instance
//! may already be gone on the next call.

mod aws_cli;

pub use aws_cli::AwsCliProvider;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{CloudCall, FakeCloudProvider, FakeInstance};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors from provider operations.
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("provider call failed: {0}")]
    Call(String),
    #[error("unexpected provider response: {0}")]
    Parse(String),
}

/// Coarse provider-reported instance state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceState {
    Pending,
    Running,
    Stopping,
    Stopped,
    ShuttingDown,
    Terminated,
    /// A state name this adapter does not recognize.
    Other(String),
}

impl InstanceState {
    pub fn from_name(name: &str) -> Self {
        match name {
            "pending" => InstanceState::Pending,
            "running" => InstanceState::Running,
            "stopping" => InstanceState::Stopping,
            "stopped" => InstanceState::Stopped,
            "shutting-down" => InstanceState::ShuttingDown,
            "terminated" => InstanceState::Terminated,
            other => InstanceState::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for InstanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceState::Pending => write!(f, "pending"),
            InstanceState::Running => write!(f, "running"),
            InstanceState::Stopping => write!(f, "stopping"),
            InstanceState::Stopped => write!(f, "stopped"),
            InstanceState::ShuttingDown => write!(f, "shutting-down"),
            InstanceState::Terminated => write!(f, "terminated"),
            InstanceState::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Point-in-time description of one instance.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceInfo {
    pub id: String,
    pub state: InstanceState,
    pub launched_at: Option<DateTime<Utc>>,
    /// Public address, present only once the provider assigned one.
    pub public_host: Option<String>,
    pub instance_type: Option<String>,
}

/// What to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub image: String,
    pub instance_type: String,
    pub security_group: String,
    pub subnet: String,
}

/// Adapter for the cloud provider API.
///
/// All operations are synchronous request/response at the call site, can
/// fail transiently, and return eventually-consistent data.
#[async_trait]
pub trait CloudProvider: Clone + Send + Sync + 'static {
    /// Launch one instance, returning its id.
    async fn run_instance(&self, spec: &LaunchSpec) -> Result<String, CloudError>;

    /// Describe one instance. `None` means the provider no longer knows it.
    async fn describe_instance(&self, id: &str) -> Result<Option<InstanceInfo>, CloudError>;

    /// Coarse state of one instance. `None` means no status is reported.
    async fn instance_status(&self, id: &str) -> Result<Option<InstanceState>, CloudError>;

    /// Stop (not terminate) an instance.
    async fn stop_instance(&self, id: &str) -> Result<(), CloudError>;

    /// Terminate an instance.
    async fn terminate_instance(&self, id: &str) -> Result<(), CloudError>;

    /// Tag an instance.
    async fn create_tags(&self, id: &str, tags: &[(String, String)]) -> Result<(), CloudError>;

    /// All instances carrying the given tag, in any state.
    async fn list_tagged(&self, key: &str, value: &str)
        -> Result<Vec<InstanceInfo>, CloudError>;
}
