// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake cloud provider for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{CloudError, CloudProvider, InstanceInfo, InstanceState, LaunchSpec};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Recorded provider call
#[derive(Debug, Clone, PartialEq)]
pub enum CloudCall {
    RunInstance { spec: LaunchSpec },
    Describe { id: String },
    Status { id: String },
    Stop { id: String },
    Terminate { id: String },
    CreateTags { id: String, tags: Vec<(String, String)> },
    ListTagged { key: String, value: String },
}

/// Scriptable instance state
#[derive(Debug, Clone)]
pub struct FakeInstance {
    pub id: String,
    pub state: InstanceState,
    pub launched_at: DateTime<Utc>,
    pub public_host: Option<String>,
    pub instance_type: String,
    pub tags: Vec<(String, String)>,
}

struct FakeCloudState {
    instances: HashMap<String, FakeInstance>,
    calls: Vec<CloudCall>,
    next_id: u64,
    fail_terminate: bool,
    fail_run: bool,
    launch_time: Option<DateTime<Utc>>,
}

/// Fake cloud provider for testing
#[derive(Clone)]
pub struct FakeCloudProvider {
    inner: Arc<Mutex<FakeCloudState>>,
}

impl Default for FakeCloudProvider {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeCloudState {
                instances: HashMap::new(),
                calls: Vec::new(),
                next_id: 0,
                fail_terminate: false,
                fail_run: false,
                launch_time: None,
            })),
        }
    }
}

impl FakeCloudProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<CloudCall> {
        self.inner.lock().calls.clone()
    }

    /// Get an instance by id
    pub fn get_instance(&self, id: &str) -> Option<FakeInstance> {
        self.inner.lock().instances.get(id).cloned()
    }

    /// Add a pre-existing instance
    pub fn add_instance(&self, instance: FakeInstance) {
        self.inner
            .lock()
            .instances
            .insert(instance.id.clone(), instance);
    }

    /// Set an instance's provider-reported state
    pub fn set_state(&self, id: &str, state: InstanceState) {
        if let Some(instance) = self.inner.lock().instances.get_mut(id) {
            instance.state = state;
        }
    }

    /// Assign a public address to an instance
    pub fn set_host(&self, id: &str, host: &str) {
        if let Some(instance) = self.inner.lock().instances.get_mut(id) {
            instance.public_host = Some(host.to_string());
        }
    }

    /// Pin the launch time of future instances (pairs with a fake clock)
    pub fn launch_at(&self, at: DateTime<Utc>) {
        self.inner.lock().launch_time = Some(at);
    }

    /// Backdate an instance's launch time
    pub fn set_launched_at(&self, id: &str, at: DateTime<Utc>) {
        if let Some(instance) = self.inner.lock().instances.get_mut(id) {
            instance.launched_at = at;
        }
    }

    /// Forget an instance entirely (the provider lost it)
    pub fn remove_instance(&self, id: &str) {
        self.inner.lock().instances.remove(id);
    }

    /// Make terminate calls fail
    pub fn fail_terminate(&self, fail: bool) {
        self.inner.lock().fail_terminate = fail;
    }

    /// Make run-instance calls fail
    pub fn fail_run(&self, fail: bool) {
        self.inner.lock().fail_run = fail;
    }

    fn info(instance: &FakeInstance) -> InstanceInfo {
        InstanceInfo {
            id: instance.id.clone(),
            state: instance.state.clone(),
            launched_at: Some(instance.launched_at),
            public_host: instance.public_host.clone(),
            instance_type: Some(instance.instance_type.clone()),
        }
    }
}

#[async_trait]
impl CloudProvider for FakeCloudProvider {
    async fn run_instance(&self, spec: &LaunchSpec) -> Result<String, CloudError> {
        let mut inner = self.inner.lock();
        inner.calls.push(CloudCall::RunInstance { spec: spec.clone() });
        if inner.fail_run {
            return Err(CloudError::Call("run-instances refused".to_string()));
        }
        inner.next_id += 1;
        let id = format!("i-fake{:04}", inner.next_id);
        let launched_at = inner.launch_time.unwrap_or_else(Utc::now);
        inner.instances.insert(
            id.clone(),
            FakeInstance {
                id: id.clone(),
                state: InstanceState::Pending,
                launched_at,
                public_host: None,
                instance_type: spec.instance_type.clone(),
                tags: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn describe_instance(&self, id: &str) -> Result<Option<InstanceInfo>, CloudError> {
        let mut inner = self.inner.lock();
        inner.calls.push(CloudCall::Describe { id: id.to_string() });
        Ok(inner.instances.get(id).map(Self::info))
    }

    async fn instance_status(&self, id: &str) -> Result<Option<InstanceState>, CloudError> {
        let mut inner = self.inner.lock();
        inner.calls.push(CloudCall::Status { id: id.to_string() });
        Ok(inner.instances.get(id).map(|i| i.state.clone()))
    }

    async fn stop_instance(&self, id: &str) -> Result<(), CloudError> {
        let mut inner = self.inner.lock();
        inner.calls.push(CloudCall::Stop { id: id.to_string() });
        if let Some(instance) = inner.instances.get_mut(id) {
            instance.state = InstanceState::Stopping;
        }
        Ok(())
    }

    async fn terminate_instance(&self, id: &str) -> Result<(), CloudError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(CloudCall::Terminate { id: id.to_string() });
        if inner.fail_terminate {
            return Err(CloudError::Call("terminate-instances refused".to_string()));
        }
        if let Some(instance) = inner.instances.get_mut(id) {
            instance.state = InstanceState::Terminated;
        }
        Ok(())
    }

    async fn create_tags(&self, id: &str, tags: &[(String, String)]) -> Result<(), CloudError> {
        let mut inner = self.inner.lock();
        inner.calls.push(CloudCall::CreateTags {
            id: id.to_string(),
            tags: tags.to_vec(),
        });
        if let Some(instance) = inner.instances.get_mut(id) {
            instance.tags.extend_from_slice(tags);
        }
        Ok(())
    }

    async fn list_tagged(
        &self,
        key: &str,
        value: &str,
    ) -> Result<Vec<InstanceInfo>, CloudError> {
        let mut inner = self.inner.lock();
        inner.calls.push(CloudCall::ListTagged {
            key: key.to_string(),
            value: value.to_string(),
        });
        let mut infos: Vec<InstanceInfo> = inner
            .instances
            .values()
            .filter(|i| i.tags.iter().any(|(k, v)| k == key && v == value))
            .map(Self::info)
            .collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(infos)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
