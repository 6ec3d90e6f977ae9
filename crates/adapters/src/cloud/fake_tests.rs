// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn spec() -> LaunchSpec {
    LaunchSpec {
        image: "ami-123".to_string(),
        instance_type: "t3.medium".to_string(),
        security_group: "sg-1".to_string(),
        subnet: "subnet-1".to_string(),
    }
}

#[tokio::test]
async fn run_creates_a_pending_instance() {
    let cloud = FakeCloudProvider::new();
    let id = cloud.run_instance(&spec()).await.unwrap();
    let info = cloud.describe_instance(&id).await.unwrap().unwrap();
    assert_eq!(info.state, InstanceState::Pending);
    assert!(info.public_host.is_none());
}

#[tokio::test]
async fn scripted_state_transitions_are_observed() {
    let cloud = FakeCloudProvider::new();
    let id = cloud.run_instance(&spec()).await.unwrap();
    cloud.set_state(&id, InstanceState::Running);
    cloud.set_host(&id, "10.0.0.7");

    let info = cloud.describe_instance(&id).await.unwrap().unwrap();
    assert_eq!(info.state, InstanceState::Running);
    assert_eq!(info.public_host.as_deref(), Some("10.0.0.7"));
    assert_eq!(
        cloud.instance_status(&id).await.unwrap(),
        Some(InstanceState::Running)
    );
}

#[tokio::test]
async fn removed_instances_describe_as_absent() {
    let cloud = FakeCloudProvider::new();
    let id = cloud.run_instance(&spec()).await.unwrap();
    cloud.remove_instance(&id);
    assert!(cloud.describe_instance(&id).await.unwrap().is_none());
    assert!(cloud.instance_status(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn list_tagged_filters_by_tag() {
    let cloud = FakeCloudProvider::new();
    let a = cloud.run_instance(&spec()).await.unwrap();
    let b = cloud.run_instance(&spec()).await.unwrap();
    cloud
        .create_tags(&a, &[("drover".to_string(), "yes".to_string())])
        .await
        .unwrap();

    let tagged = cloud.list_tagged("drover", "yes").await.unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].id, a);
    assert_ne!(tagged[0].id, b);
}

#[tokio::test]
async fn calls_are_recorded_in_order() {
    let cloud = FakeCloudProvider::new();
    let id = cloud.run_instance(&spec()).await.unwrap();
    cloud.stop_instance(&id).await.unwrap();
    cloud.terminate_instance(&id).await.unwrap();

    let calls = cloud.calls();
    assert!(matches!(calls[0], CloudCall::RunInstance { .. }));
    assert!(matches!(calls[1], CloudCall::Stop { .. }));
    assert!(matches!(calls[2], CloudCall::Terminate { .. }));
}

#[tokio::test]
async fn scripted_failures_surface_as_errors() {
    let cloud = FakeCloudProvider::new();
    let id = cloud.run_instance(&spec()).await.unwrap();
    cloud.fail_terminate(true);
    assert!(cloud.terminate_instance(&id).await.is_err());
    // The instance is untouched by the failed call.
    assert_eq!(
        cloud.instance_status(&id).await.unwrap(),
        Some(InstanceState::Pending)
    );
}
