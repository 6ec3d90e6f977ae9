//! Timeout guards, the policy gate, and drift reconciliation.

use crate::prelude::{Rig, CLOUD_CONFIG};
use chrono::Duration;
use drover_adapters::{CloudCall, InstanceState};
use drover_core::{RequestKind, Talks};

#[tokio::test]
async fn never_connecting_instance_is_shot_and_reconciled_away() {
    let rig = Rig::new(CLOUD_CONFIG);
    rig.submit("acme/widget#42", RequestKind::Merge);

    rig.round().await;
    let talk = rig.talks.get("acme/widget#42").unwrap();
    let instance = talk.ec2.as_ref().unwrap().instance.clone();

    // The instance gets an address but never answers SSH.
    rig.api.set_state(&instance, InstanceState::Running);
    rig.api.set_host(&instance, "10.0.0.7");
    rig.shell.set_reachable(false);
    rig.round().await;
    let talk = rig.talks.get("acme/widget#42").unwrap();
    assert!(talk.shell.is_none());
    assert!(talk.ec2.is_some());

    // Past the shoot limit the guard terminates it; the next round's
    // reconciliation removes the stale record.
    rig.clock.advance(Duration::minutes(45));
    rig.round().await;
    assert_eq!(
        rig.api.get_instance(&instance).unwrap().state,
        InstanceState::Terminated
    );
    rig.round().await;
    let talk = rig.talks.get("acme/widget#42").unwrap();
    assert!(talk.ec2.is_none());
}

#[tokio::test]
async fn hung_build_gets_its_instance_stopped() {
    let rig = Rig::new(CLOUD_CONFIG);
    rig.submit("acme/widget#42", RequestKind::Merge);

    rig.shell.stub("status", 0, "RUNNING\n");
    rig.round().await;
    let talk = rig.talks.get("acme/widget#42").unwrap();
    let instance = talk.ec2.as_ref().unwrap().instance.clone();
    rig.api.set_state(&instance, InstanceState::Running);
    rig.api.set_host(&instance, "10.0.0.7");
    rig.round().await;
    assert!(rig
        .talks
        .get("acme/widget#42")
        .unwrap()
        .daemon
        .unwrap()
        .started
        .is_some());

    // Three hours on, the build still says RUNNING.
    rig.clock.advance(Duration::minutes(200));
    let before = rig.talks.get("acme/widget#42").unwrap();
    rig.round().await;

    let stops = rig
        .api
        .calls()
        .into_iter()
        .filter(|c| matches!(c, CloudCall::Stop { .. }))
        .count();
    assert_eq!(stops, 1);
    // The kill guard itself never edits the document.
    let after = rig.talks.get("acme/widget#42").unwrap();
    assert_eq!(after.daemon, before.daemon);
    assert_eq!(after.ec2, before.ec2);
}

#[tokio::test]
async fn elevated_type_refusal_reaches_the_user_not_the_provider() {
    let rig = Rig::new(CLOUD_CONFIG);
    let mut talk = rig.submit("stranger/widget#7", RequestKind::Merge);
    talk.wire.as_mut().unwrap().repo = "stranger/widget".to_string();
    talk.request
        .as_mut()
        .unwrap()
        .args
        .insert("instance_type".to_string(), "c5.4xlarge".to_string());
    rig.talks.save(&talk).unwrap();

    rig.round().await;

    let talk = rig.talks.get("stranger/widget#7").unwrap();
    assert!(talk.ec2.is_none());
    assert!(talk
        .daemon
        .unwrap()
        .script
        .contains("Refusing to provision"));
    assert!(!rig
        .api
        .calls()
        .iter()
        .any(|c| matches!(c, CloudCall::RunInstance { .. })));
}

#[tokio::test]
async fn fleet_prune_reaps_leaked_instances() {
    let rig = Rig::new(CLOUD_CONFIG);
    rig.submit("acme/widget#42", RequestKind::Merge);
    rig.round().await;
    let talk = rig.talks.get("acme/widget#42").unwrap();
    let instance = talk.ec2.as_ref().unwrap().instance.clone();

    // Nothing else happens for two days; the fleet sweep reaps the
    // instance even though the session still references it.
    rig.clock.advance(Duration::minutes(3000));
    rig.round().await;
    assert_eq!(
        rig.api.get_instance(&instance).unwrap().state,
        InstanceState::Terminated
    );
}

#[tokio::test]
async fn dead_instance_fails_the_build_visibly() {
    let rig = Rig::new(CLOUD_CONFIG);
    rig.submit("acme/widget#42", RequestKind::Merge);

    rig.shell.stub("status", 0, "RUNNING\n");
    rig.round().await;
    let talk = rig.talks.get("acme/widget#42").unwrap();
    let instance = talk.ec2.as_ref().unwrap().instance.clone();
    rig.api.set_state(&instance, InstanceState::Running);
    rig.api.set_host(&instance, "10.0.0.7");
    rig.round().await;

    // The instance stops answering; the liveness check gives up after
    // its bounded retries, force-ends the daemon, and the rest of the
    // chain folds the failure up in the same pass.
    rig.shell.set_reachable(false);
    rig.round().await;

    let talk = rig.talks.get("acme/widget#42").unwrap();
    assert!(talk.daemon.is_none());
    assert_eq!(talk.archive.len(), 1);
    assert_eq!(talk.archive[0].title, "merge #1 failed");
    let deliveries = rig.notifier.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert!(deliveries[0].message.contains("failed"));
}
