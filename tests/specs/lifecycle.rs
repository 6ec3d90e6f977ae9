//! End-to-end lifecycle: request received → shell acquired → daemon
//! started → result collected → resources released.

use crate::prelude::{Rig, CLOUD_CONFIG};
use drover_adapters::InstanceState;
use drover_core::{RequestKind, Talks};

#[tokio::test]
async fn merge_request_runs_to_deactivation() {
    let rig = Rig::new(CLOUD_CONFIG);
    rig.submit("acme/widget#42", RequestKind::Merge);

    // Round 1: the sweep indexes the request, the chain builds the
    // daemon and provisions an instance.
    rig.shell.stub("status", 0, "RUNNING\n");
    rig.round().await;
    let talk = rig.talks.get("acme/widget#42").unwrap();
    assert_eq!(talk.request.as_ref().unwrap().index, Some(1));
    assert!(talk.daemon.is_some());
    let instance = talk.ec2.as_ref().unwrap().instance.clone();

    // Round 2: the provider finished booting; the chain connects and
    // launches the build in a single pass.
    rig.api.set_state(&instance, InstanceState::Running);
    rig.api.set_host(&instance, "10.0.0.7");
    rig.round().await;
    let talk = rig.talks.get("acme/widget#42").unwrap();
    assert!(talk.shell.is_some());
    assert!(talk.daemon.as_ref().unwrap().started.is_some());

    // Round 3: the build succeeded; collection, archive, report,
    // terminate, and shell release all happen behind one another.
    rig.shell.stub("status", 0, "0\n");
    rig.shell.stub("tail -n", 0, "all green\n");
    rig.round().await;
    let talk = rig.talks.get("acme/widget#42").unwrap();
    assert!(talk.is_finished());
    assert_eq!(talk.archive.len(), 1);
    assert_eq!(talk.archive[0].title, "merge #1 done");
    assert_eq!(
        rig.api.get_instance(&instance).unwrap().state,
        InstanceState::Terminated
    );
    assert_eq!(rig.notifier.deliveries().len(), 1);
    assert!(rig.sink.faults().is_empty());

    // Round 4: the deactivation sweep retires the finished talk.
    rig.round().await;
    assert!(rig.talks.active().unwrap().is_empty());
    assert!(rig.talks.exists("acme/widget#42").unwrap());
}

#[tokio::test]
async fn failed_build_reports_failure() {
    let rig = Rig::new(CLOUD_CONFIG);
    rig.submit("acme/widget#42", RequestKind::Deploy);

    rig.shell.stub("status", 0, "RUNNING\n");
    rig.round().await;
    let talk = rig.talks.get("acme/widget#42").unwrap();
    let instance = talk.ec2.as_ref().unwrap().instance.clone();
    rig.api.set_state(&instance, InstanceState::Running);
    rig.api.set_host(&instance, "10.0.0.7");
    rig.round().await;

    rig.shell.stub("status", 0, "2\n");
    rig.shell.stub("tail -n", 0, "make: *** [deploy] Error 2\n");
    rig.round().await;

    let talk = rig.talks.get("acme/widget#42").unwrap();
    assert_eq!(talk.archive[0].title, "deploy #1 failed");
    let deliveries = rig.notifier.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert!(deliveries[0].message.contains("failed"));
}

#[tokio::test]
async fn indexes_are_strictly_increasing_across_sessions() {
    let rig = Rig::new(CLOUD_CONFIG);
    rig.submit("acme/widget#1", RequestKind::Merge);
    rig.submit("acme/widget#2", RequestKind::Release);
    rig.round().await;

    let mut indexes: Vec<u64> = ["acme/widget#1", "acme/widget#2"]
        .iter()
        .map(|n| rig.talks.get(n).unwrap().request.unwrap().index.unwrap())
        .collect();
    indexes.sort_unstable();
    assert_eq!(indexes, vec![1, 2]);

    // A later session continues the counter, never reuses it.
    rig.submit("acme/widget#3", RequestKind::Merge);
    rig.round().await;
    assert_eq!(
        rig.talks
            .get("acme/widget#3")
            .unwrap()
            .request
            .unwrap()
            .index,
        Some(3)
    );
}
