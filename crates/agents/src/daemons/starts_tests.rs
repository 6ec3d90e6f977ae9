// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support;
use drover_adapters::FakeShell;

fn ready_talk() -> Talk {
    let mut talk = test_support::talk();
    test_support::with_daemon(&mut talk, false);
    test_support::with_shell(&mut talk);
    talk
}

#[tokio::test]
async fn launch_marks_the_daemon_started() {
    let shell = FakeShell::new();
    let agent = StartsDaemon::new(shell.clone(), test_support::clock());
    let mut talk = ready_talk();

    assert!(agent.execute(&mut talk).await.unwrap());
    let daemon = talk.daemon.unwrap();
    assert!(daemon.started.is_some());
    assert_eq!(daemon.dir.as_deref(), Some("/tmp/drover-d-1"));
    assert!(daemon.ended.is_none());

    let calls = shell.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].cmd.contains("run.sh"));
    assert!(calls[0].cmd.contains("nohup"));
    assert!(calls[0].cmd.contains("make test"));
}

#[tokio::test]
async fn failed_launch_ends_the_daemon_visibly() {
    let shell = FakeShell::new();
    shell.stub("run.sh", 1, "disk full");
    let agent = StartsDaemon::new(shell, test_support::clock());
    let mut talk = ready_talk();

    agent.execute(&mut talk).await.unwrap();
    let daemon = talk.daemon.unwrap();
    assert!(daemon.started.is_some());
    assert_eq!(daemon.code, Some(128));
    assert_eq!(daemon.tail.as_deref(), Some("disk full"));
}

#[tokio::test]
async fn unreachable_shell_ends_the_daemon_visibly() {
    let shell = FakeShell::new();
    shell.set_reachable(false);
    let agent = StartsDaemon::new(shell, test_support::clock());
    let mut talk = ready_talk();

    agent.execute(&mut talk).await.unwrap();
    let daemon = talk.daemon.unwrap();
    assert_eq!(daemon.code, Some(128));
    assert!(daemon.tail.unwrap().contains("unreachable"));
}

#[tokio::test]
async fn noop_without_shell() {
    let shell = FakeShell::new();
    let agent = StartsDaemon::new(shell.clone(), test_support::clock());
    let mut talk = test_support::talk();
    test_support::with_daemon(&mut talk, false);
    let before = talk.clone();

    assert!(!agent.execute(&mut talk).await.unwrap());
    assert_eq!(talk, before);
    assert!(shell.calls().is_empty());
}

#[tokio::test]
async fn started_daemon_is_not_relaunched() {
    let shell = FakeShell::new();
    let agent = StartsDaemon::new(shell.clone(), test_support::clock());
    let mut talk = ready_talk();
    if let Some(daemon) = talk.daemon.as_mut() {
        daemon.started = Some(chrono::Utc::now());
    }
    let before = talk.clone();

    assert!(!agent.execute(&mut talk).await.unwrap());
    assert_eq!(talk, before);
    assert!(shell.calls().is_empty());
}
