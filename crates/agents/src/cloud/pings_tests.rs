// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support;
use drover_adapters::FakeShell;
use std::time::Duration;

fn agent(shell: FakeShell) -> PingsInstance<FakeShell> {
    PingsInstance::new(shell, test_support::clock()).with_pause(Duration::ZERO)
}

fn monitored_talk(started: bool) -> drover_core::Talk {
    let mut talk = test_support::talk();
    test_support::with_daemon(&mut talk, started);
    test_support::with_shell(&mut talk);
    talk
}

#[tokio::test]
async fn healthy_instance_is_a_single_probe() {
    let shell = FakeShell::new();
    let mut talk = monitored_talk(true);
    let before = talk.clone();

    assert!(!agent(shell.clone()).execute(&mut talk).await.unwrap());
    assert_eq!(talk, before);
    assert_eq!(shell.calls().len(), 1);
}

#[tokio::test]
async fn three_failures_end_a_started_daemon() {
    let shell = FakeShell::new();
    shell.set_reachable(false);
    let mut talk = monitored_talk(true);

    assert!(agent(shell.clone()).execute(&mut talk).await.unwrap());
    let daemon = talk.daemon.unwrap();
    assert!(daemon.ended.is_some());
    assert_eq!(daemon.code, Some(1));
    assert!(daemon.tail.unwrap().contains("stopped answering"));
    assert_eq!(shell.calls().len(), 3);
}

#[tokio::test]
async fn never_started_daemon_is_removed_instead() {
    let shell = FakeShell::new();
    shell.set_reachable(false);
    let mut talk = monitored_talk(false);

    assert!(agent(shell).execute(&mut talk).await.unwrap());
    assert!(talk.daemon.is_none());
}

#[tokio::test]
async fn noop_without_shell() {
    let shell = FakeShell::new();
    let mut talk = test_support::talk();
    test_support::with_daemon(&mut talk, true);
    let before = talk.clone();

    assert!(!agent(shell.clone()).execute(&mut talk).await.unwrap());
    assert_eq!(talk, before);
    assert!(shell.calls().is_empty());
}

#[tokio::test]
async fn noop_without_daemon() {
    let shell = FakeShell::new();
    let mut talk = test_support::talk();
    test_support::with_daemon(&mut talk, false);
    test_support::with_shell(&mut talk);
    talk.daemon = None;
    let before = talk.clone();

    assert!(!agent(shell.clone()).execute(&mut talk).await.unwrap());
    assert_eq!(talk, before);
    assert!(shell.calls().is_empty());
}
