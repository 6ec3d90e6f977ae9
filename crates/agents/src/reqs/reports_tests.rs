// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support;
use drover_adapters::FakeNotifier;
use drover_core::{Agent, LogEntry};

fn reported_talk(success: bool) -> drover_core::Talk {
    let mut talk = test_support::talk();
    test_support::with_wire(&mut talk);
    test_support::with_request(&mut talk, Some(5));
    if let Some(request) = talk.request.as_mut() {
        request.success = Some(success);
    }
    talk
}

#[tokio::test]
async fn delivered_outcome_closes_the_request() {
    let notifier = FakeNotifier::new();
    let agent = Reports::new(notifier.clone());
    let mut talk = reported_talk(true);

    assert!(agent.execute(&mut talk).await.unwrap());
    assert!(talk.request.is_none());

    let deliveries = notifier.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].href, "https://ci.example.com/talks/42");
    assert_eq!(deliveries[0].title, "merge #5");
    assert!(deliveries[0].message.contains("succeeded"));
}

#[tokio::test]
async fn failed_outcome_quotes_the_archive_title() {
    let notifier = FakeNotifier::new();
    let agent = Reports::new(notifier.clone());
    let mut talk = reported_talk(false);
    talk.archive.push(LogEntry {
        id: "r-1".to_string(),
        title: "merge #5 failed".to_string(),
        index: 5,
    });

    agent.execute(&mut talk).await.unwrap();
    let deliveries = notifier.deliveries();
    assert!(deliveries[0].message.contains("merge #5 failed"));
}

#[tokio::test]
async fn unfinished_request_is_a_noop() {
    let notifier = FakeNotifier::new();
    let agent = Reports::new(notifier.clone());
    let mut talk = test_support::talk();
    test_support::with_wire(&mut talk);
    test_support::with_request(&mut talk, Some(5));
    let before = talk.clone();

    assert!(!agent.execute(&mut talk).await.unwrap());
    assert_eq!(talk, before);
    assert!(notifier.deliveries().is_empty());
}

#[tokio::test]
async fn missing_wire_is_a_noop() {
    let notifier = FakeNotifier::new();
    let agent = Reports::new(notifier.clone());
    let mut talk = reported_talk(true);
    talk.wire = None;
    let before = talk.clone();

    assert!(!agent.execute(&mut talk).await.unwrap());
    assert_eq!(talk, before);
    assert!(notifier.deliveries().is_empty());
}
