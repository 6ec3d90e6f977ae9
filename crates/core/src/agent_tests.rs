// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::edit::Edit;
use crate::talk::{Daemon, Talk};
use async_trait::async_trait;

/// Agent that marks the daemon script; gated on a daemon being present.
struct Stamper;

#[async_trait]
impl Agent for Stamper {
    fn name(&self) -> &str {
        "stamper"
    }

    fn requires(&self) -> &[Assertion] {
        const REQUIRES: &[Assertion] = &[Assertion::Exists("daemon")];
        REQUIRES
    }

    async fn process(&self, _talk: &Talk) -> Result<Vec<Edit>, AgentError> {
        Ok(vec![Edit::ReplaceScript("stamped".to_string())])
    }
}

fn daemon() -> Daemon {
    Daemon {
        id: "d-1".to_string(),
        title: "t".to_string(),
        script: "make".to_string(),
        dir: None,
        started: None,
        ended: None,
        code: None,
        tail: None,
    }
}

#[tokio::test]
async fn unsatisfied_precondition_is_a_noop() {
    let mut talk = Talk::new(1, "acme/widget#1");
    let before = talk.clone();
    let changed = Stamper.execute(&mut talk).await.unwrap();
    assert!(!changed);
    assert_eq!(talk, before);
}

#[tokio::test]
async fn satisfied_precondition_applies_the_script() {
    let mut talk = Talk::new(1, "acme/widget#1");
    talk.modify(vec![Edit::SetDaemon(daemon())]).unwrap();
    let changed = Stamper.execute(&mut talk).await.unwrap();
    assert!(changed);
    assert_eq!(talk.daemon.as_ref().unwrap().script, "stamped");
}

#[tokio::test]
async fn empty_script_reports_no_change() {
    struct Idle;

    #[async_trait]
    impl Agent for Idle {
        fn name(&self) -> &str {
            "idle"
        }
        fn requires(&self) -> &[Assertion] {
            &[]
        }
        async fn process(&self, _talk: &Talk) -> Result<Vec<Edit>, AgentError> {
            Ok(Vec::new())
        }
    }

    let mut talk = Talk::new(1, "acme/widget#1");
    let before = talk.clone();
    assert!(!Idle.execute(&mut talk).await.unwrap());
    assert_eq!(talk, before);
}

#[test]
fn in_talk_wraps_the_source() {
    let err = AgentError::external("boom").in_talk("acme/widget#1");
    assert_eq!(err.to_string(), "talk acme/widget#1: boom");
}
