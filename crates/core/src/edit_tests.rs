// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::talk::RequestKind;
use chrono::Utc;
use std::collections::BTreeMap;

fn talk() -> Talk {
    Talk::new(1, "acme/widget#42")
}

fn request() -> Request {
    Request {
        id: "r-1".to_string(),
        kind: RequestKind::Merge,
        args: BTreeMap::new(),
        index: None,
        success: None,
    }
}

fn daemon() -> Daemon {
    Daemon {
        id: "d-1".to_string(),
        title: "merge #42".to_string(),
        script: "make".to_string(),
        dir: None,
        started: None,
        ended: None,
        code: None,
        tail: None,
    }
}

fn conn() -> ShellConn {
    ShellConn {
        id: "d-1".to_string(),
        host: "h".to_string(),
        port: 22,
        login: "builder".to_string(),
        key: "/k".to_string(),
    }
}

#[test]
fn wire_is_immutable_once_set() {
    let mut t = talk();
    let wire = Wire {
        repo: "acme/widget".to_string(),
        issue: 1,
        href: "https://x".to_string(),
    };
    Edit::AttachWire(wire.clone()).apply(&mut t).unwrap();
    let err = Edit::AttachWire(wire).apply(&mut t).unwrap_err();
    assert_eq!(err, EditError::WireAlreadySet);
}

#[test]
fn shell_requires_daemon() {
    let mut t = talk();
    let err = Edit::SetShell(conn()).apply(&mut t).unwrap_err();
    assert_eq!(err, EditError::ShellWithoutDaemon);
}

#[test]
fn shell_is_exclusive() {
    let mut t = talk();
    Edit::SetDaemon(daemon()).apply(&mut t).unwrap();
    Edit::SetShell(conn()).apply(&mut t).unwrap();
    let err = Edit::SetShell(conn()).apply(&mut t).unwrap_err();
    assert_eq!(err, EditError::ShellAlreadySet);
}

#[test]
fn instance_requires_daemon_and_no_shell() {
    let mut t = talk();
    let err = Edit::SetInstance {
        id: "i-0abc".to_string(),
    }
    .apply(&mut t)
    .unwrap_err();
    assert_eq!(err, EditError::InstanceWithoutDaemon);

    Edit::SetDaemon(daemon()).apply(&mut t).unwrap();
    Edit::SetShell(conn()).apply(&mut t).unwrap();
    let err = Edit::SetInstance {
        id: "i-0abc".to_string(),
    }
    .apply(&mut t)
    .unwrap_err();
    assert_eq!(err, EditError::InstanceAfterShell);
}

#[test]
fn instance_is_recorded_without_host() {
    let mut t = talk();
    Edit::SetDaemon(daemon()).apply(&mut t).unwrap();
    Edit::SetInstance {
        id: "i-0abc".to_string(),
    }
    .apply(&mut t)
    .unwrap();
    let ec2 = t.ec2.as_ref().unwrap();
    assert_eq!(ec2.instance, "i-0abc");
    assert!(ec2.host.is_none());

    Edit::SetInstanceHost("10.1.2.3".to_string())
        .apply(&mut t)
        .unwrap();
    assert_eq!(t.ec2.as_ref().unwrap().host.as_deref(), Some("10.1.2.3"));
}

#[test]
fn index_is_assigned_once() {
    let mut t = talk();
    Edit::SetRequest(request()).apply(&mut t).unwrap();
    Edit::AssignIndex(5).apply(&mut t).unwrap();
    let err = Edit::AssignIndex(6).apply(&mut t).unwrap_err();
    assert_eq!(err, EditError::IndexAlreadySet(5));
    assert_eq!(t.request.as_ref().unwrap().index, Some(5));
}

#[test]
fn end_daemon_records_outcome() {
    let mut t = talk();
    Edit::SetDaemon(daemon()).apply(&mut t).unwrap();
    let at = Utc::now();
    Edit::MarkDaemonStarted {
        at,
        dir: "/tmp/build-1".to_string(),
    }
    .apply(&mut t)
    .unwrap();
    Edit::EndDaemon {
        at,
        code: 1,
        tail: "host unreachable".to_string(),
    }
    .apply(&mut t)
    .unwrap();

    let d = t.daemon.as_ref().unwrap();
    assert_eq!(d.dir.as_deref(), Some("/tmp/build-1"));
    assert_eq!(d.code, Some(1));
    assert_eq!(d.tail.as_deref(), Some("host unreachable"));
}

#[test]
fn removals_require_presence() {
    let mut t = talk();
    assert_eq!(
        Edit::RemoveShell.apply(&mut t).unwrap_err(),
        EditError::NoShell
    );
    assert_eq!(
        Edit::RemoveDaemon.apply(&mut t).unwrap_err(),
        EditError::NoDaemon
    );
    assert_eq!(
        Edit::RemoveInstance.apply(&mut t).unwrap_err(),
        EditError::NoInstance
    );
    assert_eq!(
        Edit::RemoveRequest.apply(&mut t).unwrap_err(),
        EditError::NoRequest
    );
}

#[test]
fn replace_script_surfaces_failures() {
    let mut t = talk();
    Edit::SetDaemon(daemon()).apply(&mut t).unwrap();
    Edit::ReplaceScript("instance type m5.metal is not allowed".to_string())
        .apply(&mut t)
        .unwrap();
    assert_eq!(
        t.daemon.as_ref().unwrap().script,
        "instance type m5.metal is not allowed"
    );
}
