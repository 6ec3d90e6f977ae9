// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Talk builders shared by the agent tests.

use chrono::{TimeZone, Utc};
use drover_core::{Daemon, Ec2, FakeClock, Request, RequestKind, ShellConn, Talk, Wire};
use std::collections::BTreeMap;
use std::sync::Arc;

pub(crate) fn talk() -> Talk {
    Talk::new(1, "acme/widget#42")
}

pub(crate) fn clock() -> Arc<FakeClock> {
    Arc::new(FakeClock::at(
        Utc.with_ymd_and_hms(2026, 8, 5, 12, 0, 0).single().unwrap_or_else(Utc::now),
    ))
}

pub(crate) fn with_wire(talk: &mut Talk) {
    talk.wire = Some(Wire {
        repo: "acme/widget".to_string(),
        issue: 42,
        href: "https://ci.example.com/talks/42".to_string(),
    });
}

pub(crate) fn with_request(talk: &mut Talk, index: Option<u64>) {
    talk.request = Some(Request {
        id: "r-1".to_string(),
        kind: RequestKind::Merge,
        args: BTreeMap::new(),
        index,
        success: None,
    });
}

pub(crate) fn with_daemon(talk: &mut Talk, started: bool) {
    let mut daemon = Daemon {
        id: "d-1".to_string(),
        title: "merge #1".to_string(),
        script: "make test".to_string(),
        dir: None,
        started: None,
        ended: None,
        code: None,
        tail: None,
    };
    if started {
        daemon.started = Some(Utc.with_ymd_and_hms(2026, 8, 5, 11, 0, 0).single().unwrap_or_else(Utc::now));
        daemon.dir = Some("/tmp/drover-d-1".to_string());
    }
    talk.daemon = Some(daemon);
}

pub(crate) fn with_shell(talk: &mut Talk) {
    talk.shell = Some(ShellConn {
        id: "d-1".to_string(),
        host: "10.0.0.7".to_string(),
        port: 22,
        login: "builder".to_string(),
        key: "/etc/drover/id_rsa".to_string(),
    });
}

pub(crate) fn with_ec2(talk: &mut Talk, host: Option<&str>) {
    talk.ec2 = Some(Ec2 {
        instance: "i-0abc".to_string(),
        host: host.map(str::to_string),
    });
}
