// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use drover_core::ShellConn;

// Network-free check: connecting to a reserved address must come back as
// a failed outcome or a connect error, never a hang (ConnectTimeout).
#[tokio::test]
async fn unreachable_endpoint_does_not_succeed() {
    let conn = ShellConn {
        id: "d-1".to_string(),
        host: "192.0.2.1".to_string(),
        port: 22,
        login: "builder".to_string(),
        key: "/nonexistent-key".to_string(),
    };
    let shell = SshShell::new();
    match shell.exec(&conn, "pwd").await {
        Ok(outcome) => assert!(!outcome.success()),
        Err(ShellError::Connect(_)) | Err(ShellError::Exec(_)) => {}
    }
}
