// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log-only notifier.

use super::{Notifier, NotifyError};
use async_trait::async_trait;

/// Notifier that records deliveries in the log and nothing else.
///
/// Used when no delivery channel is configured; the outcome is still in
/// the session document either way.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn deliver(&self, href: &str, title: &str, message: &str) -> Result<(), NotifyError> {
        tracing::info!(href, title, message, "result delivered to log only");
        Ok(())
    }
}
