// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result notification adapters.
//!
//! The pipeline's only obligation is to hand the outcome to the wire
//! callback; what happens on the other side (comments, mail, chat) is
//! not its concern. Delivery is fire-and-forget.

mod log;

pub use log::LogNotifier;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{Delivery, FakeNotifier};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from notification delivery
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Adapter for delivering session results toward the wire callback
#[async_trait]
pub trait Notifier: Clone + Send + Sync + 'static {
    /// Deliver a result message for the given callback URL
    async fn deliver(&self, href: &str, title: &str, message: &str) -> Result<(), NotifyError>;
}
