// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake notifier for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Notifier, NotifyError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Recorded delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub href: String,
    pub title: String,
    pub message: String,
}

/// Fake notifier that records deliveries
#[derive(Clone, Default)]
pub struct FakeNotifier {
    deliveries: Arc<Mutex<Vec<Delivery>>>,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn deliver(&self, href: &str, title: &str, message: &str) -> Result<(), NotifyError> {
        self.deliveries.lock().push(Delivery {
            href: href.to_string(),
            title: title.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}
