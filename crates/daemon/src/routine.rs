// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The tick routine.
//!
//! Talks are independent units of state, so their chains run as
//! parallel tasks; the collection-scope sweep makes point-in-time
//! decisions over a provider listing and therefore runs single-flight —
//! a tick that fires while a sweep is still going is skipped, not
//! queued.

use drover_core::{Agent, SuperAgent, Talks};
use drover_storage::TalkStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tracing::{debug, error, info};

/// Periodic driver for the per-talk chain and the sweep.
pub struct Routine {
    talks: TalkStore,
    chain: Arc<dyn Agent>,
    sweep: Arc<dyn SuperAgent>,
    cycle: Duration,
    sweep_every: Duration,
    sweep_gate: Arc<Mutex<()>>,
}

impl Routine {
    pub fn new(
        talks: TalkStore,
        chain: Arc<dyn Agent>,
        sweep: Arc<dyn SuperAgent>,
        cycle: Duration,
        sweep_every: Duration,
    ) -> Self {
        Self {
            talks,
            chain,
            sweep,
            cycle,
            sweep_every,
            sweep_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Run one tick: the full chain over every active talk, talks in
    /// parallel. Returns how many talks were processed.
    pub async fn tick(&self) -> usize {
        let names = match self.talks.active() {
            Ok(names) => names,
            Err(e) => {
                error!(error = %e, "cannot list active talks");
                return 0;
            }
        };
        let mut handles = Vec::with_capacity(names.len());
        for name in names {
            let talks = self.talks.clone();
            let chain = Arc::clone(&self.chain);
            handles.push(tokio::spawn(async move {
                if let Err(e) = Self::process(&talks, chain.as_ref(), &name).await {
                    // The chain already carries the talk name via the
                    // boundary wrapper.
                    error!(error = %e, "talk chain failed");
                }
            }));
        }
        let total = handles.len();
        for handle in handles {
            let _ = handle.await;
        }
        debug!(total, "tick finished");
        total
    }

    async fn process(
        talks: &TalkStore,
        chain: &dyn Agent,
        name: &str,
    ) -> Result<(), drover_core::AgentError> {
        let mut talk = talks.get(name)?;
        let changed = chain.execute(&mut talk).await?;
        if changed {
            talks.save(&talk)?;
        }
        Ok(())
    }

    /// Run the collection-scope sweep, single-flight. Returns false when
    /// a sweep was already in progress and this one was skipped.
    pub async fn run_sweep(&self) -> bool {
        let Ok(_guard) = self.sweep_gate.try_lock() else {
            debug!("sweep already in flight, skipping");
            return false;
        };
        if let Err(e) = self.sweep.execute(&self.talks).await {
            error!(error = %e, "sweep failed");
        }
        true
    }

    /// Tick and sweep on their intervals until `shutdown` is notified.
    pub async fn run(&self, shutdown: Arc<Notify>) {
        info!(
            cycle_secs = self.cycle.as_secs(),
            sweep_secs = self.sweep_every.as_secs(),
            "routine started"
        );
        let mut cycle = tokio::time::interval(self.cycle);
        let mut sweep = tokio::time::interval(self.sweep_every);
        cycle.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        sweep.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = cycle.tick() => {
                    self.tick().await;
                }
                _ = sweep.tick() => {
                    self.run_sweep().await;
                }
                _ = shutdown.notified() => {
                    info!("routine stopping");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "routine_tests.rs"]
mod tests;
