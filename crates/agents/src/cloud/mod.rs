// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cloud-instance lifecycle agents.
//!
//! Together these implement provisioning, health-checking, and
//! decommissioning of the remote compute instance a build runs on.
//! The state machine is inferred from document shape, not an explicit
//! enum: no `ec2` → absent; `ec2` without host → provisioning; host
//! without shell → booting; shell registered → connected/monitored;
//! `ec2` removed → terminated. Every agent re-derives truth from the
//! provider and the document on every tick — nothing is cached, which
//! is what tolerates crashes, eventual consistency, and partial
//! failures.

mod connects;
mod describes;
mod detaches;
mod drops;
mod kills;
mod pings;
mod prunes;
mod shoots;
mod starts;
mod terminates;

pub use connects::{ConnectSettings, ConnectsInstance};
pub use describes::DescribesInstance;
pub use detaches::DetachesInstance;
pub use drops::DropsInstance;
pub use kills::KillsInstance;
pub use pings::PingsInstance;
pub use prunes::PrunesInstances;
pub use shoots::ShootsInstance;
pub use starts::StartsInstance;
pub use terminates::TerminatesInstance;
