// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline assembly: wiring the rules into the two fixed chains.
//!
//! Transition order is decided here, once, at startup — not discovered
//! at runtime. Agents that talk to the outside world are individually
//! contained so one fault cannot block the chain; the slow spots carry
//! duration monitoring; the whole per-talk chain is name-filtered and
//! context-enriched at the boundary.

use crate::cloud::{
    ConnectSettings, ConnectsInstance, DescribesInstance, DetachesInstance, DropsInstance,
    KillsInstance, PingsInstance, PrunesInstances, ShootsInstance, StartsInstance,
    TerminatesInstance,
};
use crate::combinators::{Chain, Contained, Disabled, ExceptNamed, SweepChain, Timed, Verbose};
use crate::config::{Config, ConfigError};
use crate::daemons::{ArchivesDaemon, EndsDaemon, StartsDaemon};
use crate::deactivates::DeactivatesTalks;
use crate::indexes::IndexesRequests;
use crate::policy::TypePolicy;
use crate::reqs::{EndsRequest, Reports, StartsRequest};
use crate::shells::{RegistersShell, RemovesShell};
use drover_adapters::{CloudProvider, LaunchSpec, Notifier, RemoteShell};
use drover_core::{Agent, Clock, FaultSink, SuperAgent};
use std::sync::Arc;

fn contained(inner: Box<dyn Agent>, sink: &Arc<dyn FaultSink>) -> Box<dyn Agent> {
    Box::new(Contained::new(inner, Arc::clone(sink)))
}

/// Assemble the fixed per-talk chain.
pub fn talk_agents<C, S, N>(
    config: &Config,
    api: C,
    shell: S,
    notifier: N,
    sink: Arc<dyn FaultSink>,
    clock: Arc<dyn Clock>,
) -> Result<Box<dyn Agent>, ConfigError>
where
    C: CloudProvider,
    S: RemoteShell,
    N: Notifier,
{
    let mut agents: Vec<Box<dyn Agent>> = Vec::new();

    agents.push(Box::new(StartsRequest::new(config.scripts.clone())));

    if let Some(cloud) = &config.cloud {
        let spec = LaunchSpec {
            image: cloud.image.clone(),
            instance_type: cloud.instance_type.clone(),
            security_group: cloud.security_group.clone(),
            subnet: cloud.subnet.clone(),
        };
        let settings = ConnectSettings {
            port: cloud.port,
            login: cloud.login.clone(),
            key: cloud.key.clone(),
        };
        agents.push(contained(
            Box::new(StartsInstance::new(
                api.clone(),
                spec,
                TypePolicy::from(cloud),
                cloud.tag.clone(),
            )),
            &sink,
        ));
        agents.push(contained(
            Box::new(DescribesInstance::new(api.clone())),
            &sink,
        ));
        agents.push(contained(
            Box::new(ConnectsInstance::new(
                api.clone(),
                shell.clone(),
                settings,
                Arc::clone(&clock),
            )),
            &sink,
        ));
        agents.push(contained(
            Box::new(PingsInstance::new(shell.clone(), Arc::clone(&clock))),
            &sink,
        ));
    }

    if let Some(endpoint) = &config.shell {
        // The static endpoint yields to the cloud pipeline when both are
        // configured.
        agents.push(Box::new(Disabled::new(
            Box::new(RegistersShell::new(endpoint.clone())),
            config.cloud.is_some(),
        )));
    }

    agents.push(contained(
        Box::new(Timed::new(Box::new(StartsDaemon::new(
            shell.clone(),
            Arc::clone(&clock),
        )))),
        &sink,
    ));

    if let Some(cloud) = &config.cloud {
        agents.push(contained(
            Box::new(KillsInstance::new(
                api.clone(),
                cloud.limits.kill_after(),
                Arc::clone(&clock),
            )),
            &sink,
        ));
    }

    agents.push(contained(
        Box::new(Timed::new(Box::new(EndsDaemon::new(
            shell.clone(),
            Arc::clone(&clock),
        )))),
        &sink,
    ));
    agents.push(Box::new(EndsRequest::new()));
    agents.push(Box::new(ArchivesDaemon::new()));
    agents.push(contained(Box::new(Reports::new(notifier)), &sink));

    if let Some(cloud) = &config.cloud {
        agents.push(contained(
            Box::new(TerminatesInstance::new(api.clone())),
            &sink,
        ));
        agents.push(contained(
            Box::new(ShootsInstance::new(
                api.clone(),
                cloud.limits.shoot_after(),
                Arc::clone(&clock),
            )),
            &sink,
        ));
        agents.push(contained(Box::new(DetachesInstance::new(api.clone())), &sink));
        agents.push(contained(Box::new(DropsInstance::new(api.clone())), &sink));
    }

    agents.push(Box::new(RemovesShell::new()));

    let mut chain: Box<dyn Agent> = Box::new(Chain::new(agents));
    if let Some(pattern) = config.exclude_pattern()? {
        chain = Box::new(ExceptNamed::new(chain, pattern));
    }
    Ok(Box::new(Verbose::new(chain)))
}

/// Assemble the collection-scope sweep.
pub fn sweep_agents<C>(config: &Config, api: C, clock: Arc<dyn Clock>) -> Box<dyn SuperAgent>
where
    C: CloudProvider,
{
    let mut sweeps: Vec<Box<dyn SuperAgent>> = Vec::new();
    sweeps.push(Box::new(IndexesRequests::new()));
    if let Some(cloud) = &config.cloud {
        sweeps.push(Box::new(PrunesInstances::new(
            api,
            cloud.tag.clone(),
            cloud.limits.prune_after(),
            clock,
        )));
    }
    sweeps.push(Box::new(DeactivatesTalks::new()));
    Box::new(SweepChain::new(sweeps))
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
