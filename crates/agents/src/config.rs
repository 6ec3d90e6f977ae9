// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration.
//!
//! One TOML file drives the whole assembly: which shell mode is active
//! (static endpoint vs cloud instances), the launch spec and limits for
//! the cloud mode, the instance-type policy, script templates per
//! request kind, and tick intervals.

use chrono::Duration;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("bad exclude pattern: {0}")]
    Pattern(#[from] regex::Error),
}

fn default_cycle_secs() -> u64 {
    15
}

fn default_sweep_secs() -> u64 {
    60
}

/// Tick intervals and session exclusion.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineSettings {
    /// Seconds between per-talk pipeline runs.
    #[serde(default = "default_cycle_secs")]
    pub cycle_secs: u64,
    /// Seconds between collection-scope sweeps.
    #[serde(default = "default_sweep_secs")]
    pub sweep_secs: u64,
    /// Talks whose name matches this pattern are skipped entirely.
    #[serde(default)]
    pub exclude: Option<String>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            cycle_secs: default_cycle_secs(),
            sweep_secs: default_sweep_secs(),
            exclude: None,
        }
    }
}

fn default_port() -> u16 {
    22
}

/// Statically configured shell endpoint, used when the cloud mode is off.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticShellConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub login: String,
    /// Path to the private key file.
    pub key: String,
}

fn default_shoot_after_mins() -> u64 {
    20
}

fn default_kill_after_mins() -> u64 {
    180
}

fn default_prune_after_mins() -> u64 {
    1440
}

/// Age limits for the cloud guards, in minutes.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloudLimits {
    /// Instance that never connected is terminated after this.
    #[serde(default = "default_shoot_after_mins")]
    pub shoot_after_mins: u64,
    /// Build running longer than this gets its instance stopped.
    #[serde(default = "default_kill_after_mins")]
    pub kill_after_mins: u64,
    /// Fleet sweep terminates anything older than this.
    #[serde(default = "default_prune_after_mins")]
    pub prune_after_mins: u64,
}

impl Default for CloudLimits {
    fn default() -> Self {
        Self {
            shoot_after_mins: default_shoot_after_mins(),
            kill_after_mins: default_kill_after_mins(),
            prune_after_mins: default_prune_after_mins(),
        }
    }
}

impl CloudLimits {
    pub fn shoot_after(&self) -> Duration {
        Duration::minutes(self.shoot_after_mins as i64)
    }

    pub fn kill_after(&self) -> Duration {
        Duration::minutes(self.kill_after_mins as i64)
    }

    pub fn prune_after(&self) -> Duration {
        Duration::minutes(self.prune_after_mins as i64)
    }
}

/// Two-tier instance-type allow-list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypesConfig {
    /// Types anyone may request.
    #[serde(default)]
    pub standard: Vec<String>,
    /// Types reserved for allow-listed organizations.
    #[serde(default)]
    pub elevated: Vec<String>,
    /// Organizations allowed to use elevated types.
    #[serde(default)]
    pub elevated_orgs: Vec<String>,
}

fn default_tag() -> String {
    "drover".to_string()
}

fn default_login() -> String {
    "ubuntu".to_string()
}

/// Cloud mode: launch spec, connection defaults, limits, and policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloudConfig {
    pub image: String,
    /// Default type when a request does not ask for one.
    pub instance_type: String,
    pub security_group: String,
    pub subnet: String,
    /// Management tag key; every launched instance carries `<tag>=yes`.
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_login")]
    pub login: String,
    /// Path to the private key for the launched instances.
    pub key: String,
    #[serde(default)]
    pub limits: CloudLimits,
    #[serde(default)]
    pub types: TypesConfig,
}

/// Built-in script templates; request args are exported as shell
/// variables ahead of the template.
pub const MERGE_SCRIPT: &str = "git fetch --all\n\
     git checkout \"$head_branch\"\n\
     git merge \"$fork_branch\"\n\
     make test\n\
     git push origin \"$head_branch\"\n";

pub const RELEASE_SCRIPT: &str = "git fetch --all\n\
     make test\n\
     git tag \"$tag\"\n\
     git push origin \"$tag\"\n";

pub const DEPLOY_SCRIPT: &str = "git fetch --all\n\
     make test\n\
     make deploy\n";

fn default_scripts() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("merge".to_string(), MERGE_SCRIPT.to_string()),
        ("release".to_string(), RELEASE_SCRIPT.to_string()),
        ("deploy".to_string(), DEPLOY_SCRIPT.to_string()),
    ])
}

/// Top-level daemon configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineSettings,
    #[serde(default)]
    pub shell: Option<StaticShellConfig>,
    #[serde(default)]
    pub cloud: Option<CloudConfig>,
    /// Script template per request kind; defaults are built in.
    #[serde(default = "default_scripts")]
    pub scripts: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pipeline: PipelineSettings::default(),
            shell: None,
            cloud: None,
            scripts: default_scripts(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Compiled name-exclusion pattern, if configured.
    pub fn exclude_pattern(&self) -> Result<Option<Regex>, ConfigError> {
        match self.pipeline.exclude.as_deref() {
            Some(pattern) => Ok(Some(Regex::new(pattern)?)),
            None => Ok(None),
        }
    }

    /// Script template for a request kind.
    pub fn script_for(&self, kind: &str) -> Option<&str> {
        self.scripts.get(kind).map(String::as_str)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
