// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Instance-type policy: the two-tier allow-list.
//!
//! Standard types are open to everyone; elevated types only to the
//! configured organizations. Checked before any provisioning call is
//! made — a refusal is a configuration error surfaced into the session
//! document, not an exception.

use crate::config::CloudConfig;
use thiserror::Error;

/// Why a requested type was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("instance type {0} is not on the allow-list")]
    UnknownType(String),
    #[error("instance type {itype} is reserved; organization {org} is not allowed to use it")]
    NotElevatedOrg { org: String, itype: String },
}

/// The evaluated allow-list.
#[derive(Debug, Clone, Default)]
pub struct TypePolicy {
    standard: Vec<String>,
    elevated: Vec<String>,
    elevated_orgs: Vec<String>,
}

impl TypePolicy {
    pub fn new(
        standard: Vec<String>,
        elevated: Vec<String>,
        elevated_orgs: Vec<String>,
    ) -> Self {
        Self {
            standard,
            elevated,
            elevated_orgs,
        }
    }

    /// Check whether `org` may launch an instance of `itype`.
    pub fn permits(&self, org: &str, itype: &str) -> Result<(), PolicyError> {
        if self.standard.iter().any(|t| t == itype) {
            return Ok(());
        }
        if self.elevated.iter().any(|t| t == itype) {
            if self.elevated_orgs.iter().any(|o| o == org) {
                return Ok(());
            }
            return Err(PolicyError::NotElevatedOrg {
                org: org.to_string(),
                itype: itype.to_string(),
            });
        }
        Err(PolicyError::UnknownType(itype.to_string()))
    }
}

impl From<&CloudConfig> for TypePolicy {
    /// The configured default launch type is implicitly standard, so an
    /// empty `[cloud.types]` table still permits the default.
    fn from(cloud: &CloudConfig) -> Self {
        let mut standard = cloud.types.standard.clone();
        if !standard.iter().any(|t| *t == cloud.instance_type) {
            standard.push(cloud.instance_type.clone());
        }
        Self {
            standard,
            elevated: cloud.types.elevated.clone(),
            elevated_orgs: cloud.types.elevated_orgs.clone(),
        }
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
