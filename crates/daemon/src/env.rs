// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from environment resolution.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("no state directory: set DROVER_STATE_DIR or HOME")]
    NoStateDir,
}

/// Resolve state directory: DROVER_STATE_DIR > XDG_STATE_HOME/drover >
/// ~/.local/state/drover
pub fn state_dir() -> Result<PathBuf, EnvError> {
    if let Ok(dir) = std::env::var("DROVER_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("drover"));
    }
    let home = std::env::var("HOME").map_err(|_| EnvError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/drover"))
}

/// Resolve the config file path: DROVER_CONFIG > <state_dir>/drover.toml
pub fn config_path() -> Result<PathBuf, EnvError> {
    if let Ok(path) = std::env::var("DROVER_CONFIG") {
        return Ok(PathBuf::from(path));
    }
    Ok(state_dir()?.join("drover.toml"))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
