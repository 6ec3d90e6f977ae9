// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn clear() {
    std::env::remove_var("DROVER_STATE_DIR");
    std::env::remove_var("DROVER_CONFIG");
    std::env::remove_var("XDG_STATE_HOME");
}

#[test]
#[serial]
fn explicit_state_dir_wins() {
    clear();
    std::env::set_var("DROVER_STATE_DIR", "/var/lib/drover");
    assert_eq!(state_dir().unwrap(), PathBuf::from("/var/lib/drover"));
    clear();
}

#[test]
#[serial]
fn xdg_state_home_is_second() {
    clear();
    std::env::set_var("XDG_STATE_HOME", "/xdg/state");
    assert_eq!(state_dir().unwrap(), PathBuf::from("/xdg/state/drover"));
    clear();
}

#[test]
#[serial]
fn home_fallback_is_last() {
    clear();
    std::env::set_var("HOME", "/home/builder");
    assert_eq!(
        state_dir().unwrap(),
        PathBuf::from("/home/builder/.local/state/drover")
    );
    clear();
}

#[test]
#[serial]
fn config_path_defaults_into_the_state_dir() {
    clear();
    std::env::set_var("DROVER_STATE_DIR", "/var/lib/drover");
    assert_eq!(
        config_path().unwrap(),
        PathBuf::from("/var/lib/drover/drover.toml")
    );
    clear();
}

#[test]
#[serial]
fn explicit_config_path_wins() {
    clear();
    std::env::set_var("DROVER_CONFIG", "/etc/drover.toml");
    assert_eq!(config_path().unwrap(), PathBuf::from("/etc/drover.toml"));
    clear();
}
