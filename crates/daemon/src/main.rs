// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drover Daemon (droverd)
//!
//! Background process that drives build sessions through their
//! lifecycle: per-talk agent chains on one interval, collection-scope
//! sweeps on another, until signalled to stop.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::sync::Arc;
use std::time::Duration;

use drover_adapters::{AwsCliProvider, LogFaultSink, LogNotifier, SshShell};
use drover_agents::{sweep_agents, talk_agents, Config};
use drover_core::{Clock, FaultSink, SystemClock};
use drover_daemon::env;
use drover_daemon::Routine;
use drover_storage::TalkStore;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("droverd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("droverd {}", env!("CARGO_PKG_VERSION"));
                println!("Drover Daemon - drives build sessions through their lifecycle");
                println!();
                println!("USAGE:");
                println!("    droverd");
                println!();
                println!("Configuration is read from $DROVER_CONFIG (default");
                println!("$DROVER_STATE_DIR/drover.toml); session documents live under");
                println!("$DROVER_STATE_DIR/talks.");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: droverd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let state_dir = env::state_dir()?;
    std::fs::create_dir_all(&state_dir)?;

    let file_appender = tracing_appender::rolling::daily(state_dir.join("logs"), "droverd.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let config_path = env::config_path()?;
    let config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        warn!(path = %config_path.display(), "no config file, using defaults");
        Config::default()
    };

    let talks = TalkStore::open(state_dir.join("talks"))?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let sink: Arc<dyn FaultSink> = Arc::new(LogFaultSink::new());

    let chain = talk_agents(
        &config,
        AwsCliProvider::new(),
        SshShell::new(),
        LogNotifier::new(),
        sink,
        Arc::clone(&clock),
    )?;
    let sweep = sweep_agents(&config, AwsCliProvider::new(), clock);

    let routine = Routine::new(
        talks,
        Arc::from(chain),
        Arc::from(sweep),
        Duration::from_secs(config.pipeline.cycle_secs),
        Duration::from_secs(config.pipeline.sweep_secs),
    );

    info!(state_dir = %state_dir.display(), "droverd starting");

    let shutdown = Arc::new(Notify::new());
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    {
        let shutdown = Arc::clone(&shutdown);
        tokio::spawn(async move {
            tokio::select! {
                _ = sigterm.recv() => {}
                _ = sigint.recv() => {}
            }
            shutdown.notify_one();
        });
    }

    routine.run(shutdown).await;
    info!("droverd stopped");
    Ok(())
}
