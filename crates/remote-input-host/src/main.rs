//! Remote input host: entry point.
//!
//! Listens for WebSocket connections from a phone (or any controller) and
//! replays the pointer and keyboard events it sends as real OS input on this
//! machine.
//!
//! # Usage
//!
//! ```text
//! remote-input-host [OPTIONS]
//!
//! Options:
//!   --bind <IP>                  Address to listen on [default: 0.0.0.0]
//!   --port <PORT>                WebSocket port [default: 5001]
//!   --config <PATH>              Optional TOML config file
//!   --pointer-scale <FACTOR>     Multiplier for pointer deltas [default: 1.0]
//!   --invert-scroll              Flip the scroll direction
//!   --typing-interval-ms <MS>    Pause between typed characters [default: 10]
//!   --max-text-chars <CHARS>     Longest text typed from one event [default: 1024]
//!   --close-on-error             Close a session when input injection fails
//!   --max-message-bytes <BYTES>  Largest accepted WebSocket message [default: 65536]
//!   --dry-run                    Record input instead of injecting it
//! ```
//!
//! # Precedence
//!
//! Built-in defaults, then the config file, then CLI flags (or their
//! environment variables).  Boolean flags can only switch a setting on.
//!
//! | Variable              | Flag       |
//! |-----------------------|------------|
//! | `REMOTE_INPUT_BIND`   | `--bind`   |
//! | `REMOTE_INPUT_PORT`   | `--port`   |
//! | `REMOTE_INPUT_CONFIG` | `--config` |
//!
//! `RUST_LOG` overrides the configured log level.

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use remote_input_host::application::PlatformInputEmulator;
use remote_input_host::domain::HostConfig;
use remote_input_host::infrastructure::config_file::{load_config, validate};
use remote_input_host::infrastructure::input_emulation::{EnigoEmulator, RecordingEmulator};
use remote_input_host::infrastructure::{run_server, InputWorker};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Replays pointer and keyboard events from a remote controller as local input.
#[derive(Debug, Default, Parser)]
#[command(
    name = "remote-input-host",
    about = "Turns a phone into a touchpad and keyboard for this machine",
    version
)]
struct Cli {
    /// IP address to listen on.
    ///
    /// `0.0.0.0` accepts controllers on the LAN; `127.0.0.1` only local ones.
    #[arg(long, env = "REMOTE_INPUT_BIND")]
    bind: Option<IpAddr>,

    /// WebSocket port.
    #[arg(long, env = "REMOTE_INPUT_PORT")]
    port: Option<u16>,

    /// TOML config file applied before the other flags.
    #[arg(long, env = "REMOTE_INPUT_CONFIG")]
    config: Option<PathBuf>,

    /// Multiplier applied to pointer deltas.
    #[arg(long)]
    pointer_scale: Option<f64>,

    /// Flip the scroll direction.
    #[arg(long)]
    invert_scroll: bool,

    /// Pause between typed characters in milliseconds; 0 types in one call.
    #[arg(long)]
    typing_interval_ms: Option<u64>,

    /// Longest text typed from one event; longer text is skipped.
    #[arg(long)]
    max_text_chars: Option<usize>,

    /// Close a controller session when input injection fails.
    #[arg(long)]
    close_on_error: bool,

    /// Largest accepted WebSocket message in bytes.
    #[arg(long)]
    max_message_bytes: Option<usize>,

    /// Record input instead of injecting it (no display needed).
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Builds the [`HostConfig`]: defaults, then `--config`, then flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the final
    /// values are out of range.
    fn into_host_config(self) -> anyhow::Result<HostConfig> {
        let mut config = HostConfig::default();

        if let Some(path) = &self.config {
            let file = load_config(path)
                .with_context(|| format!("failed to load config file {}", path.display()))?;
            file.apply_to(&mut config)?;
        }

        if let Some(ip) = self.bind {
            config.bind_addr.set_ip(ip);
        }
        if let Some(port) = self.port {
            config.bind_addr.set_port(port);
        }
        if let Some(scale) = self.pointer_scale {
            config.dispatch.pointer_scale = scale;
        }
        if let Some(ms) = self.typing_interval_ms {
            config.typing_interval = Duration::from_millis(ms);
        }
        if let Some(max) = self.max_text_chars {
            config.dispatch.max_text_chars = max;
        }
        if let Some(max) = self.max_message_bytes {
            config.max_message_bytes = max;
        }
        config.dispatch.invert_scroll |= self.invert_scroll;
        config.close_on_error |= self.close_on_error;
        config.dry_run |= self.dry_run;

        validate(&config)?;
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_host_config()?;

    // `RUST_LOG` wins; otherwise use the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!(
        "remote input host starting: bind={}, close_on_error={}, dry_run={}",
        config.bind_addr, config.close_on_error, config.dry_run
    );

    let worker = spawn_worker(&config)?;

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => tracing::error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    run_server(config, worker, running).await?;

    info!("remote input host stopped");
    Ok(())
}

/// Starts the input thread with the real emulator, or a recorder for
/// `--dry-run`.
fn spawn_worker(config: &HostConfig) -> anyhow::Result<InputWorker> {
    let typing_interval = config.typing_interval;
    let worker = if config.dry_run {
        warn!("dry run: input is logged at debug level and never injected");
        InputWorker::spawn(
            || Ok(Box::new(RecordingEmulator::new()) as Box<dyn PlatformInputEmulator>),
            config.dispatch,
        )
    } else {
        InputWorker::spawn(
            move || {
                EnigoEmulator::new(typing_interval)
                    .map(|e| Box::new(e) as Box<dyn PlatformInputEmulator>)
            },
            config.dispatch,
        )
    };
    worker.context("failed to start the input backend (is a desktop session available? try --dry-run)")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
