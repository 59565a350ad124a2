//! `wristlink-cli` – two-device orientation streaming demo, in one process.
//!
//! Wires the full pipeline over an in-process loopback link:
//!
//! 1. Loads (or creates) `~/.wristlink/config.toml`, with `WRISTLINK_*`
//!    environment overrides.
//! 2. Builds a simulated wrist (sinusoidal sweep) driving the [`Sampler`] on
//!    one link end.
//! 3. Runs the [`Receiver`] on the other end, smoothing into a console
//!    renderer.
//! 4. Streams until **Ctrl-C**, then stops the sampler and reports the final
//!    smoothed pose.

mod config;
mod console;

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use tracing::{info, warn};

use wristlink_receiver::Receiver;
use wristlink_sampler::{Sampler, SimMotion};
use wristlink_transport::{LoopbackLink, TransportLink};

#[tokio::main]
async fn main() {
    // ── Structured logging ────────────────────────────────────────────────
    // Initialise tracing-subscriber using RUST_LOG (defaults to "info").
    // Set WRISTLINK_LOG_FORMAT=json to emit newline-delimited JSON logs.
    // The demo's user-facing output still uses println! for UX consistency.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("WRISTLINK_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    print_banner();

    // ── Configuration ─────────────────────────────────────────────────────
    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            let cfg = config::Config::default();
            match config::save(&cfg) {
                Ok(()) => println!(
                    "  Wrote default config to {}",
                    config::config_path().display().to_string().bold()
                ),
                Err(e) => warn!(error = %e, "could not persist default config"),
            }
            cfg
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            config::Config::default()
        }
    };
    println!(
        "  rate {} Hz · α {} · axis map {}",
        cfg.sample_rate_hz.to_string().bold(),
        cfg.alpha.to_string().bold(),
        cfg.axis_map.to_string().bold()
    );
    println!();

    // ── Pipeline wiring ───────────────────────────────────────────────────
    let (watch_end, phone_end) = LoopbackLink::pair_default();
    let inbox = phone_end.subscribe();

    let renderer = console::ConsoleRenderer::new(Duration::from_millis(250));
    let receiver = Receiver::new(Box::new(renderer))
        .with_alpha(cfg.alpha)
        .with_axis_map(cfg.axis_map.to_axis_map());
    receiver.on_connectivity_ready(&phone_end).await;
    let receiver_task = tokio::spawn(receiver.run(inbox));

    let mut sampler = Sampler::new(Arc::new(SimMotion::wave()), Arc::new(watch_end));
    if let Err(e) = sampler.configure(cfg.sample_rate_hz) {
        warn!(error = %e, "invalid sample rate in config; using default");
    }
    match sampler.start().await {
        Ok(()) => info!(rate_hz = cfg.sample_rate_hz, "sampler running"),
        Err(e) => {
            println!("{}: {}", "Cannot start sampler".red(), e);
            return;
        }
    }

    println!("{}", "  Streaming wrist attitude – Ctrl-C to stop.".green());

    // ── Run until Ctrl-C ──────────────────────────────────────────────────
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to wait for Ctrl-C");
    }
    println!();
    println!("{}", "  Stopping sampler …".yellow());
    sampler.stop();

    // Dropping both link ends closes the inbox; the receiver drains what is
    // buffered and returns its final state.
    drop(sampler);
    drop(phone_end);

    match receiver_task.await {
        Ok(receiver) => {
            let (roll, pitch, yaw) = receiver.smoothed();
            println!(
                "  Final smoothed pose: roll {:+.3}  pitch {:+.3}  yaw {:+.3}",
                roll, pitch, yaw
            );
        }
        Err(e) => warn!(error = %e, "receiver task failed"),
    }
    println!("{}", "  Bye.".green());
}

fn print_banner() {
    println!();
    println!("{}", "  WristLink".cyan().bold());
    println!("{}", "  wrist attitude → lossy link → smoothed 3D hand".dimmed());
    println!();
}
