/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use chronosync_core::{TimetableCompiler, TimetableRequest};
use chronosync_server::{build_router, AppState, ServerConfig};

// ── CLI argument definition ───────────────────────────────────────────────────

/// ChronoSync timetable grid compiler.
///
/// Example:
///   chronosync --config chronosync.yaml --port 8000
///   chronosync --input request.json --pretty
#[derive(Debug, Parser)]
#[command(
    name = "chronosync",
    about = "ChronoSync timetable grid compiler – HTTP server and offline CLI",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML server configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Listen address (overrides the configuration file).
    #[arg(long = "host")]
    host: Option<String>,

    /// Listen port (overrides the configuration file).
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,

    /// Compile this request JSON file, print the response and exit.
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Pretty-print the JSON printed by --input.
    #[arg(long = "pretty", default_value_t = false)]
    pretty: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    // Logs go to stderr so --input output on stdout stays clean JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            process::exit(1);
        }
    };

    let result = match &cli.input {
        Some(path) => compile_file(path, &config, cli.pretty),
        None => serve(config).await,
    };
    if let Err(e) = result {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<ServerConfig> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::load_from_file(path)?,
        None => {
            warn!("No configuration file provided, using default settings");
            ServerConfig::default()
        }
    };
    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    config.validate()?;
    Ok(config)
}

// ── Offline mode ──────────────────────────────────────────────────────────────

fn compile_file(path: &Path, config: &ServerConfig, pretty: bool) -> Result<()> {
    info!("Compiling request from: {}", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot open request file: {}", path.display()))?;
    let request: TimetableRequest = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse request JSON: {}", path.display()))?;

    let compiler = TimetableCompiler::new(config.compiler.clone());
    let response = compiler
        .compile_request(request)
        .with_context(|| format!("Compilation failed for {}", path.display()))?;

    let json = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{json}");
    Ok(())
}

// ── Server mode ───────────────────────────────────────────────────────────────

async fn serve(config: ServerConfig) -> Result<()> {
    let addr = config.bind_addr();
    info!(
        addr = %addr,
        origins = ?config.allowed_origins,
        max_body_bytes = config.max_body_bytes,
        max_total_slots = config.compiler.max_total_slots,
        "ChronoSync starting up"
    );

    let app = build_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Cannot bind {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("ChronoSync stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
