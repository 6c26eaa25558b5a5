#![forbid(unsafe_code)]

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use portal_kernel_contracts::MonotonicTimeNs;
use portal_os::config::PortalConfig;
use portal_storage::demo_seed::demo_store;
use portal_tools::portal_cli::{execute_portal_command, Cli};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let config = PortalConfig::from_env().map_err(|e| format!("invalid configuration: {e}"))?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1);
    let store = demo_store(MonotonicTimeNs(now)).map_err(|e| format!("failed to seed store: {e}"))?;
    debug!(command = ?cli.command, "running portal command");
    let output = execute_portal_command(store, &config, &cli.command)?;
    let text = if cli.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

fn init_logging() {
    let filter = env::var("PORTAL_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
