//! Autoplaza server entry point
//!
//! ```text
//! autoplaza [--env dev|prod] [--port 8080]
//! ```
//!
//! Loads `config/<env>.yaml`, installs logging, opens the document store and
//! serves the HTTP gateway until the process is stopped.

use std::sync::Arc;

use anyhow::Context;
use autoplaza::config::AppConfig;
use autoplaza::gateway::{self, state::AppState};
use autoplaza::logging::init_logging;
use autoplaza::store::MemoryStore;

fn flag_value(name: &str) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1).cloned())
}

fn get_env() -> String {
    flag_value("--env")
        .or_else(|| flag_value("-e"))
        .unwrap_or_else(|| "dev".to_string())
}

fn get_port_override() -> anyhow::Result<Option<u16>> {
    flag_value("--port")
        .map(|raw| raw.parse().with_context(|| format!("invalid --port {}", raw)))
        .transpose()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env)?;
    let _log_guard = init_logging(&config);

    let port = get_port_override()?.unwrap_or(config.gateway.port);
    tracing::info!(
        "[BOOT] autoplaza {} ({}) env={}",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env
    );

    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(mockable::DefaultClock);
    let state = AppState::build(&config, store, clock)
        .await
        .context("initialise application state")?;

    gateway::run_server(&config.gateway.host, port, Arc::new(state)).await
}
