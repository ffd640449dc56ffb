//! Clinical Search binary entry point.
//!
//! Serves the clinical search pipeline over HTTP or, with
//! `SERVER_TRANSPORT=stdio`, as an MCP tool. All logs go to stderr so the
//! stdio transport keeps stdout for JSON-RPC messages.
//!
//! Coverage is excluded because the main function binds sockets or stdio
//! and runs until shutdown.

// Enable the coverage attribute when running with nightly for llvm-cov exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::sync::Arc;

use clinical_search::config::{
    load_config, LogFormat, RuntimeConfig, Transport, DEFAULT_LOG_LEVEL,
};
use clinical_search::search::DefaultClinicalSearch;
use clinical_search::server::{serve_http, serve_stdio, AppState};
use tracing_subscriber::filter::EnvFilter;

#[cfg_attr(coverage_nightly, coverage(off))]
fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() {
    // Load runtime settings from environment
    let runtime = match RuntimeConfig::from_env() {
        Ok(runtime) => runtime,
        Err(e) => {
            init_tracing(DEFAULT_LOG_LEVEL, LogFormat::Text);
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(&runtime.log_level, runtime.log_format);
    tracing::info!("clinical-search starting...");

    let config = match load_config(&runtime.config_path) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Configuration loaded: path={}, tool={}, model={}, transport={:?}",
        runtime.config_path,
        config.tool.name,
        config.model.id,
        runtime.transport
    );

    let search = match DefaultClinicalSearch::from_config(config, runtime.api_key.expose()) {
        Ok(search) => search,
        Err(e) => {
            tracing::error!("Initialization error: {e}");
            std::process::exit(1);
        }
    };
    let state = AppState::new(search.into_dyn());

    let result = match runtime.transport {
        Transport::Http => serve_http(state, &runtime.bind_addr).await,
        Transport::Stdio => serve_stdio(state).await,
    };
    if let Err(e) = result {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }

    tracing::info!("clinical-search shutdown complete");
}
