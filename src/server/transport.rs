//! Transport layer.
//!
//! This module starts the server on one of two transports:
//! - HTTP (`axum`) serving the JSON endpoint
//! - stdio serving the MCP tool, for agent hosts that spawn the binary

use rmcp::transport::io::stdio;
use rmcp::ServiceExt;
use tokio::net::TcpListener;

use super::http::router;
use super::mcp::ClinicalSearchServer;
use super::types::AppState;
use crate::error::AppError;

/// Serve the HTTP endpoint on `bind_addr` until Ctrl-C.
///
/// # Errors
///
/// Returns [`AppError::Server`] if the address cannot be bound or the
/// server fails.
pub async fn serve_http(state: AppState, bind_addr: &str) -> Result<(), AppError> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| AppError::Server {
            message: format!("Failed to bind {bind_addr}: {e}"),
        })?;
    serve_http_on(state, listener).await
}

/// Serve the HTTP endpoint on an already-bound listener until Ctrl-C.
///
/// # Errors
///
/// Returns [`AppError::Server`] if the server fails.
pub async fn serve_http_on(state: AppState, listener: TcpListener) -> Result<(), AppError> {
    let addr = listener
        .local_addr()
        .map_or_else(|_| "unknown".to_string(), |a| a.to_string());
    tracing::info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await
        .map_err(|e| AppError::Server {
            message: e.to_string(),
        })
}

/// Serve the MCP tool over stdin/stdout until the host disconnects.
///
/// # Errors
///
/// Returns [`AppError::Server`] if the handshake or the session fails.
pub async fn serve_stdio(state: AppState) -> Result<(), AppError> {
    let service = ClinicalSearchServer::new(state)
        .serve(stdio())
        .await
        .map_err(|e| AppError::Server {
            message: format!("MCP initialization failed: {e}"),
        })?;

    tracing::info!("MCP server ready on stdio");

    service.waiting().await.map_err(|e| AppError::Server {
        message: e.to_string(),
    })?;
    Ok(())
}
