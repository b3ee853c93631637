use crate::config::AppConfig;
use crate::core::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use connectors::services::{gmail::GmailClient, notion::NotionClient};
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

// Declare the modules we created.
mod api;
mod config;
mod core;


pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(api::ui::index_handler))
        .route("/healthz", get(api::ui::healthz_handler))
        .route("/api/agent", post(api::agent::agent_handler))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from a .env file.
    dotenv().ok();
    // Use a JSON logger for production-ready structured logging
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // --- Configuration ---
    let app_config = AppConfig::from_env();
    let missing = app_config.missing_vars();
    if !missing.is_empty() {
        warn!(
            "Missing configuration: {}. Affected actions will fail until set.",
            missing.join(", ")
        );
    }

    // --- Upstream clients (one pooled HTTP client shared by both) ---
    let http = reqwest_client()?;
    let app_state = AppState {
        mail: Arc::new(GmailClient::new(http.clone(), app_config.gmail)),
        documents: Arc::new(NotionClient::new(http, app_config.notion)),
    };

    let app = build_router(app_state);

    // --- Start HTTP Server ---
    // Bind to 0.0.0.0 to be reachable in a container
    let addr = SocketAddr::from(([0, 0, 0, 0], app_config.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            info!("HTTP Server listening on {}", addr);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    }

    Ok(())
}

fn reqwest_client() -> Result<connectors::reqwest::Client, Box<dyn std::error::Error>> {
    let client = connectors::reqwest::Client::builder()
        .user_agent(concat!("agent-panel/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
