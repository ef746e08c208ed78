//! Lawdesk case management server.
//!
//! Serves the JSON API for clients, cases, lawyer availability and
//! bookings, the legal chatbot, and the WebSocket chat relay.

mod config;
mod error;
mod extract;
mod routes;
mod state;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use assistant::{Assistant, OpenAiAssistant};
use database::Database;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting Lawdesk server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // The chatbot is optional
    let assistant: Option<Arc<dyn Assistant>> = match OpenAiAssistant::from_env() {
        Ok(assistant) => Some(Arc::new(assistant)),
        Err(err) => {
            warn!("Legal assistant disabled: {}", err);
            None
        }
    };

    // Build application state
    let state = AppState::new(db, assistant);

    // Build router
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Lawdesk server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
