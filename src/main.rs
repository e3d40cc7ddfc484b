// SPDX-License-Identifier: MIT

//! RideLink API server.
//!
//! Drivers list rides, passengers book seats; state is held by a single
//! [`DataStore`](ridelink::db::DataStore) mirrored to local storage.

use ridelink::{config::Config, db::DataStore, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting RideLink API");

    // Open the data store; without DATA_DIR it runs detached (in-memory)
    let store = match &config.data_dir {
        Some(dir) => {
            tracing::info!(path = %dir.display(), "Opening data store");
            DataStore::open(dir)
        }
        None => {
            tracing::warn!("DATA_DIR not set, state will not be persisted");
            DataStore::detached()
        }
    };

    // Build shared state
    let state = Arc::new(AppState { config, store });

    // Build router
    let app = ridelink::routes::create_router(state.clone());

    // Start server
    let addr = format!("0.0.0.0:{}", state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ridelink=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
