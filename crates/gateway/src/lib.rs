//! API Gateway Library
//!
//! The HTTP surface of the shop backend: one POST endpoint per function,
//! dispatched on the request's `action`, over the in-process services.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use auth_service_lib::config::AuthServiceConfig;
use auth_service_lib::service::StaffDirectory;
use auth_service_lib::Services;
use user_service_lib::config::UserServiceConfig;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Connect the store and the owner index, and wire every service.
pub async fn build_state() -> Result<AppState, Box<dyn std::error::Error>> {
    let (database, repos) = user_service_lib::connect(&UserServiceConfig::from_env()).await?;
    info!("Store connected and migrated");

    let services = Services::connect(repos, &AuthServiceConfig::from_env()).await?;

    Ok(AppState::new(services, Some(database)))
}

/// Router with tracing and CORS layers applied.
pub fn app(state: AppState) -> Router {
    create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Periodically delete staff accounts left without a link.
pub fn spawn_reconciler(staff: Arc<dyn StaffDirectory>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            match staff.reconcile_orphans().await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "Removed orphaned staff accounts"),
                Err(e) => error!("Orphan reconciliation failed: {}", e),
            }
        }
    })
}

/// Serve `state` on `host:port` until the process exits.
pub async fn serve(
    host: &str,
    port: u16,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

/// Run the gateway as an embedded component (for combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = GatewayConfig::from_env();
    let state = build_state().await?;

    if config.reconcile_interval_seconds > 0 {
        spawn_reconciler(
            state.services.staff.clone(),
            Duration::from_secs(config.reconcile_interval_seconds),
        );
    }

    serve(host, port, state).await
}
