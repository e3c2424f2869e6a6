// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use homelab_dashboard::application::dashboard_service::DashboardService;
use homelab_dashboard::application::grid_controller::GridSettings;
use homelab_dashboard::infrastructure::config::load_app_config;
use homelab_dashboard::infrastructure::json_store::JsonLayoutStore;
use homelab_dashboard::presentation::app_state::AppState;
use homelab_dashboard::presentation::handlers::{
    add_item, delete_item, duplicate_item, get_dashboard, health_check, import_items, list_pages,
    post_event,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let app_config = load_app_config()?;

    // Create repository (infrastructure layer)
    let store = JsonLayoutStore::open(&app_config.storage.path)
        .await
        .with_context(|| format!("Failed to open layout store {}", app_config.storage.path.display()))?;
    let repository = Arc::new(store);

    // Create services (application layer)
    let dashboard_service = DashboardService::new(repository, GridSettings::from(&app_config.grid));

    // Create application state
    let state = Arc::new(AppState { dashboard_service });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/pages", get(list_pages))
        .route("/dashboards/:page/:device", get(get_dashboard))
        .route("/dashboards/:page/:device/events", post(post_event))
        .route("/dashboards/:page/:device/items", post(add_item).put(import_items))
        .route("/dashboards/:page/:device/items/:id", delete(delete_item))
        .route("/dashboards/:page/:device/items/:id/duplicate", post(duplicate_item))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = app_config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", app_config.server.bind))?;
    tracing::info!("Starting homelab-dashboard on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
