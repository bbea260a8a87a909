//! Evently HTTP server
//!
//! REST API over the evently-core services. Endpoints are grouped per
//! resource in their own modules and merged into one router; all handlers
//! share an [`AppState`] holding the services over a single lazy
//! [`ConnectionCache`](evently_core::ConnectionCache).

pub mod api_error;
pub mod booking_endpoints;
pub mod config;
pub mod event_endpoints;
pub mod media;

use axum::{
    http::Method,
    response::Json,
    routing::get,
    Router,
};
use evently_core::{BookingService, ConnectionCache, EventService};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::media::MediaClient;

/// Shared state for all endpoint handlers
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<EventService>,
    pub bookings: Arc<BookingService>,
    pub media: Option<Arc<MediaClient>>,
}

impl AppState {
    /// Build application state from config. The database connection is not
    /// opened here; it is established on first use.
    pub fn from_config(config: &Config) -> Self {
        let cache = Arc::new(ConnectionCache::new(config.db_path.clone()));
        AppState {
            events: Arc::new(EventService::new(cache.clone())),
            bookings: Arc::new(BookingService::new(cache)),
            media: config
                .media
                .as_ref()
                .map(|m| Arc::new(MediaClient::new(m))),
        }
    }
}

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    version: String,
}

async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Build the full application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .merge(event_endpoints::routes(state.clone()))
        .merge(booking_endpoints::routes(state))
        .layer(cors_layer())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Bind and serve until the process is stopped
pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(&config);
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Evently server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
