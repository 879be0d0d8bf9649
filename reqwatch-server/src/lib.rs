//! reqwatch-server library - meeting-request store and HTTP API
//!
//! Hosts the backing store behind two surfaces: a public submission endpoint
//! and an admin read endpoint protected by a shared secret.

use axum::Router;
use sqlx::SqlitePool;

pub mod api;
pub mod db;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Shared secret for the admin read API
    ///
    /// An empty secret rejects every admin request; there is no way to
    /// disable authentication.
    pub admin_secret: String,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, admin_secret: String) -> Self {
        Self { db, admin_secret }
    }
}

/// Build application router
///
/// Admin routes require the shared secret; submission and health do not.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};
    use tower_http::trace::TraceLayer;

    // Protected routes (require the admin secret)
    let protected = Router::new()
        .route("/api/admin/meeting-requests", get(api::list_meeting_requests))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/api/meeting-request", post(api::submit_meeting_request))
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
