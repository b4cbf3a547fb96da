use std::sync::Arc;

use axum::{routing::get, Router};

use admin_cell::admin_routes;
use booking_cell::booking_routes;
use shared_config::AppConfig;
use site_cell::site_routes;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Salon booking API is running!" }))
        .route("/healthz", get(|| async { "ok" }))
        .nest("/site", site_routes(state.clone()))
        .nest("/bookings", booking_routes(state.clone()))
        .nest("/admin", admin_routes(state))
}
