use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn site_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::get_site))
        .with_state(state)
}
