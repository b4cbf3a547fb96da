use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

/// Public booking surface: no authentication, these back the booking form.
pub fn booking_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::create_booking))
        .route("/cancel", post(handlers::cancel_by_details))
        .route("/availability/times", get(handlers::available_times))
        .route("/availability/days", get(handlers::available_days))
        .with_state(state)
}
