use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::session_middleware;

use crate::handlers;

/// Admin console surface. Everything except login/logout sits behind the
/// session cookie; mutations additionally check the CSRF header.
pub fn admin_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/bookings", get(handlers::list_bookings))
        .route("/bookings/{booking_id}/cancel", post(handlers::cancel_booking))
        .route(
            "/bookings/{booking_id}/complete",
            post(handlers::complete_booking),
        )
        .route("/bookings/{booking_id}", put(handlers::update_booking))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    Router::new()
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .merge(protected_routes)
        .with_state(state)
}
