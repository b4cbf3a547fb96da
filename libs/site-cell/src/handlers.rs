use std::sync::Arc;

use axum::{extract::State, Json};

use shared_config::AppConfig;

use crate::models::SiteConfig;
use crate::services::site::SiteService;

/// Tenant configuration for the public pages. Never fails; DB trouble
/// degrades to the env-derived site.
#[axum::debug_handler]
pub async fn get_site(State(state): State<Arc<AppConfig>>) -> Json<SiteConfig> {
    Json(SiteService::new(&state).load_site().await)
}
