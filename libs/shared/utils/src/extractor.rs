use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::session::{AdminUser, CSRF_HEADER, SESSION_COOKIE};

use crate::session::validate_session_token;

/// Middleware guarding admin routes: validates the session cookie and
/// inserts the [`AdminUser`] into request extensions.
pub async fn session_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let jar = CookieJar::from_headers(request.headers());

    let cookie = jar
        .get(SESSION_COOKIE)
        .ok_or_else(|| AppError::Auth("Not logged in".to_string()))?;

    let claims = validate_session_token(cookie.value(), &config.session_secret)
        .map_err(AppError::Auth)?;

    request.extensions_mut().insert(AdminUser::from(claims));

    Ok(next.run(request).await)
}

/// CSRF check for admin mutations: the `X-CSRF-Token` header must match
/// the token minted into the session at login.
pub fn require_csrf(headers: &HeaderMap, admin: &AdminUser) -> Result<(), AppError> {
    let presented = headers
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Forbidden("csrf".to_string()))?;

    if presented != admin.csrf {
        return Err(AppError::Forbidden("csrf".to_string()));
    }

    Ok(())
}
