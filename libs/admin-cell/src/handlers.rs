use std::net::SocketAddr;
use std::sync::{Arc, LazyLock};

use axum::{
    extract::{ConnectInfo, Extension, Path, Query, State},
    http::HeaderMap,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{info, warn};

use booking_cell::models::{BookingError, UpdateBookingRequest};
use booking_cell::services::BookingService;
use notification_cell::{BookingEmailContext, Mailer};
use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::session::{AdminUser, SESSION_COOKIE};
use shared_utils::extractor::require_csrf;
use shared_utils::session::create_session_token;

use crate::models::{BookingListQuery, LoginRequest};
use crate::services::accounts::AdminAccountService;
use crate::services::rate_limit::LoginRateLimiter;

static LOGIN_LIMITER: LazyLock<LoginRateLimiter> = LazyLock::new(LoginRateLimiter::default);

/// Admin login: checks credentials, sets the session cookie and returns
/// the CSRF token the console must echo on mutations.
#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppConfig>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    if !LOGIN_LIMITER.check(&addr.ip().to_string()) {
        warn!("Login rate limit hit for {}", addr.ip());
        return Err(AppError::TooManyRequests(
            "Too many login attempts".to_string(),
        ));
    }

    let admin = AdminAccountService::new(&state)
        .authenticate(&request.email, &request.password)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::Auth("Invalid email or password".to_string()))?;

    let (token, claims) = create_session_token(admin.id, &admin.email, &state.session_secret)
        .map_err(AppError::Internal)?;

    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_secure(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");

    info!("Admin {} logged in", admin.email);

    Ok((
        jar.add(cookie),
        Json(json!({
            "ok": true,
            "email": admin.email,
            "csrf_token": claims.csrf,
        })),
    ))
}

#[axum::debug_handler]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));
    (jar, Json(json!({ "ok": true })))
}

/// Console listing: `view=today` (default) shows today onward,
/// `view=all` the full history; `status=all` includes cancelled and
/// completed rows.
#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<AppConfig>>,
    Extension(admin): Extension<AdminUser>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Value>, AppError> {
    let view = match query.view.as_deref() {
        Some("all") => "all",
        _ => "today",
    };
    let today = Utc::now()
        .with_timezone(&state.business_timezone)
        .date_naive();
    let start = (view == "today").then_some(today);
    let scheduled_only = query.status.as_deref() != Some("all");

    let bookings = BookingService::new(&state)
        .list_bookings(start, None, scheduled_only)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "ok": true,
        "view": view,
        "today": today.format("%Y-%m-%d").to_string(),
        "csrf_token": admin.csrf,
        "bookings": bookings,
    })))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<AppConfig>>,
    Path(booking_id): Path<i64>,
    Extension(admin): Extension<AdminUser>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    require_csrf(&headers, &admin)?;

    let (changed, row) = BookingService::new(&state)
        .cancel_by_id(booking_id)
        .await
        .map_err(map_booking_error)?;

    if changed {
        if let Some(booking) = &row {
            Mailer::new(Arc::clone(&state))
                .spawn_cancellation_notice(BookingEmailContext::from(booking));
        }
    }

    Ok(Json(json!({ "ok": true, "changed": changed })))
}

#[axum::debug_handler]
pub async fn complete_booking(
    State(state): State<Arc<AppConfig>>,
    Path(booking_id): Path<i64>,
    Extension(admin): Extension<AdminUser>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    require_csrf(&headers, &admin)?;

    let (changed, row) = BookingService::new(&state)
        .complete_by_id(booking_id)
        .await
        .map_err(map_booking_error)?;

    if changed {
        if let Some(booking) = &row {
            Mailer::new(Arc::clone(&state))
                .spawn_thanks_note(BookingEmailContext::from(booking));
        }
    }

    Ok(Json(json!({ "ok": true, "changed": changed })))
}

/// Edit a booking's name, service, date or time. Refuses to move it onto
/// a slot another Scheduled booking holds.
#[axum::debug_handler]
pub async fn update_booking(
    State(state): State<Arc<AppConfig>>,
    Path(booking_id): Path<i64>,
    Extension(admin): Extension<AdminUser>,
    headers: HeaderMap,
    Json(request): Json<UpdateBookingRequest>,
) -> Result<Json<Value>, AppError> {
    require_csrf(&headers, &admin)?;

    let name = request.name.trim();
    let service = request.service.trim();
    let date = request.date.trim();
    let time = request.time.trim();

    if name.is_empty() || service.is_empty() || date.is_empty() || time.is_empty() {
        return Err(AppError::BadRequest("Missing fields".to_string()));
    }

    let booking = BookingService::new(&state)
        .update_booking(booking_id, name, service, date, time)
        .await
        .map_err(|e| match e {
            BookingError::SlotTaken => {
                AppError::Conflict("That time is already booked".to_string())
            }
            other => map_booking_error(other),
        })?;

    Ok(Json(json!({ "ok": true, "booking": booking })))
}

fn map_booking_error(e: BookingError) -> AppError {
    match e {
        BookingError::MissingFields => AppError::BadRequest("Missing fields".to_string()),
        BookingError::InvalidDate(d) => AppError::BadRequest(format!("Invalid date: {}", d)),
        BookingError::SlotTaken => AppError::Conflict("That time is already booked".to_string()),
        BookingError::NotFound => AppError::NotFound("Booking not found".to_string()),
        BookingError::Database(msg) => AppError::Database(msg),
    }
}
