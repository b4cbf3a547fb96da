use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

use notification_cell::{BookingEmailContext, Mailer};
use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    AvailableDaysResponse, AvailableTimesQuery, AvailableTimesResponse, BookingError,
    CancelByDetailsRequest, CreateBookingRequest,
};
use crate::services::availability::AvailabilityService;
use crate::services::booking::BookingService;

fn map_booking_error(e: BookingError) -> AppError {
    match e {
        BookingError::MissingFields => AppError::BadRequest("Missing fields".to_string()),
        BookingError::InvalidDate(d) => AppError::BadRequest(format!("Invalid date: {}", d)),
        BookingError::SlotTaken => AppError::BadRequest("Time already booked".to_string()),
        BookingError::NotFound => AppError::NotFound("Booking not found".to_string()),
        BookingError::Database(msg) => {
            warn!("Booking database error: {}", msg);
            AppError::Internal("Server error — please try again.".to_string())
        }
    }
}

/// Public booking form submission.
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);

    let booking = service
        .create_booking(request)
        .await
        .map_err(map_booking_error)?;

    Mailer::new(Arc::clone(&state))
        .spawn_booking_confirmation(BookingEmailContext::from(&booking));

    Ok(Json(json!({
        "success": true,
        "booking": booking,
    })))
}

/// Open slots for a date; empty when the date is missing, unparseable,
/// or the salon is closed that weekday.
#[axum::debug_handler]
pub async fn available_times(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<AvailableTimesQuery>,
) -> Result<Json<AvailableTimesResponse>, AppError> {
    let Some(date) = query.date else {
        return Ok(Json(AvailableTimesResponse { times: Vec::new() }));
    };

    let times = AvailabilityService::new(&state)
        .available_times(&date)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(AvailableTimesResponse { times }))
}

/// Days in the booking window with at least one open slot.
#[axum::debug_handler]
pub async fn available_days(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<AvailableDaysResponse>, AppError> {
    let dates = AvailabilityService::new(&state)
        .available_days()
        .await
        .map_err(map_booking_error)?;

    Ok(Json(AvailableDaysResponse { dates }))
}

/// Public cancellation by booking details.
#[axum::debug_handler]
pub async fn cancel_by_details(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CancelByDetailsRequest>,
) -> Result<Json<Value>, AppError> {
    let changed = BookingService::new(&state)
        .cancel_by_details(&request.date, &request.time, &request.name, &request.service)
        .await
        .map_err(map_booking_error)?;

    let message = if changed > 0 {
        "Booking cancelled."
    } else {
        "Booking not found."
    };

    Ok(Json(json!({
        "cancelled": changed > 0,
        "message": message,
    })))
}
