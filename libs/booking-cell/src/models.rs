use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==============================================================================
// CORE BOOKING MODELS
// ==============================================================================

/// A row in the bookings table. `time` is stored as the display string
/// ("9:00 AM"), matching the slots the schedule generates, so slot
/// comparisons are plain string equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub date: NaiveDate,
    pub time: String,
    pub name: String,
    pub service: String,
    pub email: Option<String>,
    pub status: BookingStatus,
}

impl Booking {
    /// Customer email, if one was left and it is non-empty.
    pub fn customer_email(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }
}

impl From<&Booking> for notification_cell::BookingEmailContext {
    fn from(booking: &Booking) -> Self {
        Self {
            name: booking.name.clone(),
            email: booking.email.clone(),
            service: booking.service.clone(),
            date: booking.date.format("%Y-%m-%d").to_string(),
            time: booking.time.clone(),
        }
    }
}

/// Status values are capitalized in the database.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingStatus {
    Scheduled,
    Cancelled,
    Completed,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Scheduled => write!(f, "Scheduled"),
            BookingStatus::Cancelled => write!(f, "Cancelled"),
            BookingStatus::Completed => write!(f, "Completed"),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub date: String,
    pub time: String,
    pub name: String,
    pub service: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelByDetailsRequest {
    pub date: String,
    pub time: String,
    pub name: String,
    pub service: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingRequest {
    pub name: String,
    pub service: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Deserialize)]
pub struct AvailableTimesQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AvailableTimesResponse {
    pub times: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AvailableDaysResponse {
    pub dates: Vec<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Missing fields")]
    MissingFields,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("That time is already booked")]
    SlotTaken,

    #[error("Booking not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),
}
