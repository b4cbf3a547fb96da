use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{Booking, BookingError, BookingStatus, CreateBookingRequest};

const BOOKING_COLUMNS: &str = "id,date,time,name,service,email,status";

/// CRUD over the bookings table. One instance per request, like the other
/// cells; the underlying reqwest client pools connections.
pub struct BookingService {
    supabase: Arc<SupabaseClient>,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Is there already a Scheduled booking at this date and time?
    pub async fn slot_taken(&self, date: NaiveDate, time: &str) -> Result<bool, BookingError> {
        let path = self.supabase.table_path(&format!(
            "select=id&date=eq.{}&time=eq.{}&status=eq.Scheduled&limit=1",
            date,
            urlencoding::encode(time),
        ));

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        Ok(!rows.is_empty())
    }

    /// Validate and insert a new booking as Scheduled.
    pub async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<Booking, BookingError> {
        let date_str = request.date.trim();
        let time = request.time.trim();
        let name = request.name.trim();
        let service = request.service.trim();
        let email = request
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty());

        if date_str.is_empty() || time.is_empty() || name.is_empty() || service.is_empty() {
            return Err(BookingError::MissingFields);
        }

        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|_| BookingError::InvalidDate(date_str.to_string()))?;

        if self.slot_taken(date, time).await? {
            return Err(BookingError::SlotTaken);
        }

        let payload = json!({
            "date": date,
            "time": time,
            "name": name,
            "service": service,
            "email": email,
            "status": BookingStatus::Scheduled.to_string(),
        });

        let rows = self
            .supabase
            .write_returning(Method::POST, &self.supabase.table_path(""), payload)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        let booking = parse_booking_row(rows.into_iter().next().ok_or_else(|| {
            BookingError::Database("Insert returned no rows".to_string())
        })?)?;

        info!("Booking {} inserted for {} at {}", booking.id, date, time);
        Ok(booking)
    }

    pub async fn fetch_booking(&self, booking_id: i64) -> Result<Option<Booking>, BookingError> {
        let path = self.supabase.table_path(&format!(
            "select={}&id=eq.{}&limit=1",
            BOOKING_COLUMNS, booking_id
        ));

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        rows.into_iter().next().map(parse_booking_row).transpose()
    }

    /// Public cancellation: match the booking by its details. Returns how
    /// many rows were cancelled (0 when nothing matched).
    pub async fn cancel_by_details(
        &self,
        date: &str,
        time: &str,
        name: &str,
        service: &str,
    ) -> Result<usize, BookingError> {
        let path = self.supabase.table_path(&format!(
            "date=eq.{}&time=eq.{}&name=eq.{}&service=eq.{}&status=eq.Scheduled",
            urlencoding::encode(date),
            urlencoding::encode(time),
            urlencoding::encode(name),
            urlencoding::encode(service),
        ));

        let rows = self
            .supabase
            .write_returning(
                Method::PATCH,
                &path,
                json!({ "status": BookingStatus::Cancelled.to_string() }),
            )
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        Ok(rows.len())
    }

    pub async fn cancel_by_id(
        &self,
        booking_id: i64,
    ) -> Result<(bool, Option<Booking>), BookingError> {
        self.transition_by_id(booking_id, BookingStatus::Cancelled)
            .await
    }

    pub async fn complete_by_id(
        &self,
        booking_id: i64,
    ) -> Result<(bool, Option<Booking>), BookingError> {
        self.transition_by_id(booking_id, BookingStatus::Completed)
            .await
    }

    /// Move a Scheduled booking to `target`. Rows in any other status are
    /// left untouched and reported as unchanged.
    async fn transition_by_id(
        &self,
        booking_id: i64,
        target: BookingStatus,
    ) -> Result<(bool, Option<Booking>), BookingError> {
        debug!("Transitioning booking {} to {}", booking_id, target);

        let path = self.supabase.table_path(&format!(
            "id=eq.{}&status=eq.Scheduled",
            booking_id
        ));

        self.supabase
            .write_returning(Method::PATCH, &path, json!({ "status": target.to_string() }))
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        let row = self.fetch_booking(booking_id).await?;
        let changed = row.as_ref().is_some_and(|b| b.status == target);
        Ok((changed, row))
    }

    /// Admin edit: move/rename a booking, refusing to land on an occupied
    /// slot held by a different booking.
    pub async fn update_booking(
        &self,
        booking_id: i64,
        name: &str,
        service: &str,
        date_str: &str,
        time: &str,
    ) -> Result<Booking, BookingError> {
        let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
            .map_err(|_| BookingError::InvalidDate(date_str.to_string()))?;

        let clash_path = self.supabase.table_path(&format!(
            "select=id&date=eq.{}&time=eq.{}&status=eq.Scheduled&id=neq.{}&limit=1",
            date,
            urlencoding::encode(time),
            booking_id,
        ));

        let clashes: Vec<Value> = self
            .supabase
            .request(Method::GET, &clash_path, None)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        if !clashes.is_empty() {
            return Err(BookingError::SlotTaken);
        }

        let path = self.supabase.table_path(&format!("id=eq.{}", booking_id));
        self.supabase
            .write_returning(
                Method::PATCH,
                &path,
                json!({
                    "name": name,
                    "service": service,
                    "date": date,
                    "time": time,
                }),
            )
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        self.fetch_booking(booking_id)
            .await?
            .ok_or(BookingError::NotFound)
    }

    /// Times of Scheduled bookings on a date.
    pub async fn booked_times(&self, date: NaiveDate) -> Result<HashSet<String>, BookingError> {
        let path = self.supabase.table_path(&format!(
            "select=time&date=eq.{}&status=eq.Scheduled",
            date
        ));

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .filter_map(|r| r.get("time").and_then(Value::as_str).map(String::from))
            .collect())
    }

    /// (date, time) pairs of Scheduled bookings in an inclusive date range.
    pub async fn scheduled_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, String)>, BookingError> {
        let path = self.supabase.table_path(&format!(
            "select=date,time&date=gte.{}&date=lte.{}&status=eq.Scheduled",
            start, end
        ));

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        let mut pairs = Vec::with_capacity(rows.len());
        for row in rows {
            let date = row
                .get("date")
                .and_then(Value::as_str)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
            let time = row.get("time").and_then(Value::as_str);
            if let (Some(date), Some(time)) = (date, time) {
                pairs.push((date, time.to_string()));
            }
        }
        Ok(pairs)
    }

    /// Bookings ordered by date then time, with the admin console's
    /// filters: optional start/end dates and a scheduled-only toggle.
    pub async fn list_bookings(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        scheduled_only: bool,
    ) -> Result<Vec<Booking>, BookingError> {
        let mut query = vec![format!("select={}", BOOKING_COLUMNS)];
        if let Some(start) = start {
            query.push(format!("date=gte.{}", start));
        }
        if let Some(end) = end {
            query.push(format!("date=lte.{}", end));
        }
        if scheduled_only {
            query.push("status=eq.Scheduled".to_string());
        }
        query.push("order=date.asc,time.asc".to_string());

        let path = self.supabase.table_path(&query.join("&"));
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        rows.into_iter().map(parse_booking_row).collect()
    }
}

fn parse_booking_row(row: Value) -> Result<Booking, BookingError> {
    serde_json::from_value(row)
        .map_err(|e| BookingError::Database(format!("Failed to parse booking: {}", e)))
}
