use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::debug;

use shared_config::AppConfig;

use crate::models::BookingError;
use crate::services::booking::BookingService;
use crate::services::schedule::BusinessHours;

/// How far ahead the booking calendar looks for open days.
pub const BOOKING_WINDOW_DAYS: i64 = 60;

pub struct AvailabilityService {
    bookings: BookingService,
    hours: BusinessHours,
    timezone: Tz,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            bookings: BookingService::new(config),
            hours: BusinessHours::from_spec(config.hours_spec.as_deref()),
            timezone: config.business_timezone,
        }
    }

    /// Open slots for a date. An unparseable date or a closed weekday is
    /// not an error; the booking form just shows no times.
    pub async fn available_times(&self, date_str: &str) -> Result<Vec<String>, BookingError> {
        let Ok(date) = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d") else {
            debug!("available_times: unparseable date {:?}", date_str);
            return Ok(Vec::new());
        };

        let all_slots = self.hours.slots_for(date);
        if all_slots.is_empty() {
            return Ok(Vec::new());
        }

        let booked: HashSet<String> = self.bookings.booked_times(date).await?;

        Ok(all_slots
            .into_iter()
            .filter(|slot| !booked.contains(slot))
            .collect())
    }

    /// Days in the booking window with at least one open slot, as ISO
    /// dates. "Today" is taken in the business timezone.
    pub async fn available_days(&self) -> Result<Vec<String>, BookingError> {
        let today = Utc::now().with_timezone(&self.timezone).date_naive();
        let end = today + Duration::days(BOOKING_WINDOW_DAYS - 1);

        let mut booked_by_date: HashMap<NaiveDate, HashSet<String>> = HashMap::new();
        for (date, time) in self.bookings.scheduled_between(today, end).await? {
            booked_by_date.entry(date).or_default().insert(time);
        }

        let mut dates = Vec::new();
        for offset in 0..BOOKING_WINDOW_DAYS {
            let date = today + Duration::days(offset);
            let slots = self.hours.slots_for(date);
            if slots.is_empty() {
                continue;
            }
            let booked = booked_by_date.get(&date);
            let has_open_slot = slots
                .iter()
                .any(|slot| !booked.is_some_and(|taken| taken.contains(slot)));
            if has_open_slot {
                dates.push(date.format("%Y-%m-%d").to_string());
            }
        }
        Ok(dates)
    }
}
