use chrono::{Duration, NaiveDate, NaiveTime, Weekday};
use tracing::warn;

/// Bookable slots are fixed 30-minute intervals.
pub const SLOT_INTERVAL_MINUTES: i64 = 30;

/// Display format for slot times; no leading zero on the hour ("9:00 AM").
pub const SLOT_FORMAT: &str = "%-I:%M %p";

const PARSE_FORMAT: &str = "%I:%M %p";

/// Per-weekday open hours, indexed Mon=0..Sun=6 (the convention the
/// `HOURS` env variable uses).
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessHours {
    by_weekday: [Option<(NaiveTime, NaiveTime)>; 7],
}

impl Default for BusinessHours {
    /// Tue-Sat salon week; closed Sunday and Monday.
    fn default() -> Self {
        let mut by_weekday: [Option<(NaiveTime, NaiveTime)>; 7] = [None; 7];
        by_weekday[1] = Some((t(10, 0), t(19, 0))); // Tue
        by_weekday[2] = Some((t(14, 0), t(19, 0))); // Wed
        by_weekday[3] = Some((t(10, 0), t(19, 0))); // Thu
        by_weekday[4] = Some((t(9, 0), t(18, 0))); // Fri
        by_weekday[5] = Some((t(9, 0), t(17, 0))); // Sat
        Self { by_weekday }
    }
}

fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("static time")
}

impl BusinessHours {
    /// Parse an `HOURS` spec like
    /// `"Tue=10:00 AM-7:00 PM;Wed=2:00 PM-7:00 PM;Sat=9:00 AM-5:00 PM"`.
    /// Day keys match on the first three letters, case-insensitive;
    /// malformed segments are skipped, and a recognized day with a
    /// reversed window stays closed. Returns `None` when nothing parses,
    /// so callers can fall back to the defaults.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut by_weekday: [Option<(NaiveTime, NaiveTime)>; 7] = [None; 7];
        let mut any = false;

        for part in spec.split(';') {
            let Some((day, span)) = part.split_once('=') else {
                continue;
            };
            let Some(day_idx) = weekday_index(day.trim()) else {
                warn!("Unrecognized day in HOURS: {:?}", day.trim());
                continue;
            };
            let Some((start_raw, end_raw)) = span.split_once('-') else {
                warn!("Missing time range in HOURS segment: {:?}", part);
                continue;
            };
            let (Ok(start), Ok(end)) = (
                NaiveTime::parse_from_str(start_raw.trim(), PARSE_FORMAT),
                NaiveTime::parse_from_str(end_raw.trim(), PARSE_FORMAT),
            ) else {
                warn!("Unparseable times in HOURS segment: {:?}", part);
                continue;
            };
            if start >= end {
                warn!("Reversed open window in HOURS segment, day stays closed: {:?}", part);
                any = true;
                continue;
            }
            by_weekday[day_idx] = Some((start, end));
            any = true;
        }

        any.then_some(Self { by_weekday })
    }

    /// Spec override when present and valid, otherwise the default week.
    pub fn from_spec(spec: Option<&str>) -> Self {
        spec.and_then(Self::parse).unwrap_or_default()
    }

    pub fn hours_for(&self, weekday: Weekday) -> Option<(NaiveTime, NaiveTime)> {
        self.by_weekday[weekday.num_days_from_monday() as usize]
    }

    pub fn is_open(&self, weekday: Weekday) -> bool {
        self.hours_for(weekday).is_some()
    }

    /// All slot strings for a date, or empty when closed that weekday.
    pub fn slots_for(&self, date: NaiveDate) -> Vec<String> {
        use chrono::Datelike;
        match self.hours_for(date.weekday()) {
            Some((start, end)) => generate_slots(start, end, SLOT_INTERVAL_MINUTES),
            None => Vec::new(),
        }
    }
}

fn weekday_index(day: &str) -> Option<usize> {
    match day.get(..3)?.to_ascii_lowercase().as_str() {
        "mon" => Some(0),
        "tue" => Some(1),
        "wed" => Some(2),
        "thu" => Some(3),
        "fri" => Some(4),
        "sat" => Some(5),
        "sun" => Some(6),
        _ => None,
    }
}

/// Fixed-interval slots from open to close, close exclusive.
pub fn generate_slots(start: NaiveTime, end: NaiveTime, interval_minutes: i64) -> Vec<String> {
    let mut slots = Vec::new();
    let mut cursor = start;
    while cursor < end {
        slots.push(cursor.format(SLOT_FORMAT).to_string());
        let next = cursor + Duration::minutes(interval_minutes);
        // NaiveTime arithmetic wraps at midnight; a wrapped cursor means
        // the window is exhausted.
        if next <= cursor {
            break;
        }
        cursor = next;
    }
    slots
}
