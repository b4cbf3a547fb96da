use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Per-client sliding-window limiter for the login endpoint: at most 5
/// attempts per minute and 50 per hour.
pub struct LoginRateLimiter {
    attempts: DashMap<String, Vec<Instant>>,
    per_minute: usize,
    per_hour: usize,
}

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(60 * 60);

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new(5, 50)
    }
}

impl LoginRateLimiter {
    pub fn new(per_minute: usize, per_hour: usize) -> Self {
        Self {
            attempts: DashMap::new(),
            per_minute,
            per_hour,
        }
    }

    /// Record an attempt for `key` and report whether it is allowed.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> bool {
        // Drop expired attempts everywhere and evict keys left empty.
        self.attempts.retain(|_, stamps| {
            stamps.retain(|t| now.duration_since(*t) < HOUR);
            !stamps.is_empty()
        });

        let mut entry = self.attempts.entry(key.to_string()).or_default();

        let last_minute = entry
            .iter()
            .filter(|t| now.duration_since(**t) < MINUTE)
            .count();

        if last_minute >= self.per_minute || entry.len() >= self.per_hour {
            return false;
        }

        entry.push(now);
        true
    }
}
