use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::Result;
use chrono::{Duration, NaiveTime, TimeZone, Utc};
use reqwest::Method;
use serde_json::Value;
use tracing::{error, info, warn};

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::services::mailer::Mailer;

/// Next-day reminder digests: one email per customer listing all of their
/// appointments for tomorrow in the business timezone.
pub struct ReminderService {
    config: Arc<AppConfig>,
    supabase: SupabaseClient,
    mailer: Mailer,
}

struct ReminderGroup {
    name: String,
    items: Vec<(String, String)>, // (time, service), already time-ordered
}

impl ReminderService {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            supabase: SupabaseClient::new(&config),
            mailer: Mailer::new(Arc::clone(&config)),
            config,
        }
    }

    pub async fn send_tomorrow_reminders(&self) -> Result<usize> {
        let today = Utc::now()
            .with_timezone(&self.config.business_timezone)
            .date_naive();
        let target = today + Duration::days(1);

        let path = self.supabase.table_path(&format!(
            "select=name,email,service,time&date=eq.{}&status=eq.Scheduled&order=time.asc",
            target
        ));
        let rows: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;

        let mut grouped: BTreeMap<String, ReminderGroup> = BTreeMap::new();
        for row in &rows {
            let email = row
                .get("email")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|e| !e.is_empty());
            let Some(email) = email else { continue };

            let name = row.get("name").and_then(Value::as_str).unwrap_or("there");
            let time = row.get("time").and_then(Value::as_str).unwrap_or_default();
            let service = row.get("service").and_then(Value::as_str).unwrap_or_default();

            grouped
                .entry(email.to_string())
                .or_insert_with(|| ReminderGroup {
                    name: name.to_string(),
                    items: Vec::new(),
                })
                .items
                .push((time.to_string(), service.to_string()));
        }

        let mut sent = 0;
        for (email, group) in &grouped {
            let subject = format!(
                "Reminder: Your {} appointment(s) tomorrow",
                self.config.salon_name
            );
            let body = reminder_body(
                group,
                &target.format("%Y-%m-%d").to_string(),
                &self.config.salon_name,
                &self.config.salon_address,
            );
            match self.mailer.send(Some(email), &subject, &body).await {
                Ok(true) => sent += 1,
                Ok(false) => {}
                Err(e) => warn!("Reminder email to {} failed: {}", email, e),
            }
        }

        info!(
            "Reminders for {}: {} booking(s), {} email(s) sent",
            target,
            rows.len(),
            sent
        );
        Ok(sent)
    }
}

fn reminder_body(group: &ReminderGroup, date: &str, salon_name: &str, salon_address: &str) -> String {
    let mut lines = vec![
        format!("Hi {},", group.name),
        String::new(),
        format!("Reminder: your {} appointment(s) tomorrow:", salon_name),
    ];
    for (time, service) in &group.items {
        lines.push(format!("• {} — {}", time, service));
    }
    lines.extend([
        String::new(),
        format!("Date: {}", date),
        String::new(),
        salon_address.to_string(),
        "If you need to cancel, just reply to this email.".to_string(),
        String::new(),
        "See you soon!".to_string(),
        format!("- {}", salon_name),
    ]);
    lines.join("\n")
}

/// Background task that fires the reminder run once a day at the
/// configured local time.
pub struct ReminderScheduler;

impl ReminderScheduler {
    pub fn spawn(config: Arc<AppConfig>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let service = ReminderService::new(Arc::clone(&config));
            loop {
                let wait = match next_run_delay(&config) {
                    Some(wait) => wait,
                    None => {
                        error!(
                            "Invalid reminder time {}:{:02}; scheduler stopped",
                            config.reminder_hour, config.reminder_minute
                        );
                        return;
                    }
                };
                tokio::time::sleep(wait).await;
                if let Err(e) = service.send_tomorrow_reminders().await {
                    error!("Reminder run failed: {}", e);
                }
            }
        })
    }
}

/// Time until the next `REMINDER_HOUR:REMINDER_MINUTE` in the business
/// timezone, at least one second out.
fn next_run_delay(config: &AppConfig) -> Option<StdDuration> {
    let at = NaiveTime::from_hms_opt(config.reminder_hour, config.reminder_minute, 0)?;
    let tz = config.business_timezone;
    let now = Utc::now().with_timezone(&tz);

    let mut target_date = now.date_naive();
    let mut target = tz.from_local_datetime(&target_date.and_time(at)).earliest();
    if target.is_none_or(|t| t <= now) {
        target_date += Duration::days(1);
        target = tz.from_local_datetime(&target_date.and_time(at)).earliest();
    }

    let seconds = (target? - now).num_seconds().max(1);
    Some(StdDuration::from_secs(seconds as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reminder_body_lists_each_visit() {
        let group = ReminderGroup {
            name: "Dana".to_string(),
            items: vec![
                ("10:00 AM".to_string(), "Cut".to_string()),
                ("2:30 PM".to_string(), "Color".to_string()),
            ],
        };
        let body = reminder_body(&group, "2025-06-04", "HairDaze", "414 E Walnut St");
        assert!(body.contains("• 10:00 AM — Cut"));
        assert!(body.contains("• 2:30 PM — Color"));
        assert!(body.contains("Date: 2025-06-04"));
    }

    #[test]
    fn next_run_is_within_a_day() {
        let config = shared_utils_free_test_config();
        let delay = next_run_delay(&config).unwrap();
        assert!(delay >= StdDuration::from_secs(1));
        assert!(delay <= StdDuration::from_secs(24 * 60 * 60 + 1));
    }

    #[test]
    fn invalid_reminder_time_yields_none() {
        let mut config = shared_utils_free_test_config();
        config.reminder_hour = 25;
        assert!(next_run_delay(&config).is_none());
    }

    // Local config builder; shared-utils is not a dependency of this cell.
    fn shared_utils_free_test_config() -> AppConfig {
        AppConfig {
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            supabase_table: "appointments".into(),
            site_slug: "hairdaze".into(),
            salon_name: "HairDaze".into(),
            salon_address: "414 E Walnut St".into(),
            business_timezone: chrono_tz::America::New_York,
            hours_spec: None,
            session_secret: "secret".into(),
            admin_email: String::new(),
            admin_password: String::new(),
            smtp_host: String::new(),
            smtp_port: 587,
            smtp_user: String::new(),
            smtp_pass: String::new(),
            from_email: String::new(),
            email_enabled: false,
            send_customer_notifications: false,
            reminders_enabled: false,
            reminder_hour: 18,
            reminder_minute: 0,
            port: 0,
        }
    }
}
