//! Helpers shared by cell test suites.

use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::session::AdminUser;

use crate::session::create_session_token;

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub supabase_table: String,
    pub session_secret: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key-long-enough-to-pass-checks".to_string(),
            supabase_table: "appointments".to_string(),
            session_secret: "test-session-secret-long-enough-for-hs256".to_string(),
            admin_email: String::new(),
            admin_password: String::new(),
        }
    }
}

impl TestConfig {
    /// Point the client at a wiremock server.
    pub fn with_supabase_url(mut self, url: &str) -> Self {
        self.supabase_url = url.to_string();
        self
    }

    pub fn with_env_admin(mut self, email: &str, password: &str) -> Self {
        self.admin_email = email.to_string();
        self.admin_password = password.to_string();
        self
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            supabase_table: self.supabase_table.clone(),
            site_slug: "hairdaze".to_string(),
            salon_name: "HairDaze".to_string(),
            salon_address: "414 E Walnut St, North Wales, PA 19454".to_string(),
            business_timezone: chrono_tz::America::New_York,
            hours_spec: None,
            session_secret: self.session_secret.clone(),
            admin_email: self.admin_email.clone(),
            admin_password: self.admin_password.clone(),
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

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }

    /// A logged-in admin plus the cookie value that represents them.
    pub fn test_session(&self) -> (AdminUser, String) {
        let (token, claims) =
            create_session_token(Uuid::new_v4(), "owner@example.com", &self.session_secret)
                .expect("session token");
        (AdminUser::from(claims), token)
    }
}

/// Canned Supabase row payloads used across cell tests.
pub struct MockSupabaseRows;

impl MockSupabaseRows {
    pub fn booking(id: i64, date: &str, time: &str, name: &str, service: &str) -> Value {
        json!({
            "id": id,
            "date": date,
            "time": time,
            "name": name,
            "service": service,
            "email": null,
            "status": "Scheduled"
        })
    }

    pub fn booking_with_email(
        id: i64,
        date: &str,
        time: &str,
        name: &str,
        service: &str,
        email: &str,
    ) -> Value {
        json!({
            "id": id,
            "date": date,
            "time": time,
            "name": name,
            "service": service,
            "email": email,
            "status": "Scheduled"
        })
    }

    pub fn admin_row(id: Uuid, email: &str, password_hash: &str) -> Value {
        json!({
            "id": id,
            "email": email,
            "password_hash": password_hash
        })
    }
}
