use std::env;

use chrono_tz::Tz;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    /// Bookings table, set per-site (e.g. `appointments_hairdaze`).
    pub supabase_table: String,

    pub site_slug: String,
    pub salon_name: String,
    pub salon_address: String,
    pub business_timezone: Tz,
    /// Raw `HOURS` env value; parsed by the booking cell.
    pub hours_spec: Option<String>,

    pub session_secret: String,
    pub admin_email: String,
    pub admin_password: String,

    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: String,
    pub from_email: String,
    pub email_enabled: bool,
    pub send_customer_notifications: bool,

    pub reminders_enabled: bool,
    pub reminder_hour: u32,
    pub reminder_minute: u32,

    pub port: u16,
}

fn env_or_empty(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using empty value", key);
        String::new()
    })
}

fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => v == "1" || v.eq_ignore_ascii_case("true"),
        Err(_) => default,
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let business_timezone = env::var("BUSINESS_TIMEZONE")
            .ok()
            .and_then(|v| v.parse::<Tz>().ok())
            .unwrap_or(chrono_tz::America::New_York);

        let smtp_user = env_or_empty("SMTP_USER");
        let from_email = env::var("FROM_EMAIL").unwrap_or_else(|_| smtp_user.clone());

        let config = Self {
            supabase_url: env_or_empty("SUPABASE_URL").trim().to_string(),
            supabase_service_key: env_or_empty("SUPABASE_SERVICE_KEY").trim().to_string(),
            supabase_table: env::var("SUPABASE_TABLE")
                .unwrap_or_else(|_| "appointments".to_string()),

            site_slug: env::var("SITE_SLUG").unwrap_or_else(|_| "hairdaze".to_string()),
            salon_name: env::var("SALON_NAME").unwrap_or_else(|_| "HairDaze".to_string()),
            salon_address: env::var("SALON_ADDRESS")
                .unwrap_or_else(|_| "414 E Walnut St, North Wales, PA 19454".to_string()),
            business_timezone,
            hours_spec: env::var("HOURS").ok().filter(|v| !v.trim().is_empty()),

            session_secret: env::var("SESSION_SECRET").unwrap_or_else(|_| {
                warn!("SESSION_SECRET not set, generating an ephemeral secret");
                generate_secret()
            }),
            admin_email: env_or_empty("ADMIN_EMAIL").trim().to_lowercase(),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_default(),

            smtp_host: env_or_empty("SMTP_HOST"),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(587),
            smtp_user,
            smtp_pass: env::var("SMTP_PASS").unwrap_or_default(),
            from_email,
            email_enabled: env_flag("EMAIL_ENABLED", true),
            send_customer_notifications: env_flag("SEND_CUSTOMER_NOTIFICATIONS", true),

            reminders_enabled: env_flag("ENABLE_REMINDERS", true),
            reminder_hour: env::var("REMINDER_HOUR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(18),
            reminder_minute: env::var("REMINDER_MINUTE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5002),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        self.supabase_url.starts_with("https://")
            && self.supabase_url.contains(".supabase.co")
            && self.supabase_service_key.len() > 40
    }

    pub fn is_email_configured(&self) -> bool {
        self.email_enabled
            && !self.smtp_host.is_empty()
            && !self.smtp_user.is_empty()
            && !self.smtp_pass.is_empty()
            && !self.from_email.is_empty()
    }

    pub fn has_env_admin(&self) -> bool {
        !self.admin_email.is_empty() && !self.admin_password.is_empty()
    }
}

fn generate_secret() -> String {
    use rand::Rng;
    let bytes: [u8; 32] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
