use serde::{Deserialize, Serialize};

/// Everything an email body needs to know about a booking. Cells hand
/// this over instead of their own row types so notifications stay
/// decoupled from the booking schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingEmailContext {
    pub name: String,
    pub email: Option<String>,
    pub service: String,
    /// ISO date, "YYYY-MM-DD".
    pub date: String,
    /// Display time, "9:00 AM".
    pub time: String,
}

impl BookingEmailContext {
    /// Recipient address, if the customer left one.
    pub fn recipient(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }

    /// The summary line every transactional email carries.
    pub fn appointment_line(&self) -> String {
        format!("{} at {} — {}", self.date, self.time, self.service)
    }

    pub fn greeting_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "there"
        } else {
            &self.name
        }
    }
}
