pub mod models;
pub mod services;

pub use models::BookingEmailContext;
pub use services::mailer::Mailer;
pub use services::reminder::{ReminderScheduler, ReminderService};
