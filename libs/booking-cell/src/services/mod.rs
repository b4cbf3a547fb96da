pub mod availability;
pub mod booking;
pub mod schedule;

pub use availability::AvailabilityService;
pub use booking::BookingService;
pub use schedule::BusinessHours;
