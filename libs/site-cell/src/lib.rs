pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::SiteConfig;
pub use router::site_routes;
