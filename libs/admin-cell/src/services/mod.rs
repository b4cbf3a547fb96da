pub mod accounts;
pub mod rate_limit;

pub use accounts::AdminAccountService;
pub use rate_limit::LoginRateLimiter;
