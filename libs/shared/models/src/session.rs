use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the session cookie set on admin login.
pub const SESSION_COOKIE: &str = "salon_session";

/// Header carrying the CSRF token on admin mutations.
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Claims carried by the signed session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Admin id; nil uuid for the env-configured admin.
    pub sub: Uuid,
    pub email: String,
    /// Random per-session token, echoed back in [`CSRF_HEADER`].
    pub csrf: String,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated admin, inserted into request extensions by the
/// session middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    pub csrf: String,
}

impl From<SessionClaims> for AdminUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            csrf: claims.csrf,
        }
    }
}
