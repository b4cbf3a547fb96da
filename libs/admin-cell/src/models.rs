use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Row shape of the `admins` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

/// Console listing filters: `view=today|all`, `status=scheduled|all`.
#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    pub view: Option<String>,
    pub status: Option<String>,
}
