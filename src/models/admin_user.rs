use serde::{Deserialize, Serialize};

/// A console operator account. Passwords are write-only: they appear in
/// request bodies but never in any response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateAdmin {
    pub username: String,
    pub password: String,
}
