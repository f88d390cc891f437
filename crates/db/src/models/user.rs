//! User account models.

use portal_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    /// Subject issued by the external identity provider.
    pub external_id: String,
    pub email: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a user. `role` defaults to `hacker`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub external_id: String,
    pub email: String,
    pub role: Option<String>,
}
