//! API token model for authentication.
//!
//! Bearer tokens are stored in the database as SHA-256 hashes.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Represents a row of the `api_tokens` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiToken {
    pub id: Uuid,

    /// User every request made with this token acts as
    pub user_id: Uuid,

    /// SHA-256 hash of the token (64 hex characters)
    pub token_hash: String,

    pub created_at: DateTime<Utc>,

    /// Inactive tokens are rejected; this revokes access without deleting the row.
    pub is_active: bool,
}
