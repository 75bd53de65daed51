//! Authentication token model.
//!
//! Tokens are issued out of band (by an external provisioning process that
//! inserts rows into `auth_tokens`); this service only verifies them. Raw
//! tokens are never stored, only their SHA-256 hashes.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Represents a bearer token record from the database.
///
/// # Database Table
///
/// Maps to the `auth_tokens` table with columns:
/// - `id`: Unique identifier (UUID)
/// - `token_hash`: SHA-256 hash of the raw token (64 hex characters)
/// - `label`: Human-readable name for the token holder
/// - `created_at`: When the token was provisioned
/// - `is_active`: Whether the token is currently valid
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthToken {
    /// Unique identifier for this token
    pub id: Uuid,

    /// SHA-256 hash of the raw bearer token.
    ///
    /// When a request arrives with "Bearer abc123", the middleware hashes
    /// "abc123" and looks up this column.
    pub token_hash: String,

    /// Human-readable name for whoever holds this token
    pub label: String,

    /// Timestamp when this token was provisioned
    pub created_at: DateTime<Utc>,

    /// Whether this token is currently active.
    ///
    /// Inactive tokens are rejected during authentication, which allows
    /// revoking access without deleting the record.
    pub is_active: bool,
}
