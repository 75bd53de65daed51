//! Data models representing database entities.

/// Bearer token authentication model
pub mod auth_token;
/// Key assignment record model and request types
pub mod key_assignment;
