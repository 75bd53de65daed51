//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Validates input and runs the database query
//! 3. Returns an HTTP response (JSON, status code)

/// Service health endpoint
pub mod health;
/// Key assignment CRUD endpoints
pub mod key_assignments;
