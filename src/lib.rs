//! Key Assignment Service
//!
//! A REST API for tracking physical key assignments to staff members:
//! which key was issued to whom, when, and whether it has been returned.
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: Bearer tokens with SHA-256 hashing
//! - **Format**: JSON requests/responses
//!
//! The binary entry point lives in `main.rs`; the router is built here so
//! integration tests can drive it directly.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use crate::db::DbPool;

/// Build the application router.
///
/// All `/key-assignments` routes sit behind the token authentication
/// middleware; `/health` is public. The database pool is shared with
/// handlers and the middleware via State extraction.
pub fn app(pool: DbPool) -> Router {
    // Create authenticated routes (API endpoints)
    let authenticated_routes = Router::new()
        // Key assignment collection routes
        .route(
            "/key-assignments",
            post(handlers::key_assignments::create_assignment),
        )
        .route(
            "/key-assignments",
            get(handlers::key_assignments::list_assignments),
        )
        // Single-record routes
        .route(
            "/key-assignments/{id}",
            get(handlers::key_assignments::get_assignment),
        )
        .route(
            "/key-assignments/{id}",
            put(handlers::key_assignments::update_assignment),
        )
        .route(
            "/key-assignments/{id}",
            patch(handlers::key_assignments::update_assignment),
        )
        .route(
            "/key-assignments/{id}",
            delete(handlers::key_assignments::delete_assignment),
        )
        // Apply authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            pool.clone(),
            middleware::auth::auth_middleware,
        ));

    // Combine authenticated routes with public routes
    Router::new()
        // Public routes (no authentication required)
        .route("/health", get(handlers::health::health_check))
        // Merge authenticated routes
        .merge(authenticated_routes)
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share database pool with all handlers via State extraction
        .with_state(pool)
}
