//! Bearer token authentication middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the bearer token from the Authorization header
//! 2. Hash it and verify it exists in the token store
//! 3. Inject authentication context into the request
//! 4. Reject unauthenticated requests with HTTP 401 before any handler runs
//!
//! Authorization stops at "is this token valid": every authenticated caller
//! may act on every record, there is no per-caller scoping.

use crate::{db::DbPool, error::AppError, models::auth_token::AuthToken};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Authentication context attached to authenticated requests.
///
/// Inserted into the request's extension map; handlers extract it with
/// `Extension<AuthContext>` to know which token made the request (used for
/// logging only).
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// ID of the authenticated token
    pub token_id: Uuid,

    /// Human-readable label of the token holder
    pub label: String,
}

/// Bearer token authentication middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <token>` header from request
/// 2. Hash `<token>` using SHA-256
/// 3. Query `auth_tokens` for a matching hash where `is_active = true`
/// 4. If found: inject `AuthContext` into request, call next handler
/// 5. If not found: return 401 Unauthorized
///
/// A missing header, a malformed header, an unknown token, and a revoked
/// token all produce the same 401, so callers cannot enumerate which
/// tokens exist.
pub async fn auth_middleware(
    State(pool): State<DbPool>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extract Authorization header
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::InvalidToken)?;

    // Expected format: "Bearer <token>"
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::InvalidToken)?;

    // Hash the raw token; only hashes are stored
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());

    let token_hash = hex::encode(hasher.finalize());

    // Lookup hashed token in the store
    let token_record = sqlx::query_as::<_, AuthToken>(
        "SELECT id, token_hash, label, created_at, is_active
         FROM auth_tokens
         WHERE token_hash = $1 AND is_active = true",
    )
    .bind(&token_hash)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::InvalidToken)?;

    let auth_context = AuthContext {
        token_id: token_record.id,
        label: token_record.label,
    };

    // Handlers can now extract this with Extension<AuthContext>
    request.extensions_mut().insert(auth_context);

    Ok(next.run(request).await)
}
