//! Key assignment HTTP handlers.
//!
//! This module implements the key assignment API:
//! - POST /key-assignments - Issue a key (create record)
//! - GET /key-assignments - List all records
//! - GET /key-assignments/:id - Get record by ID
//! - PUT/PATCH /key-assignments/:id - Update mutable fields
//! - DELETE /key-assignments/:id - Remove record permanently
//!
//! All routes sit behind the token authentication middleware. There is no
//! per-caller scoping: any authenticated caller may read or modify any
//! record.

use crate::{
    db::DbPool,
    error::AppError,
    extract::AppJson,
    middleware::auth::AuthContext,
    models::key_assignment::{
        CreateKeyAssignmentRequest, KeyAssignment, UpdateKeyAssignmentRequest,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

/// Issue a key: create a new assignment record.
///
/// # Endpoint
///
/// `POST /key-assignments`
///
/// # Request Body
///
/// ```json
/// {
///   "staff_id": "S1",
///   "key_id": "K42",
///   "status": "Issued"  // optional, defaults to Issued
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: Returns the created record
/// - **Error (400)**: Validation failure (empty/oversized field, bad status)
/// - **Error (401)**: Invalid token
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "staff_id": "S1",
///   "key_id": "K42",
///   "status": "Issued",
///   "issue_time": "2025-06-01T09:00:00Z",
///   "return_time": null
/// }
/// ```
///
/// # Database Operation
///
/// Inserts a new row into `key_assignments`; the database assigns the id
/// and stamps `issue_time` with the current time. `issue_time` is never
/// writable through the API, on create or later.
pub async fn create_assignment(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    AppJson(request): AppJson<CreateKeyAssignmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Field-level validation before any persistence
    let status = request.validate()?;

    let assignment = sqlx::query_as::<_, KeyAssignment>(
        r#"
        INSERT INTO key_assignments (staff_id, key_id, status)
        VALUES ($1, $2, $3)
        RETURNING id, staff_id, key_id, status, issue_time, return_time
        "#,
    )
    .bind(&request.staff_id)
    .bind(&request.key_id)
    .bind(status)
    .fetch_one(&pool)
    .await?;

    tracing::info!(
        token = %auth.label,
        key_id = %assignment.key_id,
        staff_id = %assignment.staff_id,
        "key assignment created"
    );

    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Get a specific key assignment by ID.
///
/// # Endpoint
///
/// `GET /key-assignments/{id}`
///
/// # Response
///
/// - **Success (200 OK)**: Returns the record
/// - **Error (404)**: No record with this identifier
/// - **Error (401)**: Invalid token
pub async fn get_assignment(
    State(pool): State<DbPool>,
    Path(assignment_id): Path<Uuid>,
) -> Result<Json<KeyAssignment>, AppError> {
    let assignment = sqlx::query_as::<_, KeyAssignment>(
        r#"
        SELECT id, staff_id, key_id, status, issue_time, return_time
        FROM key_assignments
        WHERE id = $1
        "#,
    )
    .bind(assignment_id)
    .fetch_optional(&pool)
    .await?
    // Return 404 if not found
    .ok_or(AppError::AssignmentNotFound)?;

    Ok(Json(assignment))
}

/// List all key assignments.
///
/// # Endpoint
///
/// `GET /key-assignments`
///
/// # Response
///
/// - **Success (200 OK)**: Returns array of records (may be empty)
/// - **Error (401)**: Invalid token
///
/// # Ordering
///
/// Records are returned newest first, by `issue_time` with the id as a
/// tiebreaker so the order is stable. No filtering is supported.
pub async fn list_assignments(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<KeyAssignment>>, AppError> {
    let assignments = sqlx::query_as::<_, KeyAssignment>(
        r#"
        SELECT id, staff_id, key_id, status, issue_time, return_time
        FROM key_assignments
        ORDER BY issue_time DESC, id
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(assignments))
}

/// Update a key assignment (full or partial).
///
/// # Endpoint
///
/// `PUT /key-assignments/{id}` or `PATCH /key-assignments/{id}`
///
/// Both methods share this handler and the same semantics: every field in
/// the body is optional, omitted fields keep their stored value.
///
/// # Request Body
///
/// ```json
/// {
///   "status": "Returned",
///   "return_time": "2025-06-01T14:30:00Z"
/// }
/// ```
///
/// Mutable fields: `staff_id`, `key_id`, `status`, `return_time`.
/// `id` and `issue_time` are immutable; values for them in the body are
/// ignored by deserialization.
///
/// # return_time
///
/// Omitting `return_time` keeps the stored value; an explicit `null` clears
/// it. Updating `status` alone never touches `return_time`; the two fields
/// are independent.
///
/// # Response
///
/// - **Success (200 OK)**: Returns the updated record
/// - **Error (400)**: Validation failure
/// - **Error (404)**: No record with this identifier
/// - **Error (401)**: Invalid token
pub async fn update_assignment(
    State(pool): State<DbPool>,
    Path(assignment_id): Path<Uuid>,
    AppJson(request): AppJson<UpdateKeyAssignmentRequest>,
) -> Result<Json<KeyAssignment>, AppError> {
    let status = request.validate()?;

    // COALESCE keeps the stored value for omitted fields. return_time needs
    // the flag/value pair because "explicit null" must overwrite while
    // "absent" must not.
    let set_return_time = request.return_time.is_some();
    let return_time = request.return_time.flatten();

    let assignment = sqlx::query_as::<_, KeyAssignment>(
        r#"
        UPDATE key_assignments
        SET staff_id = COALESCE($2, staff_id),
            key_id = COALESCE($3, key_id),
            status = COALESCE($4, status),
            return_time = CASE WHEN $5 THEN $6 ELSE return_time END
        WHERE id = $1
        RETURNING id, staff_id, key_id, status, issue_time, return_time
        "#,
    )
    .bind(assignment_id)
    .bind(&request.staff_id)
    .bind(&request.key_id)
    .bind(status)
    .bind(set_return_time)
    .bind(return_time)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::AssignmentNotFound)?;

    Ok(Json(assignment))
}

/// Delete a key assignment permanently.
///
/// # Endpoint
///
/// `DELETE /key-assignments/{id}`
///
/// # Response
///
/// - **Success (204 No Content)**: Record removed, empty body
/// - **Error (404)**: No record with this identifier
/// - **Error (401)**: Invalid token
///
/// This is a hard delete. Deleting the same id twice fails with 404 on the
/// second call; the operation is deliberately not idempotent.
pub async fn delete_assignment(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(assignment_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    // RETURNING lets us distinguish "deleted" from "was never there"
    let deleted = sqlx::query_scalar::<_, Uuid>(
        r#"
        DELETE FROM key_assignments
        WHERE id = $1
        RETURNING id
        "#,
    )
    .bind(assignment_id)
    .fetch_optional(&pool)
    .await?;

    match deleted {
        Some(id) => {
            tracing::info!(token = %auth.label, assignment_id = %id, "key assignment deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(AppError::AssignmentNotFound),
    }
}
