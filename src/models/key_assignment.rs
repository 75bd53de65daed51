//! Key assignment data models and API request types.
//!
//! This module defines:
//! - `KeyAssignment`: Database entity representing one key issued to a staff member
//! - `AssignmentStatus`: The Issued/Returned state of an assignment
//! - `CreateKeyAssignmentRequest` / `UpdateKeyAssignmentRequest`: Request bodies
//!
//! Validation lives here, on the request types, and runs at the API boundary
//! before anything touches the database.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Maximum accepted length for `staff_id` and `key_id`, matching the
/// VARCHAR(100) columns in the schema.
pub const MAX_IDENTIFIER_LEN: usize = 100;

/// Status of a key assignment.
///
/// Stored in PostgreSQL as the `assignment_status` enum type. New records
/// default to `Issued`.
///
/// Note that status carries no automatic linkage to `return_time`: marking
/// an assignment `Returned` does not populate the timestamp, and setting the
/// timestamp does not flip the status. Callers manage both fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "assignment_status")]
pub enum AssignmentStatus {
    Issued,
    Returned,
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentStatus::Issued => write!(f, "Issued"),
            AssignmentStatus::Returned => write!(f, "Returned"),
        }
    }
}

impl FromStr for AssignmentStatus {
    type Err = String;

    /// Parse a status string from a request body.
    ///
    /// Parsing is done by hand rather than through serde so that an unknown
    /// value surfaces as a field-level validation error (HTTP 400) instead
    /// of a generic body rejection.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Issued" => Ok(AssignmentStatus::Issued),
            "Returned" => Ok(AssignmentStatus::Returned),
            other => Err(format!(
                "status must be one of \"Issued\", \"Returned\", got \"{}\"",
                other
            )),
        }
    }
}

/// Represents a key assignment record from the database.
///
/// # Database Table
///
/// Maps to the `key_assignments` table. `staff_id` and `key_id` are free
/// text with no referential integrity; staff and keys are not modeled as
/// entities of their own.
///
/// The full record is returned to API clients as-is (there are no internal
/// fields to strip), so this struct doubles as the response body.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct KeyAssignment {
    /// Unique identifier, assigned by the database at creation. Immutable.
    pub id: Uuid,

    /// Free-text identifier of the staff member holding the key
    pub staff_id: String,

    /// Free-text identifier of the physical key
    pub key_id: String,

    /// Current status (`Issued` or `Returned`)
    pub status: AssignmentStatus,

    /// Timestamp stamped by the server when the record was created.
    /// Never mutated afterwards.
    pub issue_time: DateTime<Utc>,

    /// When the key was handed back, if a caller has recorded it.
    ///
    /// Independent of `status`; either can be set without the other.
    pub return_time: Option<DateTime<Utc>>,
}

/// Request body for creating a key assignment (issuing a key).
///
/// # JSON Example
///
/// ```json
/// {
///   "staff_id": "S1",
///   "key_id": "K42",
///   "status": "Issued"
/// }
/// ```
///
/// # Validation
///
/// - `staff_id`: Required, non-empty, at most 100 characters
/// - `key_id`: Required, non-empty, at most 100 characters
/// - `status`: Optional, defaults to "Issued" when omitted
#[derive(Debug, Deserialize)]
pub struct CreateKeyAssignmentRequest {
    /// Staff member receiving the key
    pub staff_id: String,

    /// Key being issued
    pub key_id: String,

    /// Initial status, as a string (defaults to Issued)
    pub status: Option<String>,
}

impl CreateKeyAssignmentRequest {
    /// Validate the request and resolve the initial status.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if an identifier is empty or too long,
    /// or if `status` is not a recognized value.
    pub fn validate(&self) -> Result<AssignmentStatus, AppError> {
        validate_identifier("staff_id", &self.staff_id)?;
        validate_identifier("key_id", &self.key_id)?;

        match &self.status {
            Some(raw) => raw.parse().map_err(AppError::Validation),
            None => Ok(AssignmentStatus::Issued),
        }
    }
}

/// Request body for updating a key assignment.
///
/// Works for both PUT and PATCH: every field is optional and omitted fields
/// are left unchanged. `issue_time` and `id` are not mutable and therefore
/// not present here.
///
/// # JSON Example
///
/// ```json
/// {
///   "status": "Returned",
///   "return_time": "2025-06-01T14:30:00Z"
/// }
/// ```
///
/// # return_time semantics
///
/// `return_time` distinguishes three cases:
/// - field absent: keep the stored value
/// - `"return_time": null`: clear the stored value
/// - `"return_time": "<timestamp>"`: set the stored value
///
/// The double `Option` plus custom deserializer captures absent-vs-null,
/// which plain `Option<DateTime>` cannot express.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateKeyAssignmentRequest {
    /// New staff member identifier, if changing
    pub staff_id: Option<String>,

    /// New key identifier, if changing
    pub key_id: Option<String>,

    /// New status, as a string, if changing
    pub status: Option<String>,

    /// New return time: absent = unchanged, null = clear, value = set
    #[serde(default, deserialize_with = "double_option")]
    pub return_time: Option<Option<DateTime<Utc>>>,
}

/// Deserialize a field into `Some(inner)` whenever the field is present,
/// so `#[serde(default)]` (None) marks only truly absent fields.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<DateTime<Utc>>::deserialize(deserializer).map(Some)
}

impl UpdateKeyAssignmentRequest {
    /// Validate whichever fields are present and parse the status if given.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` on an empty/oversized identifier or an
    /// unknown status value.
    pub fn validate(&self) -> Result<Option<AssignmentStatus>, AppError> {
        if let Some(staff_id) = &self.staff_id {
            validate_identifier("staff_id", staff_id)?;
        }
        if let Some(key_id) = &self.key_id {
            validate_identifier("key_id", key_id)?;
        }

        match &self.status {
            Some(raw) => raw.parse().map(Some).map_err(AppError::Validation),
            None => Ok(None),
        }
    }
}

/// Check that a free-text identifier is non-empty and fits the column.
fn validate_identifier(field: &str, value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    if value.chars().count() > MAX_IDENTIFIER_LEN {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, MAX_IDENTIFIER_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_request(body: serde_json::Value) -> CreateKeyAssignmentRequest {
        serde_json::from_value(body).unwrap()
    }

    fn update_request(body: serde_json::Value) -> UpdateKeyAssignmentRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn create_without_status_defaults_to_issued() {
        let request = create_request(json!({"staff_id": "S1", "key_id": "K42"}));
        assert_eq!(request.validate().unwrap(), AssignmentStatus::Issued);
    }

    #[test]
    fn create_accepts_explicit_returned_status() {
        let request = create_request(json!({
            "staff_id": "S1",
            "key_id": "K42",
            "status": "Returned"
        }));
        assert_eq!(request.validate().unwrap(), AssignmentStatus::Returned);
    }

    #[test]
    fn create_rejects_unknown_status() {
        let request = create_request(json!({
            "staff_id": "S1",
            "key_id": "K42",
            "status": "Lost"
        }));
        assert!(matches!(
            request.validate(),
            Err(AppError::Validation(msg)) if msg.contains("Lost")
        ));
    }

    #[test]
    fn create_rejects_empty_staff_id() {
        let request = create_request(json!({"staff_id": "", "key_id": "K42"}));
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn identifier_at_limit_passes_and_over_limit_fails() {
        let at_limit = "x".repeat(MAX_IDENTIFIER_LEN);
        let over_limit = "x".repeat(MAX_IDENTIFIER_LEN + 1);

        let request = create_request(json!({"staff_id": at_limit, "key_id": "K42"}));
        assert!(request.validate().is_ok());

        let request = create_request(json!({"staff_id": over_limit, "key_id": "K42"}));
        assert!(matches!(
            request.validate(),
            Err(AppError::Validation(msg)) if msg.contains("staff_id")
        ));
    }

    #[test]
    fn duplicate_issuance_is_not_rejected_at_this_layer() {
        // There is deliberately no rule preventing two Issued assignments
        // for the same key_id; the service records whatever callers submit.
        // This test pins that absence down rather than guaranteeing it as
        // a feature.
        let first = create_request(json!({"staff_id": "S1", "key_id": "K42"}));
        let second = create_request(json!({"staff_id": "S2", "key_id": "K42"}));
        assert!(first.validate().is_ok());
        assert!(second.validate().is_ok());
    }

    #[test]
    fn update_with_no_fields_is_valid_and_changes_nothing() {
        let request = update_request(json!({}));
        assert!(request.staff_id.is_none());
        assert!(request.return_time.is_none());
        assert_eq!(request.validate().unwrap(), None);
    }

    #[test]
    fn update_status_only_leaves_return_time_untouched() {
        // Status and return_time are independent; updating one must not
        // imply anything about the other.
        let request = update_request(json!({"status": "Returned"}));
        assert_eq!(request.validate().unwrap(), Some(AssignmentStatus::Returned));
        assert!(request.return_time.is_none());
    }

    #[test]
    fn update_distinguishes_null_return_time_from_absent() {
        let absent = update_request(json!({"status": "Issued"}));
        assert_eq!(absent.return_time, None);

        let cleared = update_request(json!({"return_time": null}));
        assert_eq!(cleared.return_time, Some(None));

        let set = update_request(json!({"return_time": "2025-06-01T14:30:00Z"}));
        let inner = set.return_time.unwrap().unwrap();
        assert_eq!(inner.to_rfc3339(), "2025-06-01T14:30:00+00:00");
    }

    #[test]
    fn update_rejects_unknown_status() {
        let request = update_request(json!({"status": "Misplaced"}));
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn assignment_serializes_with_null_return_time() {
        let assignment = KeyAssignment {
            id: Uuid::nil(),
            staff_id: "S1".to_string(),
            key_id: "K42".to_string(),
            status: AssignmentStatus::Issued,
            issue_time: "2025-06-01T09:00:00Z".parse().unwrap(),
            return_time: None,
        };

        let value = serde_json::to_value(&assignment).unwrap();
        assert_eq!(value["staff_id"], "S1");
        assert_eq!(value["key_id"], "K42");
        assert_eq!(value["status"], "Issued");
        assert_eq!(value["return_time"], serde_json::Value::Null);
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [AssignmentStatus::Issued, AssignmentStatus::Returned] {
            let parsed: AssignmentStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }
}
