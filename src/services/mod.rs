// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Service layer.
//!
//! Services orchestrate repositories, validate references and uniqueness,
//! and map stored entities to response DTOs. Absent primary entities are
//! reported as `Option`/`bool`; everything else that can go wrong is a
//! [`ServiceError`].

pub mod communication_types;
pub mod communications;
pub mod global_statuses;
pub mod members;

pub use communication_types::CommunicationTypeService;
pub use communications::CommunicationService;
pub use global_statuses::GlobalStatusService;
pub use members::MemberService;

use crate::storage::DbError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Request content is invalid.
    #[error("{0}")]
    Validation(String),

    /// A unique code is already taken.
    #[error("{0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(#[source] DbError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Duplicate { kind, code } => {
                ServiceError::Conflict(format!("{} already exists: {code}", capitalize(kind)))
            }
            other => ServiceError::Storage(other),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Reject empty or whitespace-only required fields.
pub(crate) fn require(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Apply a patch value, validating it as a required field.
pub(crate) fn patch_required(
    target: &mut String,
    field: &str,
    value: Option<String>,
) -> ServiceResult<()> {
    if let Some(value) = value {
        require(field, &value)?;
        *target = value;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_maps_to_conflict_with_readable_message() {
        let err: ServiceError = DbError::Duplicate {
            kind: "status code",
            code: "Printed".into(),
        }
        .into();
        match err {
            ServiceError::Conflict(message) => {
                assert_eq!(message, "Status code already exists: Printed")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn other_db_errors_are_storage() {
        let err: ServiceError = DbError::NotFound("Communication 1".into()).into();
        assert!(matches!(err, ServiceError::Storage(_)));
    }

    #[test]
    fn require_rejects_blank() {
        assert!(require("Title", "  ").is_err());
        assert!(require("Title", "EOB").is_ok());
    }

    #[test]
    fn patch_required_leaves_target_on_none() {
        let mut title = "Original".to_string();
        patch_required(&mut title, "Title", None).unwrap();
        assert_eq!(title, "Original");

        patch_required(&mut title, "Title", Some("New".into())).unwrap();
        assert_eq!(title, "New");

        assert!(patch_required(&mut title, "Title", Some(String::new())).is_err());
        assert_eq!(title, "New");
    }
}
