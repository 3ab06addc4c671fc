// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response data structures used by the REST API. All types
//! derive `Serialize`/`Deserialize` and `ToSchema` for JSON handling and
//! OpenAPI documentation.
//!
//! Update requests are patches: every field is optional and a `None` leaves
//! the stored value untouched.
//!
//! ## Model Categories
//!
//! - **Communications**: tracked member communications and their history
//! - **Global Statuses**: the shared lifecycle status catalog
//! - **Communication Types**: kinds of communication and their statuses
//! - **Members**: communication recipients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::{
    CommunicationRecord, CommunicationType, GlobalStatus, Member, StatusHistoryRecord, StatusPhase,
};

// =============================================================================
// Communication Models
// =============================================================================

/// A communication with its references resolved to display values.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CommunicationResponse {
    pub id: u64,
    pub title: String,
    pub communication_type_id: u64,
    /// Code of the communication type (e.g. `EOB`).
    pub type_code: String,
    pub current_status_id: u64,
    /// Code of the current status (e.g. `ReadyForRelease`).
    pub current_status: String,
    pub member_id: u64,
    /// Full name of the member.
    pub member_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file_url: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub last_updated_utc: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_user_name: Option<String>,
    /// Status changes, oldest first. Only filled for single-record reads.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status_history: Vec<StatusHistoryResponse>,
}

impl From<CommunicationRecord> for CommunicationResponse {
    fn from(record: CommunicationRecord) -> Self {
        let CommunicationRecord {
            communication,
            member,
            communication_type,
            current_status,
            created_by,
            status_history,
        } = record;

        Self {
            id: communication.id,
            title: communication.title,
            communication_type_id: communication.communication_type_id,
            type_code: communication_type.map(|t| t.type_code).unwrap_or_default(),
            current_status_id: communication.current_status_id,
            current_status: current_status.map(|s| s.status_code).unwrap_or_default(),
            member_id: communication.member_id,
            member_name: member.map(|m| m.full_name()).unwrap_or_default(),
            source_file_url: communication.source_file_url,
            created_utc: communication.created_utc,
            last_updated_utc: communication.last_updated_utc,
            created_by_user_name: created_by.map(|u| u.display_name()),
            status_history: status_history.into_iter().map(Into::into).collect(),
        }
    }
}

/// One status change of a communication.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StatusHistoryResponse {
    pub id: u64,
    pub communication_id: u64,
    pub status_id: u64,
    pub status_code: String,
    pub occurred_utc: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Where the change came from (`create`, `update`, `api`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by_user_name: Option<String>,
}

impl From<StatusHistoryRecord> for StatusHistoryResponse {
    fn from(record: StatusHistoryRecord) -> Self {
        let entry = record.entry;
        Self {
            id: entry.id,
            communication_id: entry.communication_id,
            status_id: entry.status_id,
            status_code: entry.status_code,
            occurred_utc: entry.occurred_utc,
            notes: entry.notes,
            event_source: entry.event_source,
            updated_by_user_name: record.updated_by.map(|u| u.display_name()),
        }
    }
}

/// Request to create a communication.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCommunicationRequest {
    pub communication_type_id: u64,
    /// Every communication is addressed to a member.
    pub member_id: u64,
    pub title: String,
    #[serde(default)]
    pub source_file_url: Option<String>,
    /// Defaults to the `ReadyForRelease` status when omitted.
    #[serde(default)]
    pub initial_status_id: Option<u64>,
    #[serde(default)]
    pub created_by_user_id: Option<u64>,
}

/// Partial update of a communication.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateCommunicationRequest {
    pub title: Option<String>,
    pub member_id: Option<u64>,
    pub communication_type_id: Option<u64>,
    pub source_file_url: Option<String>,
    /// A changed status is recorded in the status history.
    pub current_status_id: Option<u64>,
    pub updated_by_user_id: Option<u64>,
}

/// Request to move a communication to another status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status_id: u64,
    #[serde(default)]
    pub updated_by_user_id: Option<u64>,
    #[serde(default)]
    pub notes: Option<String>,
}

// =============================================================================
// Global Status Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct GlobalStatusResponse {
    pub id: u64,
    pub status_code: String,
    pub display_name: String,
    pub description: String,
    pub phase: StatusPhase,
    pub is_active: bool,
}

impl From<GlobalStatus> for GlobalStatusResponse {
    fn from(status: GlobalStatus) -> Self {
        Self {
            id: status.id,
            status_code: status.status_code,
            display_name: status.display_name,
            description: status.description,
            phase: status.phase,
            is_active: status.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateGlobalStatusRequest {
    /// Unique code, e.g. `Printed`.
    pub status_code: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub phase: StatusPhase,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateGlobalStatusRequest {
    pub status_code: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub phase: Option<StatusPhase>,
}

// =============================================================================
// Communication Type Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CommunicationTypeResponse {
    pub id: u64,
    pub type_code: String,
    pub display_name: String,
    pub description: String,
    pub is_active: bool,
    /// Statuses associated with this type.
    pub assigned_status_ids: Vec<u64>,
}

impl From<CommunicationType> for CommunicationTypeResponse {
    fn from(comm_type: CommunicationType) -> Self {
        Self {
            id: comm_type.id,
            type_code: comm_type.type_code,
            display_name: comm_type.display_name,
            description: comm_type.description,
            is_active: comm_type.is_active,
            assigned_status_ids: comm_type.status_ids.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCommunicationTypeRequest {
    pub type_code: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    /// Must reference active statuses.
    #[serde(default)]
    pub status_ids: Vec<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateCommunicationTypeRequest {
    pub type_code: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    /// Replaces the whole status set when present.
    pub status_ids: Option<Vec<u64>>,
}

/// A status permitted for a communication type.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CommunicationTypeStatusResponse {
    pub status_id: u64,
    pub status_code: String,
    pub display_name: String,
    pub description: String,
    pub phase: StatusPhase,
}

impl From<GlobalStatus> for CommunicationTypeStatusResponse {
    fn from(status: GlobalStatus) -> Self {
        Self {
            status_id: status.id,
            status_code: status.status_code,
            display_name: status.display_name,
            description: status.description,
            phase: status.phase,
        }
    }
}

// =============================================================================
// Member Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MemberResponse {
    pub id: u64,
    /// External member identifier.
    pub member_code: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub created_utc: DateTime<Utc>,
    pub last_updated_utc: DateTime<Utc>,
    /// Number of active communications addressed to this member.
    pub communication_count: usize,
}

impl MemberResponse {
    pub fn new(member: Member, communication_count: usize) -> Self {
        Self {
            full_name: member.full_name(),
            id: member.id,
            member_code: member.member_code,
            first_name: member.first_name,
            last_name: member.last_name,
            email: member.email,
            phone_number: member.phone_number,
            is_active: member.is_active,
            created_utc: member.created_utc,
            last_updated_utc: member.last_updated_utc,
            communication_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateMemberRequest {
    pub member_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateMemberRequest {
    pub member_code: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Communication, User};

    fn record() -> CommunicationRecord {
        let now = Utc::now();
        CommunicationRecord {
            communication: Communication {
                id: 1,
                title: "Test EOB".into(),
                member_id: 100,
                communication_type_id: 1,
                current_status_id: 2,
                source_file_url: None,
                created_by_user_id: Some(1),
                last_updated_by_user_id: Some(1),
                is_active: true,
                created_utc: now,
                last_updated_utc: now,
            },
            member: Some(Member {
                id: 100,
                member_code: "M12345".into(),
                first_name: "John".into(),
                last_name: "Doe".into(),
                email: "john@example.com".into(),
                phone_number: None,
                is_active: true,
                created_utc: now,
                last_updated_utc: now,
            }),
            communication_type: Some(CommunicationType {
                id: 1,
                type_code: "EOB".into(),
                display_name: "Explanation of Benefits".into(),
                description: String::new(),
                is_active: true,
                status_ids: Default::default(),
            }),
            current_status: Some(GlobalStatus {
                id: 2,
                status_code: "ReadyForRelease".into(),
                display_name: "Ready for Release".into(),
                description: String::new(),
                phase: StatusPhase::Creation,
                is_active: true,
            }),
            created_by: Some(User {
                id: 1,
                email: "admin@example.com".into(),
                first_name: "Admin".into(),
                last_name: "User".into(),
            }),
            status_history: Vec::new(),
        }
    }

    #[test]
    fn communication_response_resolves_display_values() {
        let response = CommunicationResponse::from(record());
        assert_eq!(response.type_code, "EOB");
        assert_eq!(response.current_status, "ReadyForRelease");
        assert_eq!(response.member_name, "John Doe");
        assert_eq!(response.created_by_user_name.as_deref(), Some("Admin User"));
    }

    #[test]
    fn missing_references_map_to_empty_values() {
        let mut record = record();
        record.member = None;
        record.created_by = None;

        let response = CommunicationResponse::from(record);
        assert_eq!(response.member_name, "");
        assert!(response.created_by_user_name.is_none());
    }

    #[test]
    fn update_request_fields_default_to_none() {
        let patch: UpdateCommunicationRequest = serde_json::from_str(r#"{"title":"New"}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("New"));
        assert!(patch.member_id.is_none());
        assert!(patch.current_status_id.is_none());
    }
}
