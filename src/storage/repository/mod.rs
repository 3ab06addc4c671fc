// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the entity database.
//!
//! Each repository provides CRUD operations for a specific entity type.
//! Default reads are active-only and deletes are soft: a deleted row keeps
//! its data with `is_active = false`.

pub mod communication_types;
pub mod communications;
pub mod global_statuses;
pub mod members;
pub mod users;

pub use communication_types::{
    CommunicationType, CommunicationTypeRepository, NewCommunicationType,
};
pub use communications::{
    Communication, CommunicationFilter, CommunicationRecord, CommunicationRepository,
    CommunicationStatusHistory, NewCommunication, StatusChange, StatusHistoryRecord,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use global_statuses::{
    GlobalStatus, GlobalStatusRepository, NewGlobalStatus, StatusPhase, DEFAULT_STATUS_CODE,
};
pub use members::{Member, MemberRepository, NewMember};
pub use users::{User, UserRepository};
