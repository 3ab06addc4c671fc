// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage in an embedded redb database. Rows are JSON encoded
//! and keyed by numeric ids issued from per-entity sequences.
//!
//! ## Storage Layout
//!
//! ```text
//! commex.redb
//!   members / communications / communication_types / global_statuses / users
//!   status_history          (communication_id, history_id) -> entry
//!   member_codes / status_codes / type_codes   unique code -> id
//!   sequences               entity -> last issued id
//! ```
//!
//! ## Important Notes
//!
//! - Every repository call runs in its own redb transaction
//! - Deletes are soft; rows are never purged
//! - Unique codes stay reserved after a soft delete

pub mod database;
pub mod repository;
pub mod seed;

pub use database::{CommexDatabase, DbError, DbResult};
pub use repository::{
    Communication, CommunicationFilter, CommunicationRecord, CommunicationRepository,
    CommunicationStatusHistory, CommunicationType, CommunicationTypeRepository, GlobalStatus,
    GlobalStatusRepository, Member, MemberRepository, NewCommunication, NewCommunicationType,
    NewGlobalStatus, NewMember, StatusChange, StatusHistoryRecord, StatusPhase, User,
    UserRepository, DEFAULT_PAGE_SIZE, DEFAULT_STATUS_CODE, MAX_PAGE_SIZE,
};
pub use seed::{seed_catalog, SeedReport};
