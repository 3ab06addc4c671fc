// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Communication repository.
//!
//! Communications reference a member, a type, a current status and
//! optionally the user who created them. Reads return
//! [`CommunicationRecord`] values with those references already resolved:
//! the related rows are fetched in one batch inside the same read
//! transaction, so a record is a consistent snapshot.
//!
//! Status changes are appended to `status_history` under the composite key
//! `(communication_id, history_id)`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use redb::{ReadTransaction, ReadableTable};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{
    encode_row, next_id, read_row, scan_rows, CommexDatabase, DbError, DbResult, COMMUNICATIONS,
    COMMUNICATION_TYPES, GLOBAL_STATUSES, MEMBERS, SEQ_COMMUNICATION, SEQ_STATUS_HISTORY,
    STATUS_HISTORY, USERS,
};
use super::{CommunicationType, GlobalStatus, Member, User};

/// A tracked member communication.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Communication {
    pub id: u64,
    pub title: String,
    pub member_id: u64,
    pub communication_type_id: u64,
    pub current_status_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_by_user_id: Option<u64>,
    /// Soft-delete flag
    pub is_active: bool,
    pub created_utc: DateTime<Utc>,
    pub last_updated_utc: DateTime<Utc>,
}

/// One entry of a communication's status history.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CommunicationStatusHistory {
    pub id: u64,
    pub communication_id: u64,
    pub status_id: u64,
    /// Status code at the time of the change
    pub status_code: String,
    pub occurred_utc: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by_user_id: Option<u64>,
}

/// A status change to append to the history.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub status_id: u64,
    pub status_code: String,
    pub notes: Option<String>,
    pub event_source: Option<String>,
    pub updated_by_user_id: Option<u64>,
}

impl StatusChange {
    pub fn new(status: &GlobalStatus, event_source: &str) -> Self {
        Self {
            status_id: status.id,
            status_code: status.status_code.clone(),
            notes: None,
            event_source: Some(event_source.to_string()),
            updated_by_user_id: None,
        }
    }

    pub fn by_user(mut self, user_id: Option<u64>) -> Self {
        self.updated_by_user_id = user_id;
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }
}

#[derive(Debug, Clone)]
pub struct NewCommunication {
    pub title: String,
    pub member_id: u64,
    pub communication_type_id: u64,
    pub current_status_id: u64,
    pub source_file_url: Option<String>,
    pub created_by_user_id: Option<u64>,
}

/// A history entry together with the user who made the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusHistoryRecord {
    pub entry: CommunicationStatusHistory,
    pub updated_by: Option<User>,
}

/// A communication with its references resolved.
///
/// A reference is `None` only if the row it points to has been removed
/// from the store outside of this service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunicationRecord {
    pub communication: Communication,
    pub member: Option<Member>,
    pub communication_type: Option<CommunicationType>,
    pub current_status: Option<GlobalStatus>,
    pub created_by: Option<User>,
    /// Populated by single-record reads only.
    pub status_history: Vec<StatusHistoryRecord>,
}

/// Page size used when only `page` is given.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Largest accepted `page_size`.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Optional narrowing of a communication listing.
///
/// Paging applies only when `page` or `page_size` is set; pages are
/// 1-based and taken after filtering, in id order.
#[derive(Debug, Clone, Default)]
pub struct CommunicationFilter {
    pub status_id: Option<u64>,
    pub type_id: Option<u64>,
    pub member_id: Option<u64>,
    /// Case-insensitive substring of the title
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl CommunicationFilter {
    /// `(skip, take)` for the requested page, `None` when unpaged.
    pub fn window(&self) -> Option<(usize, usize)> {
        if self.page.is_none() && self.page_size.is_none() {
            return None;
        }
        let page = self.page.unwrap_or(1).max(1) as usize;
        let size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE) as usize;
        Some((page.saturating_sub(1).saturating_mul(size), size))
    }

    fn matches(&self, communication: &Communication) -> bool {
        if self.status_id.is_some_and(|id| id != communication.current_status_id) {
            return false;
        }
        if self.type_id.is_some_and(|id| id != communication.communication_type_id) {
            return false;
        }
        if self.member_id.is_some_and(|id| id != communication.member_id) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => communication
                .title
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        }
    }
}

pub struct CommunicationRepository<'a> {
    db: &'a CommexDatabase,
}

impl<'a> CommunicationRepository<'a> {
    pub fn new(db: &'a CommexDatabase) -> Self {
        Self { db }
    }

    /// All active communications with references attached.
    pub fn get_all(&self) -> DbResult<Vec<CommunicationRecord>> {
        self.get_filtered(&CommunicationFilter::default())
    }

    /// Active communications matching `filter`, in id order.
    pub fn get_filtered(&self, filter: &CommunicationFilter) -> DbResult<Vec<CommunicationRecord>> {
        let read_txn = self.db.read()?;
        let table = read_txn.open_table(COMMUNICATIONS)?;
        let communications: Vec<Communication> = scan_rows(&table)?;
        let matching = communications
            .into_iter()
            .filter(|c| c.is_active && filter.matches(c));
        let selected: Vec<Communication> = match filter.window() {
            Some((skip, take)) => matching.skip(skip).take(take).collect(),
            None => matching.collect(),
        };
        attach_related(&read_txn, selected)
    }

    pub fn get_by_status(&self, status_id: u64) -> DbResult<Vec<CommunicationRecord>> {
        self.get_filtered(&CommunicationFilter {
            status_id: Some(status_id),
            ..Default::default()
        })
    }

    pub fn get_by_type(&self, type_id: u64) -> DbResult<Vec<CommunicationRecord>> {
        self.get_filtered(&CommunicationFilter {
            type_id: Some(type_id),
            ..Default::default()
        })
    }

    /// Number of active communications addressed to a member.
    pub fn count_active_for_member(&self, member_id: u64) -> DbResult<usize> {
        let read_txn = self.db.read()?;
        let table = read_txn.open_table(COMMUNICATIONS)?;
        let communications: Vec<Communication> = scan_rows(&table)?;
        Ok(communications
            .iter()
            .filter(|c| c.is_active && c.member_id == member_id)
            .count())
    }

    /// Active communication counts keyed by member id, from one snapshot.
    /// Members without active communications are absent.
    pub fn count_active_by_member(&self) -> DbResult<HashMap<u64, usize>> {
        let read_txn = self.db.read()?;
        let table = read_txn.open_table(COMMUNICATIONS)?;
        let communications: Vec<Communication> = scan_rows(&table)?;
        let mut counts = HashMap::new();
        for communication in communications.iter().filter(|c| c.is_active) {
            *counts.entry(communication.member_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Get an active communication with references and status history.
    pub fn get_by_id(&self, id: u64) -> DbResult<Option<CommunicationRecord>> {
        let read_txn = self.db.read()?;
        let table = read_txn.open_table(COMMUNICATIONS)?;
        let Some(communication) = read_row::<Communication, _>(&table, id)? else {
            return Ok(None);
        };
        if !communication.is_active {
            return Ok(None);
        }

        let mut records = attach_related(&read_txn, vec![communication])?;
        let Some(mut record) = records.pop() else {
            return Ok(None);
        };
        record.status_history = load_history(&read_txn, id)?;
        Ok(Some(record))
    }

    /// Status history of a communication, oldest first.
    pub fn get_history(&self, id: u64) -> DbResult<Vec<StatusHistoryRecord>> {
        let read_txn = self.db.read()?;
        load_history(&read_txn, id)
    }

    /// Insert a new active communication and its first history entry.
    ///
    /// Stamps `created_utc` and `last_updated_utc`.
    pub fn create(
        &self,
        new: NewCommunication,
        initial: StatusChange,
    ) -> DbResult<CommunicationRecord> {
        let write_txn = self.db.write()?;
        let id = {
            let id = next_id(&write_txn, SEQ_COMMUNICATION)?;
            let now = Utc::now();
            let communication = Communication {
                id,
                title: new.title,
                member_id: new.member_id,
                communication_type_id: new.communication_type_id,
                current_status_id: new.current_status_id,
                source_file_url: new.source_file_url,
                created_by_user_id: new.created_by_user_id,
                last_updated_by_user_id: new.created_by_user_id,
                is_active: true,
                created_utc: now,
                last_updated_utc: now,
            };

            let mut table = write_txn.open_table(COMMUNICATIONS)?;
            table.insert(id, encode_row(&communication)?.as_slice())?;
            append_history(&write_txn, id, initial, now)?;
            id
        };
        write_txn.commit()?;

        tracing::debug!(communication_id = id, "Stored communication");
        self.get_by_id(id)?
            .ok_or_else(|| DbError::NotFound(format!("Communication {id}")))
    }

    /// Overwrite an existing communication and stamp `last_updated_utc`.
    ///
    /// Returns `Ok(false)` if the id is unknown.
    pub fn update(&self, communication: &mut Communication) -> DbResult<bool> {
        self.write_communication(communication, None)
    }

    /// Overwrite a communication and append a history entry atomically.
    pub fn update_with_history(
        &self,
        communication: &mut Communication,
        change: StatusChange,
    ) -> DbResult<bool> {
        self.write_communication(communication, Some(change))
    }

    fn write_communication(
        &self,
        communication: &mut Communication,
        change: Option<StatusChange>,
    ) -> DbResult<bool> {
        let write_txn = self.db.write()?;
        {
            let mut table = write_txn.open_table(COMMUNICATIONS)?;
            if table.get(communication.id)?.is_none() {
                return Ok(false);
            }

            let now = Utc::now();
            communication.last_updated_utc = now;
            table.insert(communication.id, encode_row(&*communication)?.as_slice())?;

            if let Some(change) = change {
                append_history(&write_txn, communication.id, change, now)?;
            }
        }
        write_txn.commit()?;
        Ok(true)
    }

    /// Soft-delete a communication.
    ///
    /// Returns `Ok(true)` if an active row was deactivated. Unknown or
    /// already deleted ids are a no-op returning `Ok(false)`.
    pub fn delete(&self, id: u64) -> DbResult<bool> {
        let write_txn = self.db.write()?;
        let deleted = {
            let mut table = write_txn.open_table(COMMUNICATIONS)?;
            match read_row::<Communication, _>(&table, id)? {
                Some(mut communication) if communication.is_active => {
                    communication.is_active = false;
                    communication.last_updated_utc = Utc::now();
                    table.insert(id, encode_row(&communication)?.as_slice())?;
                    true
                }
                _ => false,
            }
        };
        write_txn.commit()?;
        Ok(deleted)
    }
}

// =============================================================================
// Joins
// =============================================================================

fn load_many<T, R>(table: &R, ids: impl IntoIterator<Item = u64>) -> DbResult<HashMap<u64, T>>
where
    T: DeserializeOwned,
    R: ReadableTable<u64, &'static [u8]>,
{
    let mut rows = HashMap::new();
    for id in ids {
        if rows.contains_key(&id) {
            continue;
        }
        if let Some(row) = read_row(table, id)? {
            rows.insert(id, row);
        }
    }
    Ok(rows)
}

fn attach_related(
    read_txn: &ReadTransaction,
    communications: Vec<Communication>,
) -> DbResult<Vec<CommunicationRecord>> {
    let members: HashMap<u64, Member> = load_many(
        &read_txn.open_table(MEMBERS)?,
        communications.iter().map(|c| c.member_id),
    )?;
    let types: HashMap<u64, CommunicationType> = load_many(
        &read_txn.open_table(COMMUNICATION_TYPES)?,
        communications.iter().map(|c| c.communication_type_id),
    )?;
    let statuses: HashMap<u64, GlobalStatus> = load_many(
        &read_txn.open_table(GLOBAL_STATUSES)?,
        communications.iter().map(|c| c.current_status_id),
    )?;
    let users: HashMap<u64, User> = load_many(
        &read_txn.open_table(USERS)?,
        communications.iter().filter_map(|c| c.created_by_user_id),
    )?;

    Ok(communications
        .into_iter()
        .map(|communication| CommunicationRecord {
            member: members.get(&communication.member_id).cloned(),
            communication_type: types.get(&communication.communication_type_id).cloned(),
            current_status: statuses.get(&communication.current_status_id).cloned(),
            created_by: communication
                .created_by_user_id
                .and_then(|id| users.get(&id).cloned()),
            communication,
            status_history: Vec::new(),
        })
        .collect())
}

fn load_history(read_txn: &ReadTransaction, communication_id: u64) -> DbResult<Vec<StatusHistoryRecord>> {
    let table = read_txn.open_table(STATUS_HISTORY)?;
    let mut entries: Vec<CommunicationStatusHistory> = Vec::new();
    for entry in table.range((communication_id, 0)..=(communication_id, u64::MAX))? {
        let (_, value) = entry?;
        entries.push(serde_json::from_slice(value.value())?);
    }

    let users: HashMap<u64, User> = load_many(
        &read_txn.open_table(USERS)?,
        entries.iter().filter_map(|e| e.updated_by_user_id),
    )?;

    Ok(entries
        .into_iter()
        .map(|entry| StatusHistoryRecord {
            updated_by: entry.updated_by_user_id.and_then(|id| users.get(&id).cloned()),
            entry,
        })
        .collect())
}

fn append_history(
    write_txn: &redb::WriteTransaction,
    communication_id: u64,
    change: StatusChange,
    occurred_utc: DateTime<Utc>,
) -> DbResult<()> {
    let id = next_id(write_txn, SEQ_STATUS_HISTORY)?;
    let entry = CommunicationStatusHistory {
        id,
        communication_id,
        status_id: change.status_id,
        status_code: change.status_code,
        occurred_utc,
        notes: change.notes,
        event_source: change.event_source,
        updated_by_user_id: change.updated_by_user_id,
    };
    let mut table = write_txn.open_table(STATUS_HISTORY)?;
    table.insert((communication_id, id), encode_row(&entry)?.as_slice())?;
    Ok(())
}
