// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded entity database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `members`, `communications`, `communication_types`, `global_statuses`,
//!   `users`: id → serialized row (JSON bytes)
//! - `status_history`: composite key (communication_id, history_id) → row
//! - `member_codes`, `status_codes`, `type_codes`: unique code → id
//! - `sequences`: entity name → last issued id

use std::path::Path;

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadTransaction, TableDefinition, WriteTransaction,
};
use serde::{de::DeserializeOwned, Serialize};

// =============================================================================
// Table Definitions
// =============================================================================

pub(crate) const MEMBERS: TableDefinition<u64, &[u8]> = TableDefinition::new("members");

pub(crate) const COMMUNICATIONS: TableDefinition<u64, &[u8]> =
    TableDefinition::new("communications");

pub(crate) const COMMUNICATION_TYPES: TableDefinition<u64, &[u8]> =
    TableDefinition::new("communication_types");

pub(crate) const GLOBAL_STATUSES: TableDefinition<u64, &[u8]> =
    TableDefinition::new("global_statuses");

pub(crate) const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

/// Key format: `(communication_id, history_id)` so one communication's
/// history is a contiguous, insertion-ordered range.
pub(crate) const STATUS_HISTORY: TableDefinition<(u64, u64), &[u8]> =
    TableDefinition::new("status_history");

pub(crate) const MEMBER_CODES: TableDefinition<&str, u64> = TableDefinition::new("member_codes");

pub(crate) const STATUS_CODES: TableDefinition<&str, u64> = TableDefinition::new("status_codes");

pub(crate) const TYPE_CODES: TableDefinition<&str, u64> = TableDefinition::new("type_codes");

const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("duplicate {kind}: {code}")]
    Duplicate { kind: &'static str, code: String },
}

pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Sequence names
// =============================================================================

pub(crate) const SEQ_MEMBER: &str = "member";
pub(crate) const SEQ_COMMUNICATION: &str = "communication";
pub(crate) const SEQ_COMMUNICATION_TYPE: &str = "communication_type";
pub(crate) const SEQ_GLOBAL_STATUS: &str = "global_status";
pub(crate) const SEQ_USER: &str = "user";
pub(crate) const SEQ_STATUS_HISTORY: &str = "status_history";

// =============================================================================
// CommexDatabase
// =============================================================================

/// Embedded ACID entity database.
pub struct CommexDatabase {
    db: Database,
}

impl CommexDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(MEMBERS)?;
            let _ = write_txn.open_table(COMMUNICATIONS)?;
            let _ = write_txn.open_table(COMMUNICATION_TYPES)?;
            let _ = write_txn.open_table(GLOBAL_STATUSES)?;
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(STATUS_HISTORY)?;
            let _ = write_txn.open_table(MEMBER_CODES)?;
            let _ = write_txn.open_table(STATUS_CODES)?;
            let _ = write_txn.open_table(TYPE_CODES)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        tracing::debug!(path = %path.display(), "Opened entity database");
        Ok(Self { db })
    }

    pub(crate) fn read(&self) -> DbResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    pub(crate) fn write(&self) -> DbResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Cheap round-trip used by readiness probes.
    pub fn health_check(&self) -> DbResult<()> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SEQUENCES)?;
        let _ = table.get(SEQ_COMMUNICATION)?;
        Ok(())
    }
}

// =============================================================================
// Row Helpers
// =============================================================================

/// Issue the next id for an entity. Must not be called while the
/// `sequences` table is already open in `txn`.
pub(crate) fn next_id(txn: &WriteTransaction, sequence: &str) -> DbResult<u64> {
    let mut table = txn.open_table(SEQUENCES)?;
    let next = table.get(sequence)?.map(|v| v.value()).unwrap_or(0) + 1;
    table.insert(sequence, next)?;
    Ok(next)
}

/// Read and decode a single row.
pub(crate) fn read_row<T, R>(table: &R, id: u64) -> DbResult<Option<T>>
where
    T: DeserializeOwned,
    R: ReadableTable<u64, &'static [u8]>,
{
    match table.get(id)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}

/// Decode every row of a table in id order.
pub(crate) fn scan_rows<T, R>(table: &R) -> DbResult<Vec<T>>
where
    T: DeserializeOwned,
    R: ReadableTable<u64, &'static [u8]>,
{
    let mut rows = Vec::new();
    for entry in table.iter()? {
        let (_, value) = entry?;
        rows.push(serde_json::from_slice(value.value())?);
    }
    Ok(rows)
}

/// Encode a row for insertion.
pub(crate) fn encode_row<T: Serialize>(row: &T) -> DbResult<Vec<u8>> {
    Ok(serde_json::to_vec(row)?)
}

/// Look up the id registered for a unique code.
pub(crate) fn code_lookup<R>(table: &R, code: &str) -> DbResult<Option<u64>>
where
    R: ReadableTable<&'static str, u64>,
{
    Ok(table.get(code)?.map(|v| v.value()))
}

// =============================================================================
// Tests
// =============================================================================
