// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Global status catalog repository.
//!
//! Statuses are shared by every communication type. Each status code is
//! unique across active and soft-deleted rows; the `status_codes` index maps
//! the code back to the numeric id.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{
    code_lookup, encode_row, next_id, read_row, scan_rows, CommexDatabase, DbError, DbResult,
    GLOBAL_STATUSES, SEQ_GLOBAL_STATUS, STATUS_CODES,
};

/// Status code assigned to new communications when no initial status is given.
pub const DEFAULT_STATUS_CODE: &str = "ReadyForRelease";

/// Coarse lifecycle bucket a status belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum StatusPhase {
    Creation,
    Production,
    Logistics,
    Terminal,
}

impl std::fmt::Display for StatusPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StatusPhase::Creation => "Creation",
            StatusPhase::Production => "Production",
            StatusPhase::Logistics => "Logistics",
            StatusPhase::Terminal => "Terminal",
        };
        f.write_str(name)
    }
}

/// A status in the global catalog.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct GlobalStatus {
    pub id: u64,
    /// Unique, human-readable identifier (e.g. `ReadyForRelease`)
    pub status_code: String,
    pub display_name: String,
    pub description: String,
    pub phase: StatusPhase,
    pub is_active: bool,
}

/// Fields required to insert a status. The id is issued by the repository.
#[derive(Debug, Clone)]
pub struct NewGlobalStatus {
    pub status_code: String,
    pub display_name: String,
    pub description: String,
    pub phase: StatusPhase,
}

/// Repository for the status catalog.
pub struct GlobalStatusRepository<'a> {
    db: &'a CommexDatabase,
}

impl<'a> GlobalStatusRepository<'a> {
    pub fn new(db: &'a CommexDatabase) -> Self {
        Self { db }
    }

    /// All active statuses, in id order.
    pub fn get_all(&self) -> DbResult<Vec<GlobalStatus>> {
        let read_txn = self.db.read()?;
        let table = read_txn.open_table(GLOBAL_STATUSES)?;
        let statuses: Vec<GlobalStatus> = scan_rows(&table)?;
        Ok(statuses.into_iter().filter(|s| s.is_active).collect())
    }

    /// Active statuses in the given phase.
    pub fn get_by_phase(&self, phase: StatusPhase) -> DbResult<Vec<GlobalStatus>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|s| s.phase == phase)
            .collect())
    }

    /// Get an active status by id.
    pub fn get_by_id(&self, id: u64) -> DbResult<Option<GlobalStatus>> {
        let read_txn = self.db.read()?;
        let table = read_txn.open_table(GLOBAL_STATUSES)?;
        let status: Option<GlobalStatus> = read_row(&table, id)?;
        Ok(status.filter(|s| s.is_active))
    }

    /// Get an active status by its unique code.
    pub fn get_by_status_code(&self, status_code: &str) -> DbResult<Option<GlobalStatus>> {
        let read_txn = self.db.read()?;
        let codes = read_txn.open_table(STATUS_CODES)?;
        let Some(id) = code_lookup(&codes, status_code)? else {
            return Ok(None);
        };
        let table = read_txn.open_table(GLOBAL_STATUSES)?;
        let status: Option<GlobalStatus> = read_row(&table, id)?;
        Ok(status.filter(|s| s.is_active))
    }

    /// Whether any row (active or not) already uses this code.
    pub fn code_exists(&self, status_code: &str) -> DbResult<bool> {
        let read_txn = self.db.read()?;
        let codes = read_txn.open_table(STATUS_CODES)?;
        Ok(code_lookup(&codes, status_code)?.is_some())
    }

    /// Insert a new active status.
    ///
    /// Returns `Err(DbError::Duplicate)` if the code is already taken.
    pub fn create(&self, new: NewGlobalStatus) -> DbResult<GlobalStatus> {
        let write_txn = self.db.write()?;
        let status = {
            let mut codes = write_txn.open_table(STATUS_CODES)?;
            if code_lookup(&codes, &new.status_code)?.is_some() {
                return Err(DbError::Duplicate {
                    kind: "status code",
                    code: new.status_code,
                });
            }

            let id = next_id(&write_txn, SEQ_GLOBAL_STATUS)?;
            let status = GlobalStatus {
                id,
                status_code: new.status_code,
                display_name: new.display_name,
                description: new.description,
                phase: new.phase,
                is_active: true,
            };

            let mut table = write_txn.open_table(GLOBAL_STATUSES)?;
            table.insert(id, encode_row(&status)?.as_slice())?;
            codes.insert(status.status_code.as_str(), id)?;
            status
        };
        write_txn.commit()?;
        Ok(status)
    }

    /// Overwrite an existing row, re-indexing its code if it changed.
    ///
    /// Returns `Ok(false)` if no row with that id exists.
    pub fn update(&self, status: &GlobalStatus) -> DbResult<bool> {
        let write_txn = self.db.write()?;
        {
            let mut table = write_txn.open_table(GLOBAL_STATUSES)?;
            let Some(existing) = read_row::<GlobalStatus, _>(&table, status.id)? else {
                return Ok(false);
            };

            if existing.status_code != status.status_code {
                let mut codes = write_txn.open_table(STATUS_CODES)?;
                if code_lookup(&codes, &status.status_code)?.is_some() {
                    return Err(DbError::Duplicate {
                        kind: "status code",
                        code: status.status_code.clone(),
                    });
                }
                codes.remove(existing.status_code.as_str())?;
                codes.insert(status.status_code.as_str(), status.id)?;
            }

            table.insert(status.id, encode_row(status)?.as_slice())?;
        }
        write_txn.commit()?;
        Ok(true)
    }

    /// Soft-delete a status.
    ///
    /// Returns `Ok(true)` if an active row was deactivated; deleting an
    /// unknown or already inactive id is a no-op returning `Ok(false)`.
    pub fn delete(&self, id: u64) -> DbResult<bool> {
        let write_txn = self.db.write()?;
        let deleted = {
            let mut table = write_txn.open_table(GLOBAL_STATUSES)?;
            match read_row::<GlobalStatus, _>(&table, id)? {
                Some(mut status) if status.is_active => {
                    status.is_active = false;
                    table.insert(id, encode_row(&status)?.as_slice())?;
                    true
                }
                _ => false,
            }
        };
        write_txn.commit()?;
        Ok(deleted)
    }
}
