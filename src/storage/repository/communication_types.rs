// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Communication type repository.
//!
//! A type (EOB, ID card, ...) carries the set of global statuses that are
//! meaningful for it. The set is informational: status assignment on a
//! communication is not restricted by it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{
    code_lookup, encode_row, next_id, read_row, scan_rows, CommexDatabase, DbError, DbResult,
    COMMUNICATION_TYPES, SEQ_COMMUNICATION_TYPE, TYPE_CODES,
};

/// A kind of member communication.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CommunicationType {
    pub id: u64,
    /// Unique, human-readable identifier (e.g. `EOB`)
    pub type_code: String,
    pub display_name: String,
    pub description: String,
    pub is_active: bool,
    /// Ids of the global statuses associated with this type
    pub status_ids: BTreeSet<u64>,
}

#[derive(Debug, Clone)]
pub struct NewCommunicationType {
    pub type_code: String,
    pub display_name: String,
    pub description: String,
    pub status_ids: BTreeSet<u64>,
}

pub struct CommunicationTypeRepository<'a> {
    db: &'a CommexDatabase,
}

impl<'a> CommunicationTypeRepository<'a> {
    pub fn new(db: &'a CommexDatabase) -> Self {
        Self { db }
    }

    /// All active types, in id order.
    pub fn get_all(&self) -> DbResult<Vec<CommunicationType>> {
        let read_txn = self.db.read()?;
        let table = read_txn.open_table(COMMUNICATION_TYPES)?;
        let types: Vec<CommunicationType> = scan_rows(&table)?;
        Ok(types.into_iter().filter(|t| t.is_active).collect())
    }

    pub fn get_by_id(&self, id: u64) -> DbResult<Option<CommunicationType>> {
        let read_txn = self.db.read()?;
        let table = read_txn.open_table(COMMUNICATION_TYPES)?;
        let comm_type: Option<CommunicationType> = read_row(&table, id)?;
        Ok(comm_type.filter(|t| t.is_active))
    }

    pub fn get_by_type_code(&self, type_code: &str) -> DbResult<Option<CommunicationType>> {
        let read_txn = self.db.read()?;
        let codes = read_txn.open_table(TYPE_CODES)?;
        let Some(id) = code_lookup(&codes, type_code)? else {
            return Ok(None);
        };
        let table = read_txn.open_table(COMMUNICATION_TYPES)?;
        let comm_type: Option<CommunicationType> = read_row(&table, id)?;
        Ok(comm_type.filter(|t| t.is_active))
    }

    /// Insert a new active type. Fails with `DbError::Duplicate` on a taken code.
    pub fn create(&self, new: NewCommunicationType) -> DbResult<CommunicationType> {
        let write_txn = self.db.write()?;
        let comm_type = {
            let mut codes = write_txn.open_table(TYPE_CODES)?;
            if code_lookup(&codes, &new.type_code)?.is_some() {
                return Err(DbError::Duplicate {
                    kind: "type code",
                    code: new.type_code,
                });
            }

            let id = next_id(&write_txn, SEQ_COMMUNICATION_TYPE)?;
            let comm_type = CommunicationType {
                id,
                type_code: new.type_code,
                display_name: new.display_name,
                description: new.description,
                is_active: true,
                status_ids: new.status_ids,
            };

            let mut table = write_txn.open_table(COMMUNICATION_TYPES)?;
            table.insert(id, encode_row(&comm_type)?.as_slice())?;
            codes.insert(comm_type.type_code.as_str(), id)?;
            comm_type
        };
        write_txn.commit()?;
        Ok(comm_type)
    }

    /// Overwrite an existing row. Returns `Ok(false)` if the id is unknown.
    pub fn update(&self, comm_type: &CommunicationType) -> DbResult<bool> {
        let write_txn = self.db.write()?;
        {
            let mut table = write_txn.open_table(COMMUNICATION_TYPES)?;
            let Some(existing) = read_row::<CommunicationType, _>(&table, comm_type.id)? else {
                return Ok(false);
            };

            if existing.type_code != comm_type.type_code {
                let mut codes = write_txn.open_table(TYPE_CODES)?;
                if code_lookup(&codes, &comm_type.type_code)?.is_some() {
                    return Err(DbError::Duplicate {
                        kind: "type code",
                        code: comm_type.type_code.clone(),
                    });
                }
                codes.remove(existing.type_code.as_str())?;
                codes.insert(comm_type.type_code.as_str(), comm_type.id)?;
            }

            table.insert(comm_type.id, encode_row(comm_type)?.as_slice())?;
        }
        write_txn.commit()?;
        Ok(true)
    }

    /// Soft-delete; `Ok(false)` when the id is unknown or already inactive.
    pub fn delete(&self, id: u64) -> DbResult<bool> {
        let write_txn = self.db.write()?;
        let deleted = {
            let mut table = write_txn.open_table(COMMUNICATION_TYPES)?;
            match read_row::<CommunicationType, _>(&table, id)? {
                Some(mut comm_type) if comm_type.is_active => {
                    comm_type.is_active = false;
                    table.insert(id, encode_row(&comm_type)?.as_slice())?;
                    true
                }
                _ => false,
            }
        };
        write_txn.commit()?;
        Ok(deleted)
    }
}
