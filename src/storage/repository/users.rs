// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Users referenced as creators and updaters of communications.
//!
//! Users are read-only through the API; rows are inserted by the catalog seed.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{
    encode_row, next_id, read_row, scan_rows, CommexDatabase, DbResult, SEQ_USER, USERS,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

pub struct UserRepository<'a> {
    db: &'a CommexDatabase,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a CommexDatabase) -> Self {
        Self { db }
    }

    pub fn get_all(&self) -> DbResult<Vec<User>> {
        let read_txn = self.db.read()?;
        let table = read_txn.open_table(USERS)?;
        scan_rows(&table)
    }

    pub fn get_by_id(&self, id: u64) -> DbResult<Option<User>> {
        let read_txn = self.db.read()?;
        let table = read_txn.open_table(USERS)?;
        read_row(&table, id)
    }

    pub fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        Ok(self
            .get_all()?
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email)))
    }

    /// Insert a user. Only the catalog seed calls this.
    pub(crate) fn create(&self, email: &str, first_name: &str, last_name: &str) -> DbResult<User> {
        let write_txn = self.db.write()?;
        let user = {
            let id = next_id(&write_txn, SEQ_USER)?;
            let user = User {
                id,
                email: email.to_string(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            };
            let mut table = write_txn.open_table(USERS)?;
            table.insert(id, encode_row(&user)?.as_slice())?;
            user
        };
        write_txn.commit()?;
        Ok(user)
    }
}
