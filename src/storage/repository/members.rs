// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Member repository.
//!
//! Members are the recipients of communications. Unlike the other
//! entities, lookups by id also return soft-deleted members so existing
//! communications keep resolving their recipient.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{
    code_lookup, encode_row, next_id, read_row, scan_rows, CommexDatabase, DbError, DbResult,
    MEMBERS, MEMBER_CODES, SEQ_MEMBER,
};

/// A plan member.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Member {
    pub id: u64,
    /// External member identifier (unique)
    pub member_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub created_utc: DateTime<Utc>,
    pub last_updated_utc: DateTime<Utc>,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone)]
pub struct NewMember {
    pub member_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

pub struct MemberRepository<'a> {
    db: &'a CommexDatabase,
}

impl<'a> MemberRepository<'a> {
    pub fn new(db: &'a CommexDatabase) -> Self {
        Self { db }
    }

    /// Active members ordered by last name, then first name.
    pub fn get_all(&self) -> DbResult<Vec<Member>> {
        Ok(self
            .get_all_including_inactive()?
            .into_iter()
            .filter(|m| m.is_active)
            .collect())
    }

    /// Every member, soft-deleted ones included, ordered by last name
    /// ignoring case.
    pub fn get_all_including_inactive(&self) -> DbResult<Vec<Member>> {
        let read_txn = self.db.read()?;
        let table = read_txn.open_table(MEMBERS)?;
        let mut members: Vec<Member> = scan_rows(&table)?;
        members.sort_by_cached_key(|m| (m.last_name.to_lowercase(), m.first_name.to_lowercase()));
        Ok(members)
    }

    /// Get a member by id, regardless of active flag.
    pub fn get_by_id(&self, id: u64) -> DbResult<Option<Member>> {
        let read_txn = self.db.read()?;
        let table = read_txn.open_table(MEMBERS)?;
        read_row(&table, id)
    }

    /// Get a member by external member code, regardless of active flag.
    pub fn get_by_member_code(&self, member_code: &str) -> DbResult<Option<Member>> {
        let read_txn = self.db.read()?;
        let codes = read_txn.open_table(MEMBER_CODES)?;
        let Some(id) = code_lookup(&codes, member_code)? else {
            return Ok(None);
        };
        let table = read_txn.open_table(MEMBERS)?;
        read_row(&table, id)
    }

    /// Insert a new active member, stamping both timestamps.
    pub fn create(&self, new: NewMember) -> DbResult<Member> {
        let write_txn = self.db.write()?;
        let member = {
            let mut codes = write_txn.open_table(MEMBER_CODES)?;
            if code_lookup(&codes, &new.member_code)?.is_some() {
                return Err(DbError::Duplicate {
                    kind: "member code",
                    code: new.member_code,
                });
            }

            let id = next_id(&write_txn, SEQ_MEMBER)?;
            let now = Utc::now();
            let member = Member {
                id,
                member_code: new.member_code,
                first_name: new.first_name,
                last_name: new.last_name,
                email: new.email,
                phone_number: new.phone_number,
                is_active: true,
                created_utc: now,
                last_updated_utc: now,
            };

            let mut table = write_txn.open_table(MEMBERS)?;
            table.insert(id, encode_row(&member)?.as_slice())?;
            codes.insert(member.member_code.as_str(), id)?;
            member
        };
        write_txn.commit()?;
        Ok(member)
    }

    /// Overwrite an existing member and stamp `last_updated_utc`.
    ///
    /// Returns `Ok(false)` if the id is unknown.
    pub fn update(&self, member: &mut Member) -> DbResult<bool> {
        let write_txn = self.db.write()?;
        {
            let mut table = write_txn.open_table(MEMBERS)?;
            let Some(existing) = read_row::<Member, _>(&table, member.id)? else {
                return Ok(false);
            };

            if existing.member_code != member.member_code {
                let mut codes = write_txn.open_table(MEMBER_CODES)?;
                if code_lookup(&codes, &member.member_code)?.is_some() {
                    return Err(DbError::Duplicate {
                        kind: "member code",
                        code: member.member_code.clone(),
                    });
                }
                codes.remove(existing.member_code.as_str())?;
                codes.insert(member.member_code.as_str(), member.id)?;
            }

            member.last_updated_utc = Utc::now();
            table.insert(member.id, encode_row(&*member)?.as_slice())?;
        }
        write_txn.commit()?;
        Ok(true)
    }

    /// Soft-delete; `Ok(false)` when the id is unknown or already inactive.
    pub fn delete(&self, id: u64) -> DbResult<bool> {
        let write_txn = self.db.write()?;
        let deleted = {
            let mut table = write_txn.open_table(MEMBERS)?;
            match read_row::<Member, _>(&table, id)? {
                Some(mut member) if member.is_active => {
                    member.is_active = false;
                    member.last_updated_utc = Utc::now();
                    table.insert(id, encode_row(&member)?.as_slice())?;
                    true
                }
                _ => false,
            }
        };
        write_txn.commit()?;
        Ok(deleted)
    }
}
