// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Default catalog installed on first start.
//!
//! Seeding is idempotent: entries whose code already exists (active or
//! soft-deleted) are left untouched, so an operator's edits survive restarts.

use std::collections::BTreeSet;

use super::database::{CommexDatabase, DbResult};
use super::repository::{
    CommunicationTypeRepository, GlobalStatusRepository, NewCommunicationType, NewGlobalStatus,
    StatusPhase, UserRepository, DEFAULT_STATUS_CODE,
};

/// Email of the account used for system-originated changes.
pub const SYSTEM_USER_EMAIL: &str = "system@commex.local";

const DEFAULT_STATUSES: &[(&str, &str, &str, StatusPhase)] = &[
    ("Created", "Created", "Communication record created", StatusPhase::Creation),
    (
        DEFAULT_STATUS_CODE,
        "Ready for Release",
        "Ready to be released to production",
        StatusPhase::Creation,
    ),
    ("Released", "Released", "Released to the print vendor", StatusPhase::Production),
    ("Printed", "Printed", "Document printed", StatusPhase::Production),
    ("Inserted", "Inserted", "Inserted into the envelope", StatusPhase::Production),
    ("Mailed", "Mailed", "Handed to the carrier", StatusPhase::Logistics),
    ("InTransit", "In Transit", "In transit to the member", StatusPhase::Logistics),
    ("Delivered", "Delivered", "Delivered to the member", StatusPhase::Terminal),
    ("Returned", "Returned", "Returned as undeliverable", StatusPhase::Terminal),
    ("Cancelled", "Cancelled", "Withdrawn before delivery", StatusPhase::Terminal),
];

const DEFAULT_TYPES: &[(&str, &str, &str)] = &[
    ("EOB", "Explanation of Benefits", "EOB documents"),
    ("ID_CARD", "Member ID Card", "Member identification cards"),
];

/// What a seeding run inserted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub statuses: usize,
    pub types: usize,
    pub users: usize,
}

/// Install the default statuses, communication types and system user.
pub fn seed_catalog(db: &CommexDatabase) -> DbResult<SeedReport> {
    let mut report = SeedReport::default();

    let statuses = GlobalStatusRepository::new(db);
    for (code, display_name, description, phase) in DEFAULT_STATUSES {
        if statuses.code_exists(code)? {
            continue;
        }
        statuses.create(NewGlobalStatus {
            status_code: code.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            phase: *phase,
        })?;
        report.statuses += 1;
    }

    // Every seeded type is associated with the whole active catalog.
    let status_ids: BTreeSet<u64> = statuses.get_all()?.into_iter().map(|s| s.id).collect();
    let types = CommunicationTypeRepository::new(db);
    for (code, display_name, description) in DEFAULT_TYPES {
        if types.get_by_type_code(code)?.is_some() {
            continue;
        }
        let created = types.create(NewCommunicationType {
            type_code: code.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            status_ids: status_ids.clone(),
        });
        match created {
            Ok(_) => report.types += 1,
            // Soft-deleted type still holding the code
            Err(super::DbError::Duplicate { .. }) => continue,
            Err(e) => return Err(e),
        }
    }

    let users = UserRepository::new(db);
    if users.get_by_email(SYSTEM_USER_EMAIL)?.is_none() {
        users.create(SYSTEM_USER_EMAIL, "System", "User")?;
        report.users += 1;
    }

    tracing::info!(
        statuses = report.statuses,
        types = report.types,
        users = report.users,
        "Catalog seed complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::tests::temp_db;

    #[test]
    fn seed_installs_default_catalog() {
        let (db, _dir) = temp_db();
        let report = seed_catalog(&db).unwrap();

        assert_eq!(report.statuses, DEFAULT_STATUSES.len());
        assert_eq!(report.types, DEFAULT_TYPES.len());
        assert_eq!(report.users, 1);

        let ready = GlobalStatusRepository::new(&db)
            .get_by_status_code(DEFAULT_STATUS_CODE)
            .unwrap()
            .unwrap();
        let eob = CommunicationTypeRepository::new(&db)
            .get_by_type_code("EOB")
            .unwrap()
            .unwrap();
        assert!(eob.status_ids.contains(&ready.id));
    }

    #[test]
    fn seed_is_idempotent() {
        let (db, _dir) = temp_db();
        seed_catalog(&db).unwrap();
        let second = seed_catalog(&db).unwrap();

        assert_eq!(second, SeedReport::default());
        assert_eq!(
            GlobalStatusRepository::new(&db).get_all().unwrap().len(),
            DEFAULT_STATUSES.len()
        );
    }

    #[test]
    fn seed_does_not_resurrect_deleted_status() {
        let (db, _dir) = temp_db();
        seed_catalog(&db).unwrap();

        let repo = GlobalStatusRepository::new(&db);
        let cancelled = repo.get_by_status_code("Cancelled").unwrap().unwrap();
        repo.delete(cancelled.id).unwrap();

        seed_catalog(&db).unwrap();
        assert!(repo.get_by_status_code("Cancelled").unwrap().is_none());
    }
}
