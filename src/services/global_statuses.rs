// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Status catalog service.

use tracing::info;

use super::{patch_required, require, ServiceError, ServiceResult};
use crate::models::{CreateGlobalStatusRequest, GlobalStatusResponse, UpdateGlobalStatusRequest};
use crate::storage::{CommexDatabase, GlobalStatusRepository, NewGlobalStatus, StatusPhase};

pub struct GlobalStatusService<'a> {
    statuses: GlobalStatusRepository<'a>,
}

impl<'a> GlobalStatusService<'a> {
    pub fn new(db: &'a CommexDatabase) -> Self {
        Self {
            statuses: GlobalStatusRepository::new(db),
        }
    }

    /// Active statuses, optionally restricted to one phase.
    pub fn get_all(&self, phase: Option<StatusPhase>) -> ServiceResult<Vec<GlobalStatusResponse>> {
        let statuses = match phase {
            Some(phase) => self.statuses.get_by_phase(phase)?,
            None => self.statuses.get_all()?,
        };
        Ok(statuses.into_iter().map(Into::into).collect())
    }

    pub fn get_by_id(&self, id: u64) -> ServiceResult<Option<GlobalStatusResponse>> {
        Ok(self.statuses.get_by_id(id)?.map(Into::into))
    }

    pub fn get_by_status_code(&self, code: &str) -> ServiceResult<Option<GlobalStatusResponse>> {
        Ok(self.statuses.get_by_status_code(code)?.map(Into::into))
    }

    pub fn create(&self, request: CreateGlobalStatusRequest) -> ServiceResult<GlobalStatusResponse> {
        require("Status code", &request.status_code)?;
        require("Display name", &request.display_name)?;

        if self.statuses.code_exists(&request.status_code)? {
            return Err(ServiceError::Conflict(format!(
                "Status code already exists: {}",
                request.status_code
            )));
        }

        let status = self.statuses.create(NewGlobalStatus {
            status_code: request.status_code,
            display_name: request.display_name,
            description: request.description,
            phase: request.phase,
        })?;

        info!(status_id = status.id, status_code = %status.status_code, "Created status");
        Ok(status.into())
    }

    /// Apply a partial update. `Ok(false)` if the status is absent.
    pub fn update(&self, id: u64, patch: UpdateGlobalStatusRequest) -> ServiceResult<bool> {
        let Some(mut status) = self.statuses.get_by_id(id)? else {
            return Ok(false);
        };

        patch_required(&mut status.status_code, "Status code", patch.status_code)?;
        patch_required(&mut status.display_name, "Display name", patch.display_name)?;
        if let Some(description) = patch.description {
            status.description = description;
        }
        if let Some(phase) = patch.phase {
            status.phase = phase;
        }

        let updated = self.statuses.update(&status)?;
        if updated {
            info!(status_id = id, "Updated status");
        }
        Ok(updated)
    }

    pub fn delete(&self, id: u64) -> ServiceResult<bool> {
        let deleted = self.statuses.delete(id)?;
        if deleted {
            info!(status_id = id, "Deleted status");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::tests::temp_db;

    fn request(code: &str, phase: StatusPhase) -> CreateGlobalStatusRequest {
        CreateGlobalStatusRequest {
            status_code: code.to_string(),
            display_name: code.to_string(),
            description: String::new(),
            phase,
        }
    }

    #[test]
    fn duplicate_code_is_a_conflict() {
        let (db, _dir) = temp_db();
        let service = GlobalStatusService::new(&db);

        service
            .create(request("Printed", StatusPhase::Production))
            .unwrap();
        let err = service
            .create(request("Printed", StatusPhase::Production))
            .unwrap_err();

        match err {
            ServiceError::Conflict(message) => {
                assert!(message.contains("Status code already exists"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn renaming_onto_taken_code_is_a_conflict() {
        let (db, _dir) = temp_db();
        let service = GlobalStatusService::new(&db);

        service.create(request("Printed", StatusPhase::Production)).unwrap();
        let mailed = service.create(request("Mailed", StatusPhase::Logistics)).unwrap();

        let err = service
            .update(
                mailed.id,
                UpdateGlobalStatusRequest {
                    status_code: Some("Printed".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn blank_code_is_rejected() {
        let (db, _dir) = temp_db();
        let service = GlobalStatusService::new(&db);
        let err = service.create(request(" ", StatusPhase::Creation)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn filter_by_phase() {
        let (db, _dir) = temp_db();
        let service = GlobalStatusService::new(&db);
        service.create(request("Created", StatusPhase::Creation)).unwrap();
        service.create(request("Printed", StatusPhase::Production)).unwrap();
        service.create(request("Inserted", StatusPhase::Production)).unwrap();

        let production = service.get_all(Some(StatusPhase::Production)).unwrap();
        assert_eq!(production.len(), 2);
        assert_eq!(service.get_all(None).unwrap().len(), 3);
    }

    #[test]
    fn patch_changes_only_provided_fields() {
        let (db, _dir) = temp_db();
        let service = GlobalStatusService::new(&db);
        let created = service.create(request("Printed", StatusPhase::Production)).unwrap();

        let updated = service
            .update(
                created.id,
                UpdateGlobalStatusRequest {
                    display_name: Some("Printed and Checked".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(updated);

        let loaded = service.get_by_id(created.id).unwrap().unwrap();
        assert_eq!(loaded.display_name, "Printed and Checked");
        assert_eq!(loaded.status_code, "Printed");
        assert_eq!(loaded.phase, StatusPhase::Production);
    }

    #[test]
    fn update_and_delete_of_unknown_id_return_false() {
        let (db, _dir) = temp_db();
        let service = GlobalStatusService::new(&db);
        assert!(!service.update(999, UpdateGlobalStatusRequest::default()).unwrap());
        assert!(!service.delete(999).unwrap());
    }
}
