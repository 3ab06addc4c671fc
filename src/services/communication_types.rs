// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Communication type service.

use std::collections::BTreeSet;

use tracing::info;

use super::{patch_required, require, ServiceError, ServiceResult};
use crate::models::{
    CommunicationTypeResponse, CommunicationTypeStatusResponse, CreateCommunicationTypeRequest,
    UpdateCommunicationTypeRequest,
};
use crate::storage::{
    CommexDatabase, CommunicationTypeRepository, GlobalStatusRepository, NewCommunicationType,
};

pub struct CommunicationTypeService<'a> {
    types: CommunicationTypeRepository<'a>,
    statuses: GlobalStatusRepository<'a>,
}

impl<'a> CommunicationTypeService<'a> {
    pub fn new(db: &'a CommexDatabase) -> Self {
        Self {
            types: CommunicationTypeRepository::new(db),
            statuses: GlobalStatusRepository::new(db),
        }
    }

    pub fn get_all(&self) -> ServiceResult<Vec<CommunicationTypeResponse>> {
        Ok(self.types.get_all()?.into_iter().map(Into::into).collect())
    }

    pub fn get_by_id(&self, id: u64) -> ServiceResult<Option<CommunicationTypeResponse>> {
        Ok(self.types.get_by_id(id)?.map(Into::into))
    }

    pub fn get_by_type_code(&self, code: &str) -> ServiceResult<Option<CommunicationTypeResponse>> {
        Ok(self.types.get_by_type_code(code)?.map(Into::into))
    }

    /// Active statuses associated with a type. `None` if the type is absent.
    pub fn get_statuses(&self, id: u64) -> ServiceResult<Option<Vec<CommunicationTypeStatusResponse>>> {
        let Some(comm_type) = self.types.get_by_id(id)? else {
            return Ok(None);
        };

        let mut statuses = Vec::with_capacity(comm_type.status_ids.len());
        for status_id in &comm_type.status_ids {
            // Statuses deleted after assignment are skipped
            if let Some(status) = self.statuses.get_by_id(*status_id)? {
                statuses.push(status.into());
            }
        }
        Ok(Some(statuses))
    }

    pub fn create(
        &self,
        request: CreateCommunicationTypeRequest,
    ) -> ServiceResult<CommunicationTypeResponse> {
        require("Type code", &request.type_code)?;
        require("Display name", &request.display_name)?;
        let status_ids = self.validate_status_ids(request.status_ids)?;

        let comm_type = self.types.create(NewCommunicationType {
            type_code: request.type_code,
            display_name: request.display_name,
            description: request.description,
            status_ids,
        })?;

        info!(type_id = comm_type.id, type_code = %comm_type.type_code, "Created communication type");
        Ok(comm_type.into())
    }

    /// Apply a partial update. `Ok(false)` if the type is absent.
    pub fn update(&self, id: u64, patch: UpdateCommunicationTypeRequest) -> ServiceResult<bool> {
        let Some(mut comm_type) = self.types.get_by_id(id)? else {
            return Ok(false);
        };

        patch_required(&mut comm_type.type_code, "Type code", patch.type_code)?;
        patch_required(&mut comm_type.display_name, "Display name", patch.display_name)?;
        if let Some(description) = patch.description {
            comm_type.description = description;
        }
        if let Some(is_active) = patch.is_active {
            comm_type.is_active = is_active;
        }
        if let Some(status_ids) = patch.status_ids {
            comm_type.status_ids = self.validate_status_ids(status_ids)?;
        }

        let updated = self.types.update(&comm_type)?;
        if updated {
            info!(type_id = id, "Updated communication type");
        }
        Ok(updated)
    }

    pub fn delete(&self, id: u64) -> ServiceResult<bool> {
        let deleted = self.types.delete(id)?;
        if deleted {
            info!(type_id = id, "Deleted communication type");
        }
        Ok(deleted)
    }

    fn validate_status_ids(&self, ids: Vec<u64>) -> ServiceResult<BTreeSet<u64>> {
        let ids: BTreeSet<u64> = ids.into_iter().collect();
        let mut unknown = Vec::new();
        for id in &ids {
            if self.statuses.get_by_id(*id)?.is_none() {
                unknown.push(id.to_string());
            }
        }
        if !unknown.is_empty() {
            return Err(ServiceError::Validation(format!(
                "Unknown status IDs: {}",
                unknown.join(", ")
            )));
        }
        Ok(ids)
    }
}
