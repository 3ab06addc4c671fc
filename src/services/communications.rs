// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Communication service.
//!
//! Resolves and validates the member, type and status a communication
//! points at, picks the default status for new communications and keeps
//! the status history in step with `current_status_id`.

use tracing::{debug, info};

use super::{patch_required, require, ServiceError, ServiceResult};
use crate::models::{
    CommunicationResponse, CreateCommunicationRequest, StatusHistoryResponse,
    UpdateCommunicationRequest,
};
use crate::storage::{
    CommexDatabase, CommunicationFilter, CommunicationRepository, CommunicationTypeRepository,
    GlobalStatus, GlobalStatusRepository, MemberRepository, NewCommunication, StatusChange,
    UserRepository, DEFAULT_STATUS_CODE, MAX_PAGE_SIZE,
};

const SOURCE_CREATE: &str = "create";
const SOURCE_UPDATE: &str = "update";
const SOURCE_API: &str = "api";

pub struct CommunicationService<'a> {
    communications: CommunicationRepository<'a>,
    members: MemberRepository<'a>,
    types: CommunicationTypeRepository<'a>,
    statuses: GlobalStatusRepository<'a>,
    users: UserRepository<'a>,
}

impl<'a> CommunicationService<'a> {
    pub fn new(db: &'a CommexDatabase) -> Self {
        Self {
            communications: CommunicationRepository::new(db),
            members: MemberRepository::new(db),
            types: CommunicationTypeRepository::new(db),
            statuses: GlobalStatusRepository::new(db),
            users: UserRepository::new(db),
        }
    }

    /// Active communications matching `filter`. An empty filter lists all.
    pub fn get_all(&self, filter: &CommunicationFilter) -> ServiceResult<Vec<CommunicationResponse>> {
        validate_paging(filter)?;
        let records = self.communications.get_filtered(filter)?;
        debug!(count = records.len(), "Listed communications");
        Ok(records.into_iter().map(Into::into).collect())
    }

    /// An active communication with its status history.
    pub fn get_by_id(&self, id: u64) -> ServiceResult<Option<CommunicationResponse>> {
        Ok(self.communications.get_by_id(id)?.map(Into::into))
    }

    /// Status history of an active communication, oldest first.
    pub fn history(&self, id: u64) -> ServiceResult<Option<Vec<StatusHistoryResponse>>> {
        let Some(record) = self.communications.get_by_id(id)? else {
            return Ok(None);
        };
        Ok(Some(
            record.status_history.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn create(&self, request: CreateCommunicationRequest) -> ServiceResult<CommunicationResponse> {
        require("Title", &request.title)?;
        self.ensure_member(request.member_id)?;
        self.ensure_type(request.communication_type_id)?;
        self.ensure_user(request.created_by_user_id)?;

        let status = match request.initial_status_id {
            Some(status_id) => self.resolve_status(status_id)?,
            None => self
                .statuses
                .get_by_status_code(DEFAULT_STATUS_CODE)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "Default status '{DEFAULT_STATUS_CODE}' not found"
                    ))
                })?,
        };

        let initial = StatusChange::new(&status, SOURCE_CREATE).by_user(request.created_by_user_id);
        let record = self.communications.create(
            NewCommunication {
                title: request.title,
                member_id: request.member_id,
                communication_type_id: request.communication_type_id,
                current_status_id: status.id,
                source_file_url: request.source_file_url,
                created_by_user_id: request.created_by_user_id,
            },
            initial,
        )?;

        info!(
            communication_id = record.communication.id,
            member_id = record.communication.member_id,
            status_code = %status.status_code,
            "Created communication"
        );
        Ok(record.into())
    }

    /// Apply a partial update.
    ///
    /// Returns `Ok(false)` without writing if the communication is absent.
    /// A changed `current_status_id` is appended to the status history in
    /// the same transaction.
    pub fn update(&self, id: u64, patch: UpdateCommunicationRequest) -> ServiceResult<bool> {
        let Some(record) = self.communications.get_by_id(id)? else {
            return Ok(false);
        };
        let mut communication = record.communication;

        patch_required(&mut communication.title, "Title", patch.title)?;
        if let Some(member_id) = patch.member_id {
            self.ensure_member(member_id)?;
            communication.member_id = member_id;
        }
        if let Some(type_id) = patch.communication_type_id {
            self.ensure_type(type_id)?;
            communication.communication_type_id = type_id;
        }
        if let Some(url) = patch.source_file_url {
            communication.source_file_url = Some(url).filter(|u| !u.trim().is_empty());
        }
        if patch.updated_by_user_id.is_some() {
            self.ensure_user(patch.updated_by_user_id)?;
            communication.last_updated_by_user_id = patch.updated_by_user_id;
        }

        let change = match patch.current_status_id {
            Some(status_id) if status_id != communication.current_status_id => {
                let status = self.resolve_status(status_id)?;
                communication.current_status_id = status.id;
                Some(StatusChange::new(&status, SOURCE_UPDATE).by_user(patch.updated_by_user_id))
            }
            _ => None,
        };

        let updated = match change {
            Some(change) => self
                .communications
                .update_with_history(&mut communication, change)?,
            None => self.communications.update(&mut communication)?,
        };
        if updated {
            info!(communication_id = id, "Updated communication");
        }
        Ok(updated)
    }

    /// Move a communication to another status and record the change.
    ///
    /// Returns `Ok(false)` if either the communication or the status is
    /// absent. Any active status may follow any other.
    pub fn update_status(
        &self,
        id: u64,
        status_id: u64,
        user_id: Option<u64>,
        notes: Option<String>,
    ) -> ServiceResult<bool> {
        let Some(record) = self.communications.get_by_id(id)? else {
            return Ok(false);
        };
        let Some(status) = self.statuses.get_by_id(status_id)? else {
            return Ok(false);
        };

        let mut communication = record.communication;
        let previous = communication.current_status_id;
        communication.current_status_id = status.id;
        if user_id.is_some() {
            communication.last_updated_by_user_id = user_id;
        }

        let change = StatusChange::new(&status, SOURCE_API)
            .by_user(user_id)
            .with_notes(notes);
        let updated = self
            .communications
            .update_with_history(&mut communication, change)?;

        if updated {
            info!(
                communication_id = id,
                from_status_id = previous,
                to_status = %status.status_code,
                "Communication status changed"
            );
        }
        Ok(updated)
    }

    pub fn delete(&self, id: u64) -> ServiceResult<bool> {
        let deleted = self.communications.delete(id)?;
        if deleted {
            info!(communication_id = id, "Deleted communication");
        }
        Ok(deleted)
    }

    fn ensure_member(&self, member_id: u64) -> ServiceResult<()> {
        match self.members.get_by_id(member_id)? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound(format!(
                "Member with ID {member_id} not found"
            ))),
        }
    }

    fn ensure_type(&self, type_id: u64) -> ServiceResult<()> {
        match self.types.get_by_id(type_id)? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound(format!(
                "Communication type with ID {type_id} not found"
            ))),
        }
    }

    fn ensure_user(&self, user_id: Option<u64>) -> ServiceResult<()> {
        let Some(user_id) = user_id else {
            return Ok(());
        };
        match self.users.get_by_id(user_id)? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound(format!(
                "User with ID {user_id} not found"
            ))),
        }
    }

    fn resolve_status(&self, status_id: u64) -> ServiceResult<GlobalStatus> {
        self.statuses
            .get_by_id(status_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("Status with ID {status_id} not found")))
    }
}

fn validate_paging(filter: &CommunicationFilter) -> ServiceResult<()> {
    if filter.page == Some(0) {
        return Err(ServiceError::Validation("Page must be at least 1".into()));
    }
    match filter.page_size {
        Some(size) if size == 0 || size > MAX_PAGE_SIZE => Err(ServiceError::Validation(
            format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
        )),
        _ => Ok(()),
    }
}
