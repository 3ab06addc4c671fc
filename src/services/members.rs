// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Member service.

use tracing::info;

use super::{patch_required, require, ServiceError, ServiceResult};
use crate::models::{CreateMemberRequest, MemberResponse, UpdateMemberRequest};
use crate::storage::{CommexDatabase, CommunicationRepository, Member, MemberRepository, NewMember};

pub struct MemberService<'a> {
    members: MemberRepository<'a>,
    communications: CommunicationRepository<'a>,
}

impl<'a> MemberService<'a> {
    pub fn new(db: &'a CommexDatabase) -> Self {
        Self {
            members: MemberRepository::new(db),
            communications: CommunicationRepository::new(db),
        }
    }

    /// Members ordered by last name; inactive ones only when asked for.
    pub fn get_all(&self, include_inactive: bool) -> ServiceResult<Vec<MemberResponse>> {
        let members = if include_inactive {
            self.members.get_all_including_inactive()?
        } else {
            self.members.get_all()?
        };
        let counts = self.communications.count_active_by_member()?;
        Ok(members
            .into_iter()
            .map(|m| {
                let count = counts.get(&m.id).copied().unwrap_or(0);
                MemberResponse::new(m, count)
            })
            .collect())
    }

    pub fn get_by_id(&self, id: u64) -> ServiceResult<Option<MemberResponse>> {
        self.members
            .get_by_id(id)?
            .map(|m| self.to_response(m))
            .transpose()
    }

    pub fn get_by_member_code(&self, code: &str) -> ServiceResult<Option<MemberResponse>> {
        self.members
            .get_by_member_code(code)?
            .map(|m| self.to_response(m))
            .transpose()
    }

    pub fn create(&self, request: CreateMemberRequest) -> ServiceResult<MemberResponse> {
        require("Member code", &request.member_code)?;
        require("First name", &request.first_name)?;
        require("Last name", &request.last_name)?;
        validate_email(&request.email)?;

        let member = self.members.create(NewMember {
            member_code: request.member_code,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone_number: request.phone_number,
        })?;

        info!(member_id = member.id, member_code = %member.member_code, "Created member");
        Ok(MemberResponse::new(member, 0))
    }

    /// Apply a partial update. `Ok(false)` if the member is absent.
    pub fn update(&self, id: u64, patch: UpdateMemberRequest) -> ServiceResult<bool> {
        let Some(mut member) = self.members.get_by_id(id)? else {
            return Ok(false);
        };

        patch_required(&mut member.member_code, "Member code", patch.member_code)?;
        patch_required(&mut member.first_name, "First name", patch.first_name)?;
        patch_required(&mut member.last_name, "Last name", patch.last_name)?;
        if let Some(email) = patch.email {
            validate_email(&email)?;
            member.email = email;
        }
        if let Some(phone_number) = patch.phone_number {
            member.phone_number = Some(phone_number).filter(|p| !p.trim().is_empty());
        }
        if let Some(is_active) = patch.is_active {
            member.is_active = is_active;
        }

        let updated = self.members.update(&mut member)?;
        if updated {
            info!(member_id = id, "Updated member");
        }
        Ok(updated)
    }

    pub fn delete(&self, id: u64) -> ServiceResult<bool> {
        let deleted = self.members.delete(id)?;
        if deleted {
            info!(member_id = id, "Deleted member");
        }
        Ok(deleted)
    }

    fn to_response(&self, member: Member) -> ServiceResult<MemberResponse> {
        let count = self.communications.count_active_for_member(member.id)?;
        Ok(MemberResponse::new(member, count))
    }
}

/// Loose syntactic check: `local@domain.tld` without whitespace.
fn validate_email(email: &str) -> ServiceResult<()> {
    let invalid = || ServiceError::Validation(format!("Invalid email address: {email}"));

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}
