// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::State,
    http::{header, StatusCode},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::{
    error::ApiError,
    models::{CreateMemberRequest, MemberResponse, UpdateMemberRequest},
    services::MemberService,
    state::AppState,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MemberQuery {
    /// Also list soft-deleted members
    #[serde(default)]
    pub include_inactive: bool,
}

#[utoipa::path(
    get,
    path = "/v1/members",
    params(MemberQuery),
    tag = "Members",
    responses((status = 200, body = [MemberResponse]))
)]
pub async fn list_members(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MemberQuery>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    Ok(Json(
        MemberService::new(state.db()).get_all(query.include_inactive)?,
    ))
}

#[utoipa::path(
    get,
    path = "/v1/members/{id}",
    params(("id" = u64, Path, description = "Member id")),
    tag = "Members",
    responses(
        (status = 200, body = MemberResponse),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member(
    ApiPath(id): ApiPath<u64>,
    State(state): State<AppState>,
) -> Result<Json<MemberResponse>, ApiError> {
    MemberService::new(state.db())
        .get_by_id(id)?
        .map(Json)
        .ok_or_else(|| ApiError::missing("Member", id))
}

#[utoipa::path(
    get,
    path = "/v1/members/code/{member_code}",
    params(("member_code" = String, Path, description = "External member code")),
    tag = "Members",
    responses(
        (status = 200, body = MemberResponse),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member_by_code(
    ApiPath(member_code): ApiPath<String>,
    State(state): State<AppState>,
) -> Result<Json<MemberResponse>, ApiError> {
    MemberService::new(state.db())
        .get_by_member_code(&member_code)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Member with code {member_code} not found")))
}

#[utoipa::path(
    post,
    path = "/v1/members",
    request_body = CreateMemberRequest,
    tag = "Members",
    responses(
        (status = 201, body = MemberResponse),
        (status = 400, description = "Duplicate member code or invalid fields")
    )
)]
pub async fn create_member(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateMemberRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<MemberResponse>), ApiError> {
    let created = MemberService::new(state.db()).create(request)?;
    let location = format!("/v1/members/{}", created.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

#[utoipa::path(
    put,
    path = "/v1/members/{id}",
    params(("id" = u64, Path, description = "Member id")),
    request_body = UpdateMemberRequest,
    tag = "Members",
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Duplicate member code or invalid fields"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn update_member(
    ApiPath(id): ApiPath<u64>,
    State(state): State<AppState>,
    ApiJson(patch): ApiJson<UpdateMemberRequest>,
) -> Result<StatusCode, ApiError> {
    if MemberService::new(state.db()).update(id, patch)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::missing("Member", id))
    }
}

#[utoipa::path(
    delete,
    path = "/v1/members/{id}",
    params(("id" = u64, Path, description = "Member id")),
    tag = "Members",
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn delete_member(
    ApiPath(id): ApiPath<u64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    if MemberService::new(state.db()).delete(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::missing("Member", id))
    }
}
