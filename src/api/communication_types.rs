// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::State,
    http::{header, StatusCode},
    Json,
};

use super::extract::{ApiJson, ApiPath};
use crate::{
    error::ApiError,
    models::{
        CommunicationTypeResponse, CommunicationTypeStatusResponse, CreateCommunicationTypeRequest,
        UpdateCommunicationTypeRequest,
    },
    services::CommunicationTypeService,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/communication-types",
    tag = "Communication Types",
    responses((status = 200, body = [CommunicationTypeResponse]))
)]
pub async fn list_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<CommunicationTypeResponse>>, ApiError> {
    Ok(Json(CommunicationTypeService::new(state.db()).get_all()?))
}

#[utoipa::path(
    get,
    path = "/v1/communication-types/{id}",
    params(("id" = u64, Path, description = "Communication type id")),
    tag = "Communication Types",
    responses(
        (status = 200, body = CommunicationTypeResponse),
        (status = 404, description = "Type not found")
    )
)]
pub async fn get_type(
    ApiPath(id): ApiPath<u64>,
    State(state): State<AppState>,
) -> Result<Json<CommunicationTypeResponse>, ApiError> {
    CommunicationTypeService::new(state.db())
        .get_by_id(id)?
        .map(Json)
        .ok_or_else(|| ApiError::missing("Communication type", id))
}

#[utoipa::path(
    get,
    path = "/v1/communication-types/code/{type_code}",
    params(("type_code" = String, Path, description = "Unique type code")),
    tag = "Communication Types",
    responses(
        (status = 200, body = CommunicationTypeResponse),
        (status = 404, description = "Type not found")
    )
)]
pub async fn get_type_by_code(
    ApiPath(type_code): ApiPath<String>,
    State(state): State<AppState>,
) -> Result<Json<CommunicationTypeResponse>, ApiError> {
    CommunicationTypeService::new(state.db())
        .get_by_type_code(&type_code)?
        .map(Json)
        .ok_or_else(|| {
            ApiError::not_found(format!("Communication type with code {type_code} not found"))
        })
}

#[utoipa::path(
    get,
    path = "/v1/communication-types/{id}/statuses",
    params(("id" = u64, Path, description = "Communication type id")),
    tag = "Communication Types",
    responses(
        (status = 200, body = [CommunicationTypeStatusResponse]),
        (status = 404, description = "Type not found")
    )
)]
pub async fn list_type_statuses(
    ApiPath(id): ApiPath<u64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CommunicationTypeStatusResponse>>, ApiError> {
    CommunicationTypeService::new(state.db())
        .get_statuses(id)?
        .map(Json)
        .ok_or_else(|| ApiError::missing("Communication type", id))
}

#[utoipa::path(
    post,
    path = "/v1/communication-types",
    request_body = CreateCommunicationTypeRequest,
    tag = "Communication Types",
    responses(
        (status = 201, body = CommunicationTypeResponse),
        (status = 400, description = "Duplicate code or unknown status ids")
    )
)]
pub async fn create_type(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateCommunicationTypeRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<CommunicationTypeResponse>), ApiError>
{
    let created = CommunicationTypeService::new(state.db()).create(request)?;
    let location = format!("/v1/communication-types/{}", created.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

#[utoipa::path(
    put,
    path = "/v1/communication-types/{id}",
    params(("id" = u64, Path, description = "Communication type id")),
    request_body = UpdateCommunicationTypeRequest,
    tag = "Communication Types",
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Duplicate code or unknown status ids"),
        (status = 404, description = "Type not found")
    )
)]
pub async fn update_type(
    ApiPath(id): ApiPath<u64>,
    State(state): State<AppState>,
    ApiJson(patch): ApiJson<UpdateCommunicationTypeRequest>,
) -> Result<StatusCode, ApiError> {
    if CommunicationTypeService::new(state.db()).update(id, patch)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::missing("Communication type", id))
    }
}

#[utoipa::path(
    delete,
    path = "/v1/communication-types/{id}",
    params(("id" = u64, Path, description = "Communication type id")),
    tag = "Communication Types",
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Type not found")
    )
)]
pub async fn delete_type(
    ApiPath(id): ApiPath<u64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    if CommunicationTypeService::new(state.db()).delete(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::missing("Communication type", id))
    }
}
