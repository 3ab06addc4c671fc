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
    models::{CreateGlobalStatusRequest, GlobalStatusResponse, UpdateGlobalStatusRequest},
    services::GlobalStatusService,
    state::AppState,
    storage::StatusPhase,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PhaseQuery {
    /// Only statuses in this phase
    pub phase: Option<StatusPhase>,
}

#[utoipa::path(
    get,
    path = "/v1/globalstatuses",
    params(PhaseQuery),
    tag = "Global Statuses",
    responses((status = 200, body = [GlobalStatusResponse]))
)]
pub async fn list_statuses(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PhaseQuery>,
) -> Result<Json<Vec<GlobalStatusResponse>>, ApiError> {
    Ok(Json(GlobalStatusService::new(state.db()).get_all(query.phase)?))
}

#[utoipa::path(
    get,
    path = "/v1/globalstatuses/{id}",
    params(("id" = u64, Path, description = "Status id")),
    tag = "Global Statuses",
    responses(
        (status = 200, body = GlobalStatusResponse),
        (status = 404, description = "Status not found")
    )
)]
pub async fn get_status(
    ApiPath(id): ApiPath<u64>,
    State(state): State<AppState>,
) -> Result<Json<GlobalStatusResponse>, ApiError> {
    GlobalStatusService::new(state.db())
        .get_by_id(id)?
        .map(Json)
        .ok_or_else(|| ApiError::missing("Status", id))
}

#[utoipa::path(
    get,
    path = "/v1/globalstatuses/code/{status_code}",
    params(("status_code" = String, Path, description = "Unique status code")),
    tag = "Global Statuses",
    responses(
        (status = 200, body = GlobalStatusResponse),
        (status = 404, description = "Status not found")
    )
)]
pub async fn get_status_by_code(
    ApiPath(status_code): ApiPath<String>,
    State(state): State<AppState>,
) -> Result<Json<GlobalStatusResponse>, ApiError> {
    GlobalStatusService::new(state.db())
        .get_by_status_code(&status_code)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Status with code {status_code} not found")))
}

#[utoipa::path(
    post,
    path = "/v1/globalstatuses",
    request_body = CreateGlobalStatusRequest,
    tag = "Global Statuses",
    responses(
        (status = 201, body = GlobalStatusResponse),
        (status = 400, description = "Duplicate or invalid status")
    )
)]
pub async fn create_status(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateGlobalStatusRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<GlobalStatusResponse>), ApiError> {
    let created = GlobalStatusService::new(state.db()).create(request)?;
    let location = format!("/v1/globalstatuses/{}", created.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

#[utoipa::path(
    put,
    path = "/v1/globalstatuses/{id}",
    params(("id" = u64, Path, description = "Status id")),
    request_body = UpdateGlobalStatusRequest,
    tag = "Global Statuses",
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Duplicate or invalid status"),
        (status = 404, description = "Status not found")
    )
)]
pub async fn update_status(
    ApiPath(id): ApiPath<u64>,
    State(state): State<AppState>,
    ApiJson(patch): ApiJson<UpdateGlobalStatusRequest>,
) -> Result<StatusCode, ApiError> {
    if GlobalStatusService::new(state.db()).update(id, patch)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::missing("Status", id))
    }
}

#[utoipa::path(
    delete,
    path = "/v1/globalstatuses/{id}",
    params(("id" = u64, Path, description = "Status id")),
    tag = "Global Statuses",
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Status not found")
    )
)]
pub async fn delete_status(
    ApiPath(id): ApiPath<u64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    if GlobalStatusService::new(state.db()).delete(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::missing("Status", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::seeded_state;

    fn printed_again() -> CreateGlobalStatusRequest {
        CreateGlobalStatusRequest {
            status_code: "Printed".into(),
            display_name: "Printed".into(),
            description: String::new(),
            phase: StatusPhase::Production,
        }
    }

    #[tokio::test]
    async fn duplicate_code_is_400() {
        let (state, _dir) = seeded_state();
        let err = create_status(State(state), ApiJson(printed_again()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("Status code already exists"));
    }

    #[tokio::test]
    async fn lookup_by_code_and_phase() {
        let (state, _dir) = seeded_state();

        let Json(ready) = get_status_by_code(ApiPath("ReadyForRelease".into()), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(ready.phase, StatusPhase::Creation);

        let Json(terminal) = list_statuses(
            State(state.clone()),
            ApiQuery(PhaseQuery {
                phase: Some(StatusPhase::Terminal),
            }),
        )
        .await
        .unwrap();
        assert!(terminal.iter().all(|s| s.phase == StatusPhase::Terminal));
        assert!(terminal.iter().any(|s| s.status_code == "Delivered"));

        let err = get_status_by_code(ApiPath("Nope".into()), State(state))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deleted_status_is_404_afterwards() {
        let (state, _dir) = seeded_state();
        let Json(ready) = get_status_by_code(ApiPath("Cancelled".into()), State(state.clone()))
            .await
            .unwrap();

        assert_eq!(
            delete_status(ApiPath(ready.id), State(state.clone())).await.unwrap(),
            StatusCode::NO_CONTENT
        );
        let err = get_status(ApiPath(ready.id), State(state)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
