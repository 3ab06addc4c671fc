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
    models::{
        CommunicationResponse, CreateCommunicationRequest, StatusHistoryResponse,
        UpdateCommunicationRequest, UpdateStatusRequest,
    },
    services::CommunicationService,
    state::AppState,
    storage::CommunicationFilter,
};

/// Optional narrowing of the communication listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CommunicationQuery {
    /// Only communications currently in this status
    pub status_id: Option<u64>,
    /// Only communications of this type
    pub type_id: Option<u64>,
    /// Only communications addressed to this member
    pub member_id: Option<u64>,
    /// Case-insensitive substring of the title
    pub search: Option<String>,
    /// 1-based page number; listing is unpaged unless `page` or `page_size` is given
    pub page: Option<u32>,
    /// Rows per page, 1 to 100 (default 10 when paging)
    pub page_size: Option<u32>,
}

impl From<CommunicationQuery> for CommunicationFilter {
    fn from(query: CommunicationQuery) -> Self {
        Self {
            status_id: query.status_id,
            type_id: query.type_id,
            member_id: query.member_id,
            search: query.search,
            page: query.page,
            page_size: query.page_size,
        }
    }
}

#[utoipa::path(
    get,
    path = "/v1/communications",
    params(CommunicationQuery),
    tag = "Communications",
    responses(
        (status = 200, body = [CommunicationResponse]),
        (status = 400, description = "Invalid paging or filter parameters")
    )
)]
pub async fn list_communications(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CommunicationQuery>,
) -> Result<Json<Vec<CommunicationResponse>>, ApiError> {
    let service = CommunicationService::new(state.db());
    Ok(Json(service.get_all(&query.into())?))
}

#[utoipa::path(
    get,
    path = "/v1/communications/{id}",
    params(("id" = u64, Path, description = "Communication id")),
    tag = "Communications",
    responses(
        (status = 200, body = CommunicationResponse),
        (status = 404, description = "Communication not found")
    )
)]
pub async fn get_communication(
    ApiPath(id): ApiPath<u64>,
    State(state): State<AppState>,
) -> Result<Json<CommunicationResponse>, ApiError> {
    CommunicationService::new(state.db())
        .get_by_id(id)?
        .map(Json)
        .ok_or_else(|| ApiError::missing("Communication", id))
}

#[utoipa::path(
    post,
    path = "/v1/communications",
    request_body = CreateCommunicationRequest,
    tag = "Communications",
    responses(
        (status = 201, body = CommunicationResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Referenced member, type or status not found")
    )
)]
pub async fn create_communication(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateCommunicationRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<CommunicationResponse>), ApiError>
{
    let created = CommunicationService::new(state.db()).create(request)?;
    let location = format!("/v1/communications/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

#[utoipa::path(
    put,
    path = "/v1/communications/{id}",
    params(("id" = u64, Path, description = "Communication id")),
    request_body = UpdateCommunicationRequest,
    tag = "Communications",
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Communication or referenced entity not found")
    )
)]
pub async fn update_communication(
    ApiPath(id): ApiPath<u64>,
    State(state): State<AppState>,
    ApiJson(patch): ApiJson<UpdateCommunicationRequest>,
) -> Result<StatusCode, ApiError> {
    if CommunicationService::new(state.db()).update(id, patch)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::missing("Communication", id))
    }
}

#[utoipa::path(
    delete,
    path = "/v1/communications/{id}",
    params(("id" = u64, Path, description = "Communication id")),
    tag = "Communications",
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Communication not found")
    )
)]
pub async fn delete_communication(
    ApiPath(id): ApiPath<u64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    if CommunicationService::new(state.db()).delete(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::missing("Communication", id))
    }
}

#[utoipa::path(
    put,
    path = "/v1/communications/{id}/status",
    params(("id" = u64, Path, description = "Communication id")),
    request_body = UpdateStatusRequest,
    tag = "Communications",
    responses(
        (status = 204, description = "Status changed"),
        (status = 404, description = "Communication or status not found")
    )
)]
pub async fn update_communication_status(
    ApiPath(id): ApiPath<u64>,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateStatusRequest>,
) -> Result<StatusCode, ApiError> {
    let changed = CommunicationService::new(state.db()).update_status(
        id,
        request.status_id,
        request.updated_by_user_id,
        request.notes,
    )?;
    if changed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!(
            "Communication with ID {id} or status with ID {} not found",
            request.status_id
        )))
    }
}

#[utoipa::path(
    get,
    path = "/v1/communications/{id}/history",
    params(("id" = u64, Path, description = "Communication id")),
    tag = "Communications",
    responses(
        (status = 200, body = [StatusHistoryResponse]),
        (status = 404, description = "Communication not found")
    )
)]
pub async fn communication_history(
    ApiPath(id): ApiPath<u64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<StatusHistoryResponse>>, ApiError> {
    CommunicationService::new(state.db())
        .history(id)?
        .map(Json)
        .ok_or_else(|| ApiError::missing("Communication", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{seeded_state, seed_member};
    use crate::storage::{GlobalStatusRepository, DEFAULT_STATUS_CODE};

    fn new_eob(member_id: u64) -> CreateCommunicationRequest {
        CreateCommunicationRequest {
            communication_type_id: 1,
            member_id,
            title: "New EOB".into(),
            source_file_url: None,
            initial_status_id: None,
            created_by_user_id: None,
        }
    }

    #[tokio::test]
    async fn create_returns_location_and_default_status() {
        let (state, _dir) = seeded_state();
        let member_id = seed_member(&state, "M12345");

        let (status, [(_, location)], Json(created)) =
            create_communication(State(state.clone()), ApiJson(new_eob(member_id)))
                .await
                .expect("communication creation succeeds");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(location, format!("/v1/communications/{}", created.id));

        let ready = GlobalStatusRepository::new(state.db())
            .get_by_status_code(DEFAULT_STATUS_CODE)
            .unwrap()
            .unwrap();
        assert_eq!(created.current_status_id, ready.id);
    }

    #[tokio::test]
    async fn create_with_unknown_member_is_404() {
        let (state, _dir) = seeded_state();
        let err = create_communication(State(state), ApiJson(new_eob(999)))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(err.message.contains("999"));
    }

    #[tokio::test]
    async fn update_unknown_communication_is_404() {
        let (state, _dir) = seeded_state();
        let err = update_communication(
            ApiPath(999),
            State(state),
            ApiJson(UpdateCommunicationRequest {
                title: Some("Updated".into()),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Communication with ID 999 not found");
    }

    #[tokio::test]
    async fn status_change_then_history() {
        let (state, _dir) = seeded_state();
        let member_id = seed_member(&state, "M12345");
        let (_, _, Json(created)) = create_communication(State(state.clone()), ApiJson(new_eob(member_id)))
            .await
            .unwrap();

        let printed = GlobalStatusRepository::new(state.db())
            .get_by_status_code("Printed")
            .unwrap()
            .unwrap();
        let status = update_communication_status(
            ApiPath(created.id),
            State(state.clone()),
            ApiJson(UpdateStatusRequest {
                status_id: printed.id,
                updated_by_user_id: None,
                notes: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let Json(history) = communication_history(ApiPath(created.id), State(state))
            .await
            .unwrap();
        let codes: Vec<_> = history.iter().map(|h| h.status_code.as_str()).collect();
        assert_eq!(codes, vec![DEFAULT_STATUS_CODE, "Printed"]);
    }

    #[tokio::test]
    async fn delete_twice_second_is_404() {
        let (state, _dir) = seeded_state();
        let member_id = seed_member(&state, "M12345");
        let (_, _, Json(created)) = create_communication(State(state.clone()), ApiJson(new_eob(member_id)))
            .await
            .unwrap();

        let first = delete_communication(ApiPath(created.id), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(first, StatusCode::NO_CONTENT);

        let second = delete_communication(ApiPath(created.id), State(state.clone()))
            .await
            .unwrap_err();
        assert_eq!(second.status, StatusCode::NOT_FOUND);

        let Json(listed) = list_communications(State(state), ApiQuery(CommunicationQuery::default()))
            .await
            .unwrap();
        assert!(listed.is_empty());
    }
}
