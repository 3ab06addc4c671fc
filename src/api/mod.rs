// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        CommunicationResponse, CommunicationTypeResponse, CommunicationTypeStatusResponse,
        CreateCommunicationRequest, CreateCommunicationTypeRequest, CreateGlobalStatusRequest,
        CreateMemberRequest, GlobalStatusResponse, MemberResponse, StatusHistoryResponse,
        UpdateCommunicationRequest, UpdateCommunicationTypeRequest, UpdateGlobalStatusRequest,
        UpdateMemberRequest, UpdateStatusRequest,
    },
    state::AppState,
    storage::StatusPhase,
};

pub mod communication_types;
pub mod communications;
pub mod extract;
pub mod global_statuses;
pub mod health;
pub mod members;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route(
            "/communications",
            get(communications::list_communications).post(communications::create_communication),
        )
        .route(
            "/communications/{id}",
            get(communications::get_communication)
                .put(communications::update_communication)
                .delete(communications::delete_communication),
        )
        .route(
            "/communications/{id}/status",
            put(communications::update_communication_status),
        )
        .route(
            "/communications/{id}/history",
            get(communications::communication_history),
        )
        .route(
            "/globalstatuses",
            get(global_statuses::list_statuses).post(global_statuses::create_status),
        )
        .route(
            "/globalstatuses/{id}",
            get(global_statuses::get_status)
                .put(global_statuses::update_status)
                .delete(global_statuses::delete_status),
        )
        .route(
            "/globalstatuses/code/{status_code}",
            get(global_statuses::get_status_by_code),
        )
        .route(
            "/communication-types",
            get(communication_types::list_types).post(communication_types::create_type),
        )
        .route(
            "/communication-types/{id}",
            get(communication_types::get_type)
                .put(communication_types::update_type)
                .delete(communication_types::delete_type),
        )
        .route(
            "/communication-types/code/{type_code}",
            get(communication_types::get_type_by_code),
        )
        .route(
            "/communication-types/{id}/statuses",
            get(communication_types::list_type_statuses),
        )
        .route(
            "/members",
            get(members::list_members).post(members::create_member),
        )
        .route(
            "/members/{id}",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        .route(
            "/members/code/{member_code}",
            get(members::get_member_by_code),
        )
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CorsLayer::permissive()),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        communications::list_communications,
        communications::get_communication,
        communications::create_communication,
        communications::update_communication,
        communications::delete_communication,
        communications::update_communication_status,
        communications::communication_history,
        global_statuses::list_statuses,
        global_statuses::get_status,
        global_statuses::get_status_by_code,
        global_statuses::create_status,
        global_statuses::update_status,
        global_statuses::delete_status,
        communication_types::list_types,
        communication_types::get_type,
        communication_types::get_type_by_code,
        communication_types::list_type_statuses,
        communication_types::create_type,
        communication_types::update_type,
        communication_types::delete_type,
        members::list_members,
        members::get_member,
        members::get_member_by_code,
        members::create_member,
        members::update_member,
        members::delete_member,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            CommunicationResponse,
            StatusHistoryResponse,
            CreateCommunicationRequest,
            UpdateCommunicationRequest,
            UpdateStatusRequest,
            GlobalStatusResponse,
            CreateGlobalStatusRequest,
            UpdateGlobalStatusRequest,
            StatusPhase,
            CommunicationTypeResponse,
            CommunicationTypeStatusResponse,
            CreateCommunicationTypeRequest,
            UpdateCommunicationTypeRequest,
            MemberResponse,
            CreateMemberRequest,
            UpdateMemberRequest,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Communications", description = "Member communications and their status history"),
        (name = "Global Statuses", description = "Shared lifecycle status catalog"),
        (name = "Communication Types", description = "Communication kinds and their statuses"),
        (name = "Members", description = "Communication recipients"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
