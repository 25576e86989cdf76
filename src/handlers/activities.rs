// src/handlers/activities.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::activity::{Activity, ActivityDraft, ActivityQuery},
};

// GET /api/activities
#[utoipa::path(
    get,
    path = "/api/activities",
    tag = "Activities",
    params(ActivityQuery),
    responses(
        (status = 200, description = "Atividades na ordem de registro", body = Vec<Activity>)
    )
)]
pub async fn list_activities(
    State(app_state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let activities = app_state.crm_service.list_activities(query.customer_id).await?;
    Ok((StatusCode::OK, Json(activities)))
}

// POST /api/activities
#[utoipa::path(
    post,
    path = "/api/activities",
    tag = "Activities",
    request_body = ActivityDraft,
    responses(
        (status = 201, description = "Atividade registrada", body = Activity),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn log_activity(
    State(app_state): State<AppState>,
    Json(payload): Json<ActivityDraft>,
) -> Result<impl IntoResponse, AppError> {
    let activity = app_state.crm_service.log_activity(&payload).await?;
    Ok((StatusCode::CREATED, Json(activity)))
}
