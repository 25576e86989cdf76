// src/handlers/deals.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::pipeline::{Deal, DealDraft, PipelineBoard},
};

// GET /api/deals
#[utoipa::path(
    get,
    path = "/api/deals",
    tag = "Deals",
    responses((status = 200, description = "Todos os negócios", body = Vec<Deal>))
)]
pub async fn list_deals(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let deals = app_state.pipeline_service.list_deals().await?;
    Ok((StatusCode::OK, Json(deals)))
}

// GET /api/deals/board
#[utoipa::path(
    get,
    path = "/api/deals/board",
    tag = "Deals",
    responses((status = 200, description = "Quadro do funil, uma coluna por etapa", body = PipelineBoard))
)]
pub async fn get_board(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let board = app_state.pipeline_service.board().await?;
    Ok((StatusCode::OK, Json(board)))
}

// POST /api/deals
#[utoipa::path(
    post,
    path = "/api/deals",
    tag = "Deals",
    request_body = DealDraft,
    responses(
        (status = 201, description = "Negócio criado", body = Deal),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn create_deal(
    State(app_state): State<AppState>,
    Json(payload): Json<DealDraft>,
) -> Result<impl IntoResponse, AppError> {
    let deal = app_state.pipeline_service.create_deal(&payload).await?;
    Ok((StatusCode::CREATED, Json(deal)))
}

// GET /api/deals/{id}
#[utoipa::path(
    get,
    path = "/api/deals/{id}",
    tag = "Deals",
    params(("id" = Uuid, Path, description = "ID do negócio")),
    responses(
        (status = 200, description = "Negócio", body = Deal),
        (status = 404, description = "Negócio não encontrado")
    )
)]
pub async fn get_deal(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let deal = app_state.pipeline_service.get_deal(id).await?;
    Ok((StatusCode::OK, Json(deal)))
}

// PUT /api/deals/{id}
#[utoipa::path(
    put,
    path = "/api/deals/{id}",
    tag = "Deals",
    request_body = DealDraft,
    params(("id" = Uuid, Path, description = "ID do negócio")),
    responses(
        (status = 200, description = "Negócio substituído", body = Deal),
        (status = 404, description = "Negócio ou cliente não encontrado")
    )
)]
pub async fn update_deal(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DealDraft>,
) -> Result<impl IntoResponse, AppError> {
    let deal = app_state.pipeline_service.update_deal(id, &payload).await?;
    Ok((StatusCode::OK, Json(deal)))
}

// DELETE /api/deals/{id}
#[utoipa::path(
    delete,
    path = "/api/deals/{id}",
    tag = "Deals",
    params(("id" = Uuid, Path, description = "ID do negócio")),
    responses(
        (status = 200, description = "Negócio removido"),
        (status = 404, description = "Negócio não encontrado")
    )
)]
pub async fn delete_deal(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.pipeline_service.delete_deal(id).await?;
    Ok((StatusCode::OK, Json(json!({ "message": "Negócio removido com sucesso." }))))
}

// POST /api/deals/{id}/advance
#[utoipa::path(
    post,
    path = "/api/deals/{id}/advance",
    tag = "Deals",
    params(("id" = Uuid, Path, description = "ID do negócio")),
    responses(
        (status = 200, description = "Negócio na próxima etapa (inalterado se já fechado)", body = Deal),
        (status = 404, description = "Negócio não encontrado")
    )
)]
pub async fn advance_deal(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let deal = app_state.pipeline_service.advance_deal(id).await?;
    Ok((StatusCode::OK, Json(deal)))
}
