// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    // Importamos os models para referenciar no Swagger
    models::dashboard::DashboardOverview,
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Métricas do painel e totais por etapa", body = DashboardOverview)
    )
)]
pub async fn get_overview(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let overview = app_state.dashboard_service.overview().await?;
    Ok((StatusCode::OK, Json(overview)))
}
