// src/handlers/customers.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::crm::{Customer, CustomerDraft, CustomerSummary, StatusFilter},
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CustomerQuery {
    /// Busca em nome, e-mail e empresa (sem diferenciar maiúsculas)
    pub search: Option<String>,
    /// "all" ou um status exato
    pub status: Option<String>,
}

// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    params(CustomerQuery),
    responses(
        (status = 200, description = "Lista de clientes filtrada", body = Vec<Customer>),
        (status = 400, description = "Status desconhecido")
    )
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    Query(query): Query<CustomerQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = match query.status.as_deref() {
        Some(raw) => raw.parse::<StatusFilter>()?,
        None => StatusFilter::All,
    };

    let customers = app_state
        .crm_service
        .list_customers(query.search.as_deref(), status)
        .await?;

    Ok((StatusCode::OK, Json(customers)))
}

// GET /api/customers/summaries
#[utoipa::path(
    get,
    path = "/api/customers/summaries",
    tag = "Customers",
    responses(
        (status = 200, description = "Clientes com contadores de negócios e atividades", body = Vec<CustomerSummary>)
    )
)]
pub async fn list_customer_summaries(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let summaries = app_state.crm_service.list_customer_summaries().await?;
    Ok((StatusCode::OK, Json(summaries)))
}

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    request_body = CustomerDraft,
    responses(
        (status = 201, description = "Cliente criado", body = Customer),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    Json(payload): Json<CustomerDraft>,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state.crm_service.create_customer(&payload).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

// GET /api/customers/{id}
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state.crm_service.get_customer(id).await?;
    Ok((StatusCode::OK, Json(customer)))
}

// PUT /api/customers/{id}
#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    tag = "Customers",
    request_body = CustomerDraft,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente substituído", body = Customer),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente não encontrado"),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CustomerDraft>,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state.crm_service.update_customer(id, &payload).await?;
    Ok((StatusCode::OK, Json(customer)))
}

// DELETE /api/customers/{id}
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente removido com seus negócios e atividades"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let removed = app_state.crm_service.delete_customer(id).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Cliente removido com sucesso.",
            "removedDeals": removed.deals,
            "removedActivities": removed.activities,
        })),
    ))
}
