// src/models/crm.rs

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

// --- ENUMS ---

// Mapeia o CREATE TYPE customer_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "customer_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Active,
    Inactive,
    Prospect,
    Pending,
}

impl CustomerStatus {
    pub const ALL: [CustomerStatus; 4] = [
        CustomerStatus::Active,
        CustomerStatus::Inactive,
        CustomerStatus::Prospect,
        CustomerStatus::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Inactive => "inactive",
            CustomerStatus::Prospect => "prospect",
            CustomerStatus::Pending => "pending",
        }
    }
}

impl Default for CustomerStatus {
    // Cliente novo entra sempre como prospect
    fn default() -> Self {
        CustomerStatus::Prospect
    }
}

impl FromStr for CustomerStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CustomerStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::InvalidFilter(format!("Status desconhecido: '{}'", s)))
    }
}

/// Filtro de status da listagem: o sentinela "all" ou um status exato.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(CustomerStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: CustomerStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(expected) => *expected == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            other => other.parse().map(StatusFilter::Only),
        }
    }
}

// --- CLIENTE (O Dado) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "John Smith")]
    pub name: String,
    #[schema(example = "john@acme.com")]
    pub email: String,

    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,

    pub status: CustomerStatus,

    // Canal de aquisição (website, referral, cold_call...)
    pub source: Option<String>,

    #[schema(value_type = String, format = Date, example = "2024-01-15")]
    pub created_at: NaiveDate,
}

/// Payload de criação e de substituição completa de um cliente.
///
/// `name` e `email` têm `#[serde(default)]` para que a ausência do campo
/// chegue na validação (400 com detalhes) em vez de falhar no parse do JSON.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Maria da Silva")]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "maria@email.com")]
    pub email: String,

    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub status: Option<CustomerStatus>,
    pub source: Option<String>,
}

impl CustomerDraft {
    // Remove espaços das pontas dos campos obrigatórios antes de validar
    pub(crate) fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            ..self.clone()
        }
    }
}

// --- CONTADORES DERIVADOS ---

// Nunca é gravado: recalculado a partir de negócios e atividades a cada leitura.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    #[serde(flatten)]
    pub customer: Customer,
    pub deals_count: usize,
    pub total_value: Decimal,
    pub activities_count: usize,
}
