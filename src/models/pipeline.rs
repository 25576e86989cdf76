// src/models/pipeline.rs

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::error::AppError;

// --- ETAPAS DO FUNIL ---

// A ordem de declaração é a ordem do funil (o `Ord` derivado depende disso).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "deal_stage", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DealStage {
    Lead,
    Qualified,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl DealStage {
    pub const ALL: [DealStage; 6] = [
        DealStage::Lead,
        DealStage::Qualified,
        DealStage::Proposal,
        DealStage::Negotiation,
        DealStage::ClosedWon,
        DealStage::ClosedLost,
    ];

    /// Posição da etapa no funil (0 = lead).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// As duas últimas etapas são absorventes.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DealStage::ClosedWon | DealStage::ClosedLost)
    }

    /// Próxima etapa do funil. `None` nas etapas terminais: "negotiation"
    /// avança para "closed_won", nunca para "closed_lost".
    pub fn next(&self) -> Option<DealStage> {
        if self.is_terminal() {
            return None;
        }
        DealStage::ALL.get(self.index() + 1).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DealStage::Lead => "lead",
            DealStage::Qualified => "qualified",
            DealStage::Proposal => "proposal",
            DealStage::Negotiation => "negotiation",
            DealStage::ClosedWon => "closed_won",
            DealStage::ClosedLost => "closed_lost",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DealStage::Lead => "Lead",
            DealStage::Qualified => "Qualified",
            DealStage::Proposal => "Proposal",
            DealStage::Negotiation => "Negotiation",
            DealStage::ClosedWon => "Closed Won",
            DealStage::ClosedLost => "Closed Lost",
        }
    }
}

impl Default for DealStage {
    fn default() -> Self {
        DealStage::Lead
    }
}

impl FromStr for DealStage {
    type Err = AppError;

    // Etapa desconhecida é erro, nunca um negócio descartado em silêncio
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DealStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| AppError::InvalidFilter(format!("Etapa desconhecida: '{}'", s)))
    }
}

// --- NEGÓCIO (DEAL) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: Uuid,
    #[schema(example = "ERP System Implementation")]
    pub title: String,
    pub description: Option<String>,

    #[schema(example = 25000)]
    pub value: Decimal,
    pub stage: DealStage,

    // Percentual 0..=100, não amarrado à etapa
    #[schema(example = 75)]
    pub probability: i32,

    #[schema(value_type = Option<String>, format = Date, example = "2024-03-15")]
    pub close_date: Option<NaiveDate>,

    pub customer_id: Uuid,
    pub assigned_to: Option<Uuid>,
}

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("negative_value");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DealDraft {
    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Cloud Migration")]
    pub title: String,

    pub description: Option<String>,

    #[validate(custom(function = "validate_non_negative"))]
    #[schema(example = 35000)]
    pub value: Decimal,

    // Ausente = lead
    pub stage: Option<DealStage>,

    #[serde(default)]
    #[validate(range(min = 0, max = 100, message = "invalid_probability"))]
    pub probability: i32,

    #[schema(value_type = Option<String>, format = Date, example = "2024-03-01")]
    pub close_date: Option<NaiveDate>,

    pub customer_id: Uuid,
    pub assigned_to: Option<Uuid>,
}

impl DealDraft {
    // O título é validado já sem os espaços das pontas
    pub(crate) fn normalized(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            ..self.clone()
        }
    }
}

// --- AGREGADOS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StageTotal {
    pub count: usize,
    pub value: Decimal,
}

// Uma coluna do quadro do funil
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StageColumn {
    pub stage: DealStage,
    pub label: String,
    pub count: usize,
    pub value: Decimal,
    pub deals: Vec<Deal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PipelineBoard {
    pub total_deals: usize,
    pub columns: Vec<StageColumn>,
}
