// src/models/dashboard.rs

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{
    activity::ActivityFeedItem,
    pipeline::{DealStage, StageTotal},
};

// 1. Métricas do painel (os cards do topo)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_customers: usize,
    pub active_customers: usize,
    pub total_deals: usize,
    pub closed_deals: usize,      // Só closed_won conta como fechado
    pub total_value: Decimal,
    pub closed_value: Decimal,
    pub conversion_rate: f64,     // Percentual com precisão total
    pub avg_deal_size: f64,
}

impl Analytics {
    /// Taxa de conversão com uma casa decimal, só para exibição.
    pub fn conversion_rate_display(&self) -> f64 {
        (self.conversion_rate * 10.0).round() / 10.0
    }
}

// 2. Resposta completa do painel
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub analytics: Analytics,
    // Sempre as seis etapas, na ordem do funil
    #[schema(value_type = Object)]
    pub stage_totals: BTreeMap<DealStage, StageTotal>,
    // Mais recentes primeiro
    pub recent_activities: Vec<ActivityFeedItem>,
}
