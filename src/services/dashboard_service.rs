// src/services/dashboard_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::CrmDataSource,
    models::dashboard::DashboardOverview,
    services::aggregator,
};

// Tamanho do feed "Recent Activities"
const RECENT_ACTIVITIES: usize = 5;

#[derive(Clone)]
pub struct DashboardService {
    repo: Arc<dyn CrmDataSource>,
}

impl DashboardService {
    pub fn new(repo: Arc<dyn CrmDataSource>) -> Self {
        Self { repo }
    }

    // Cards do topo + distribuição por etapa + feed, sobre o mesmo snapshot
    pub async fn overview(&self) -> Result<DashboardOverview, AppError> {
        let customers = self.repo.load_customers().await?;
        let deals = self.repo.load_deals().await?;
        let activities = self.repo.load_activities().await?;

        let analytics = aggregator::compute_analytics(&customers, &deals);
        tracing::debug!(
            "Painel: {} negócios, conversão {}%",
            analytics.total_deals,
            analytics.conversion_rate_display()
        );

        Ok(DashboardOverview {
            analytics,
            stage_totals: aggregator::stage_totals(&deals),
            recent_activities: aggregator::recent_activities(&activities, &customers, RECENT_ACTIVITIES),
        })
    }
}
