// src/services/pipeline_service.rs

use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CrmDataSource,
    models::pipeline::{Deal, DealDraft, DealStage, PipelineBoard, StageTotal},
    services::aggregator,
};

#[derive(Clone)]
pub struct PipelineService {
    repo: Arc<dyn CrmDataSource>,
}

impl PipelineService {
    pub fn new(repo: Arc<dyn CrmDataSource>) -> Self {
        Self { repo }
    }

    // --- LEITURA ---

    pub async fn list_deals(&self) -> Result<Vec<Deal>, AppError> {
        self.repo.load_deals().await
    }

    pub async fn get_deal(&self, id: Uuid) -> Result<Deal, AppError> {
        self.repo.find_deal(id).await?.ok_or(AppError::DealNotFound(id))
    }

    pub async fn board(&self) -> Result<PipelineBoard, AppError> {
        let deals = self.repo.load_deals().await?;
        Ok(aggregator::pipeline_board(&deals))
    }

    pub async fn stage_totals(&self) -> Result<BTreeMap<DealStage, StageTotal>, AppError> {
        let deals = self.repo.load_deals().await?;
        Ok(aggregator::stage_totals(&deals))
    }

    // --- ESCRITA ---

    // Todo negócio precisa apontar para um cliente existente
    async fn ensure_customer(&self, customer_id: Uuid) -> Result<(), AppError> {
        match self.repo.find_customer(customer_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::CustomerNotFound(customer_id)),
        }
    }

    pub async fn create_deal(&self, draft: &DealDraft) -> Result<Deal, AppError> {
        let deal = aggregator::create_deal(draft)?;
        self.ensure_customer(deal.customer_id).await?;

        self.repo.save_deal(&deal).await?;

        tracing::info!("Negócio criado: {} ({}) em {}", deal.id, deal.title, deal.stage.as_str());
        Ok(deal)
    }

    pub async fn update_deal(&self, id: Uuid, draft: &DealDraft) -> Result<Deal, AppError> {
        let current = self.get_deal(id).await?;

        let updated = aggregator::replace_deal(&current, draft)?;
        self.ensure_customer(updated.customer_id).await?;

        self.repo.save_deal(&updated).await?;
        Ok(updated)
    }

    pub async fn delete_deal(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete_deal(id).await? {
            return Err(AppError::DealNotFound(id));
        }
        tracing::info!("Negócio {} removido.", id);
        Ok(())
    }

    // --- TRANSIÇÃO ---

    /// Avança o negócio uma etapa e grava. Em etapa terminal nada é gravado
    /// e o negócio volta como está.
    pub async fn advance_deal(&self, id: Uuid) -> Result<Deal, AppError> {
        let current = self.get_deal(id).await?;
        let advanced = aggregator::advance_stage(&current);

        if advanced.stage == current.stage {
            tracing::debug!("Negócio {} já está em etapa terminal ({}).", id, current.stage.as_str());
            return Ok(current);
        }

        self.repo.save_deal(&advanced).await?;

        tracing::info!(
            "Negócio {} avançou: {} -> {}",
            id,
            current.stage.as_str(),
            advanced.stage.as_str()
        );
        Ok(advanced)
    }
}
