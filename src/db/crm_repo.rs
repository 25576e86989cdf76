// src/db/crm_repo.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{activity::Activity, crm::Customer, pipeline::Deal},
};

/// Quanto saiu junto com o cliente numa exclusão em cascata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CascadeRemoval {
    pub deals: usize,
    pub activities: usize,
}

/// Contrato de acesso a dados do CRM.
///
/// O motor do funil não sabe se os registros vêm de memória, de um banco ou
/// de uma fixture: os serviços recebem um `Arc<dyn CrmDataSource>` pronto.
/// `save_*` é upsert (insere ou substitui pelo `id`). Negócios e atividades
/// só são gravados se o cliente dono existir (`CustomerNotFound` caso contrário).
#[async_trait]
pub trait CrmDataSource: Send + Sync {
    async fn load_customers(&self) -> Result<Vec<Customer>, AppError>;

    async fn load_deals(&self) -> Result<Vec<Deal>, AppError>;

    async fn load_activities(&self) -> Result<Vec<Activity>, AppError>;

    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
        Ok(self.load_customers().await?.into_iter().find(|c| c.id == id))
    }

    async fn find_deal(&self, id: Uuid) -> Result<Option<Deal>, AppError> {
        Ok(self.load_deals().await?.into_iter().find(|d| d.id == id))
    }

    async fn save_customer(&self, customer: &Customer) -> Result<(), AppError>;

    async fn save_deal(&self, deal: &Deal) -> Result<(), AppError>;

    async fn save_activity(&self, activity: &Activity) -> Result<(), AppError>;

    /// Remove o cliente com seus negócios e atividades numa única operação.
    /// Retorna `None` se o id não existia.
    async fn delete_customer_cascade(&self, id: Uuid) -> Result<Option<CascadeRemoval>, AppError>;

    /// Retorna `false` se o id não existia.
    async fn delete_deal(&self, id: Uuid) -> Result<bool, AppError>;
}
