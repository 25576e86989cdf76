// src/services/crm_service.rs

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CascadeRemoval, CrmDataSource},
    models::{
        activity::{Activity, ActivityDraft},
        crm::{Customer, CustomerDraft, CustomerSummary, StatusFilter},
    },
    services::aggregator,
};

#[derive(Clone)]
pub struct CrmService {
    repo: Arc<dyn CrmDataSource>,
}

impl CrmService {
    pub fn new(repo: Arc<dyn CrmDataSource>) -> Self {
        Self { repo }
    }

    // =========================================================================
    //  1. LEITURA
    // =========================================================================

    pub async fn list_customers(
        &self,
        search: Option<&str>,
        status: StatusFilter,
    ) -> Result<Vec<Customer>, AppError> {
        let customers = self.repo.load_customers().await?;

        Ok(aggregator::filter_customers(&customers, search, status)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Clientes com contadores de negócios e atividades calculados na hora.
    pub async fn list_customer_summaries(&self) -> Result<Vec<CustomerSummary>, AppError> {
        let customers = self.repo.load_customers().await?;
        let deals = self.repo.load_deals().await?;
        let activities = self.repo.load_activities().await?;

        Ok(aggregator::customer_summaries(&customers, &deals, &activities))
    }

    pub async fn list_activities(&self, customer_id: Option<Uuid>) -> Result<Vec<Activity>, AppError> {
        let activities = self.repo.load_activities().await?;

        Ok(match customer_id {
            Some(id) => activities.into_iter().filter(|a| a.customer_id == id).collect(),
            None => activities,
        })
    }

    pub async fn get_customer(&self, id: Uuid) -> Result<Customer, AppError> {
        self.repo
            .find_customer(id)
            .await?
            .ok_or(AppError::CustomerNotFound(id))
    }

    // =========================================================================
    //  2. ESCRITA
    // =========================================================================

    pub async fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer, AppError> {
        let existing = self.repo.load_customers().await?;

        // Valida e checa e-mail antes de gravar qualquer coisa
        let customer = aggregator::create_customer(&existing, draft)?;
        self.repo.save_customer(&customer).await?;

        tracing::info!("Cliente criado: {} ({})", customer.id, customer.email);
        Ok(customer)
    }

    pub async fn update_customer(&self, id: Uuid, draft: &CustomerDraft) -> Result<Customer, AppError> {
        let existing = self.repo.load_customers().await?;
        let current = existing
            .iter()
            .find(|c| c.id == id)
            .ok_or(AppError::CustomerNotFound(id))?;

        let updated = aggregator::replace_customer(&existing, current, draft)?;
        self.repo.save_customer(&updated).await?;

        tracing::info!("Cliente atualizado: {}", id);
        Ok(updated)
    }

    /// Remove o cliente junto com seus negócios e atividades.
    pub async fn delete_customer(&self, id: Uuid) -> Result<CascadeRemoval, AppError> {
        let removed = self
            .repo
            .delete_customer_cascade(id)
            .await?
            .ok_or(AppError::CustomerNotFound(id))?;

        tracing::info!(
            "🔗 Cliente {} removido com {} negócio(s) e {} atividade(s).",
            id,
            removed.deals,
            removed.activities
        );
        Ok(removed)
    }

    // =========================================================================
    //  3. ATIVIDADES
    // =========================================================================

    pub async fn log_activity(&self, draft: &ActivityDraft) -> Result<Activity, AppError> {
        let activity = aggregator::create_activity(draft)?;
        if self.repo.find_customer(activity.customer_id).await?.is_none() {
            return Err(AppError::CustomerNotFound(activity.customer_id));
        }

        self.repo.save_activity(&activity).await?;

        tracing::info!("Atividade registrada para {}: {}", activity.customer_id, activity.subject);
        Ok(activity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        seed::{demo_activities, demo_dataset},
        InMemoryCrmRepository,
    };
    use crate::models::{crm::CustomerStatus, pipeline::DealDraft};
    use crate::services::pipeline_service::PipelineService;

    fn service() -> (CrmService, Arc<InMemoryCrmRepository>, Vec<Customer>) {
        let (customers, deals) = demo_dataset();
        let activities = demo_activities(&customers);
        let repo = Arc::new(
            InMemoryCrmRepository::with_data(customers.clone(), deals).with_activities(activities),
        );
        (CrmService::new(repo.clone()), repo, customers)
    }

    fn draft(name: &str, email: &str) -> CustomerDraft {
        CustomerDraft {
            name: name.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn list_applies_search_and_status() {
        let (service, _, _) = service();

        let all = service.list_customers(None, StatusFilter::All).await.unwrap();
        assert_eq!(all.len(), 5);

        let active = service
            .list_customers(Some("corp"), StatusFilter::Only(CustomerStatus::Active))
            .await
            .unwrap();
        let names: Vec<&str> = active.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["John Smith"]);
    }

    #[tokio::test]
    async fn create_persists_and_duplicate_leaves_store_untouched() {
        let (service, repo, _) = service();

        let created = service.create_customer(&draft("Ana Souza", "ana@novo.com")).await.unwrap();
        assert_eq!(service.get_customer(created.id).await.unwrap(), created);

        let err = service.create_customer(&draft("Ana 2", " ana@novo.com")).await.unwrap_err();
        assert!(matches!(err, AppError::EmailAlreadyExists(_)));
        assert_eq!(repo.load_customers().await.unwrap().len(), 6);

        // Caixa diferente é outro e-mail
        service.create_customer(&draft("Ana 3", "ANA@novo.com")).await.unwrap();
        assert_eq!(repo.load_customers().await.unwrap().len(), 7);
    }

    #[tokio::test]
    async fn update_unknown_customer_is_not_found() {
        let (service, _, _) = service();

        let missing = Uuid::new_v4();
        let err = service.update_customer(missing, &draft("X", "x@x.com")).await.unwrap_err();
        assert!(matches!(err, AppError::CustomerNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn delete_cascades_to_deals() {
        let (service, repo, customers) = service();

        let removed = service.delete_customer(customers[0].id).await.unwrap();
        assert_eq!(removed, CascadeRemoval { deals: 1, activities: 1 });

        let deals = repo.load_deals().await.unwrap();
        assert_eq!(deals.len(), 4);
        assert!(deals.iter().all(|d| d.customer_id != customers[0].id));
        assert!(service.list_activities(Some(customers[0].id)).await.unwrap().is_empty());

        let err = service.delete_customer(customers[0].id).await.unwrap_err();
        assert!(matches!(err, AppError::CustomerNotFound(_)));
    }

    #[tokio::test]
    async fn summaries_follow_the_deals() {
        let (service, _, customers) = service();

        let summaries = service.list_customer_summaries().await.unwrap();
        let john = summaries.iter().find(|s| s.customer.id == customers[0].id).unwrap();
        assert_eq!(john.deals_count, 1);
        assert_eq!(john.total_value, rust_decimal::Decimal::from(25000));
        assert_eq!(john.activities_count, 1);
    }

    #[tokio::test]
    async fn log_activity_counts_for_the_customer() {
        let (service, _, customers) = service();

        let logged = service
            .log_activity(&ActivityDraft {
                customer_id: customers[1].id,
                subject: " Demo call ".to_string(),
                date: None,
            })
            .await
            .unwrap();
        assert_eq!(logged.subject, "Demo call");

        let sarah = service.list_activities(Some(customers[1].id)).await.unwrap();
        assert_eq!(sarah.len(), 2);

        let missing = Uuid::new_v4();
        let err = service
            .log_activity(&ActivityDraft {
                customer_id: missing,
                subject: "Ghost".to_string(),
                date: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CustomerNotFound(id) if id == missing));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_deal_creation_never_outlives_the_customer() {
        for _ in 0..20 {
            let (service, repo, customers) = service();
            let pipeline = PipelineService::new(repo.clone());
            let owner = customers[2].id;

            let mut writers = Vec::new();
            for n in 0..8 {
                let pipeline = pipeline.clone();
                writers.push(tokio::spawn(async move {
                    let draft = DealDraft {
                        title: format!("Upsell {}", n),
                        description: None,
                        value: rust_decimal::Decimal::from(100),
                        stage: None,
                        probability: 10,
                        close_date: None,
                        customer_id: owner,
                        assigned_to: None,
                    };
                    // Pode perder a corrida para a exclusão; só não pode deixar órfão
                    let _ = pipeline.create_deal(&draft).await;
                }));
            }

            service.delete_customer(owner).await.unwrap();
            for writer in writers {
                writer.await.unwrap();
            }

            let deals = repo.load_deals().await.unwrap();
            assert!(deals.iter().all(|d| d.customer_id != owner));
        }
    }
}
