// src/db/memory_repo.rs

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CascadeRemoval, CrmDataSource},
    models::{activity::Activity, crm::Customer, pipeline::Deal},
};

// Repositório em memória: usado quando não há DATABASE_URL e nos testes.
// A ordem de inserção é preservada; `save_*` substitui no lugar.
// Travas sempre na ordem clientes -> negócios -> atividades.
#[derive(Default)]
pub struct InMemoryCrmRepository {
    customers: RwLock<Vec<Customer>>,
    deals: RwLock<Vec<Deal>>,
    activities: RwLock<Vec<Activity>>,
}

impl InMemoryCrmRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(customers: Vec<Customer>, deals: Vec<Deal>) -> Self {
        Self {
            customers: RwLock::new(customers),
            deals: RwLock::new(deals),
            activities: RwLock::new(Vec::new()),
        }
    }

    pub fn with_activities(self, activities: Vec<Activity>) -> Self {
        Self {
            activities: RwLock::new(activities),
            ..self
        }
    }
}

fn upsert<T: Clone>(items: &mut Vec<T>, item: &T, same: impl Fn(&T) -> bool) {
    match items.iter_mut().find(|existing| same(existing)) {
        Some(slot) => *slot = item.clone(),
        None => items.push(item.clone()),
    }
}

#[async_trait]
impl CrmDataSource for InMemoryCrmRepository {
    async fn load_customers(&self) -> Result<Vec<Customer>, AppError> {
        Ok(self.customers.read().await.clone())
    }

    async fn load_deals(&self) -> Result<Vec<Deal>, AppError> {
        Ok(self.deals.read().await.clone())
    }

    async fn load_activities(&self) -> Result<Vec<Activity>, AppError> {
        Ok(self.activities.read().await.clone())
    }

    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
        Ok(self.customers.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn find_deal(&self, id: Uuid) -> Result<Option<Deal>, AppError> {
        Ok(self.deals.read().await.iter().find(|d| d.id == id).cloned())
    }

    async fn save_customer(&self, customer: &Customer) -> Result<(), AppError> {
        let mut customers = self.customers.write().await;
        upsert(&mut *customers, customer, |c| c.id == customer.id);
        Ok(())
    }

    async fn save_deal(&self, deal: &Deal) -> Result<(), AppError> {
        // A leitura dos clientes fica travada até o negócio entrar na lista
        let customers = self.customers.read().await;
        if !customers.iter().any(|c| c.id == deal.customer_id) {
            return Err(AppError::CustomerNotFound(deal.customer_id));
        }

        let mut deals = self.deals.write().await;
        upsert(&mut *deals, deal, |d| d.id == deal.id);
        Ok(())
    }

    async fn save_activity(&self, activity: &Activity) -> Result<(), AppError> {
        let customers = self.customers.read().await;
        if !customers.iter().any(|c| c.id == activity.customer_id) {
            return Err(AppError::CustomerNotFound(activity.customer_id));
        }

        let mut activities = self.activities.write().await;
        upsert(&mut *activities, activity, |a| a.id == activity.id);
        Ok(())
    }

    async fn delete_customer_cascade(&self, id: Uuid) -> Result<Option<CascadeRemoval>, AppError> {
        let mut customers = self.customers.write().await;
        let mut deals = self.deals.write().await;
        let mut activities = self.activities.write().await;

        let before = customers.len();
        customers.retain(|c| c.id != id);
        if customers.len() == before {
            return Ok(None);
        }

        let deals_before = deals.len();
        deals.retain(|d| d.customer_id != id);
        let activities_before = activities.len();
        activities.retain(|a| a.customer_id != id);

        Ok(Some(CascadeRemoval {
            deals: deals_before - deals.len(),
            activities: activities_before - activities.len(),
        }))
    }

    async fn delete_deal(&self, id: Uuid) -> Result<bool, AppError> {
        let mut deals = self.deals.write().await;
        let before = deals.len();
        deals.retain(|d| d.id != id);
        Ok(deals.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::{demo_activities, demo_dataset};

    #[tokio::test]
    async fn save_replaces_in_place_and_keeps_order() {
        let (customers, deals) = demo_dataset();
        let repo = InMemoryCrmRepository::with_data(customers.clone(), deals);

        let mut edited = customers[1].clone();
        edited.name = "Sarah J.".to_string();
        repo.save_customer(&edited).await.unwrap();

        let loaded = repo.load_customers().await.unwrap();
        assert_eq!(loaded.len(), customers.len());
        assert_eq!(loaded[1].name, "Sarah J.");
        assert_eq!(loaded[0].id, customers[0].id);
    }

    #[tokio::test]
    async fn delete_reports_missing_ids() {
        let (customers, deals) = demo_dataset();
        let repo = InMemoryCrmRepository::with_data(customers.clone(), deals.clone());

        assert!(repo.delete_deal(deals[0].id).await.unwrap());
        assert!(!repo.delete_deal(deals[0].id).await.unwrap());
        assert!(repo.find_deal(deals[0].id).await.unwrap().is_none());

        assert_eq!(repo.delete_customer_cascade(Uuid::new_v4()).await.unwrap(), None);
        assert!(repo.find_customer(customers[0].id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn cascade_removes_deals_and_activities_together() {
        let (customers, deals) = demo_dataset();
        let activities = demo_activities(&customers);
        let repo = InMemoryCrmRepository::with_data(customers.clone(), deals).with_activities(activities);

        let removed = repo.delete_customer_cascade(customers[0].id).await.unwrap();
        assert_eq!(removed, Some(CascadeRemoval { deals: 1, activities: 1 }));

        assert_eq!(repo.load_deals().await.unwrap().len(), 4);
        assert_eq!(repo.load_activities().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn writes_for_a_removed_customer_are_refused() {
        let (customers, deals) = demo_dataset();
        let activities = demo_activities(&customers);
        let repo = InMemoryCrmRepository::with_data(customers.clone(), deals.clone())
            .with_activities(activities.clone());

        repo.delete_customer_cascade(customers[0].id).await.unwrap();

        let err = repo.save_deal(&deals[0]).await.unwrap_err();
        assert!(matches!(err, AppError::CustomerNotFound(id) if id == customers[0].id));

        let err = repo.save_activity(&activities[0]).await.unwrap_err();
        assert!(matches!(err, AppError::CustomerNotFound(_)));

        assert!(repo.load_deals().await.unwrap().iter().all(|d| d.customer_id != customers[0].id));
    }
}
