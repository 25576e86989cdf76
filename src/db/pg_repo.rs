// src/db/pg_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CascadeRemoval, CrmDataSource},
    models::{activity::Activity, crm::Customer, pipeline::Deal},
};

const CUSTOMER_COLUMNS: &str =
    "id, name, email, phone, company, address, status, source, created_at";

const DEAL_COLUMNS: &str =
    "id, title, description, value, stage, probability, close_date, customer_id, assigned_to";

const ACTIVITY_COLUMNS: &str = "id, customer_id, subject, date";

// Ordem de cadastro: inserted_at não muda no upsert
const CUSTOMER_ORDER: &str = "inserted_at ASC, id ASC";

// O repositório Postgres, responsável pelas tabelas 'customers' e 'deals'
#[derive(Clone)]
pub struct PgCrmRepository {
    pool: PgPool,
}

impl PgCrmRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn load_customers_sql() -> String {
    format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY {CUSTOMER_ORDER}")
}

// FK violada: o cliente sumiu entre a checagem e a gravação
fn map_child_write_error(e: sqlx::Error, customer_id: Uuid) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return AppError::CustomerNotFound(customer_id);
        }
    }
    e.into()
}

// Converte violação do índice único de e-mail num erro amigável
fn map_customer_write_error(e: sqlx::Error, email: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::EmailAlreadyExists(email.to_string());
        }
    }
    e.into()
}

#[async_trait]
impl CrmDataSource for PgCrmRepository {
    async fn load_customers(&self) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(&load_customers_sql())
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    async fn load_deals(&self) -> Result<Vec<Deal>, AppError> {
        let deals = sqlx::query_as::<_, Deal>(&format!(
            "SELECT {DEAL_COLUMNS} FROM deals ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(deals)
    }

    async fn load_activities(&self) -> Result<Vec<Activity>, AppError> {
        let activities = sqlx::query_as::<_, Activity>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(activities)
    }

    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn find_deal(&self, id: Uuid) -> Result<Option<Deal>, AppError> {
        let deal = sqlx::query_as::<_, Deal>(&format!(
            "SELECT {DEAL_COLUMNS} FROM deals WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deal)
    }

    async fn save_customer(&self, customer: &Customer) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO customers (
                id, name, email, phone, company, address, status, source, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                phone = EXCLUDED.phone,
                company = EXCLUDED.company,
                address = EXCLUDED.address,
                status = EXCLUDED.status,
                source = EXCLUDED.source,
                updated_at = NOW()
            "#,
        )
        .bind(customer.id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.company)
        .bind(&customer.address)
        .bind(customer.status)
        .bind(&customer.source)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_customer_write_error(e, &customer.email))?;

        Ok(())
    }

    async fn save_deal(&self, deal: &Deal) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO deals (
                id, title, description, value, stage, probability,
                close_date, customer_id, assigned_to
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                value = EXCLUDED.value,
                stage = EXCLUDED.stage,
                probability = EXCLUDED.probability,
                close_date = EXCLUDED.close_date,
                customer_id = EXCLUDED.customer_id,
                assigned_to = EXCLUDED.assigned_to,
                updated_at = NOW()
            "#,
        )
        .bind(deal.id)
        .bind(&deal.title)
        .bind(&deal.description)
        .bind(deal.value)
        .bind(deal.stage)
        .bind(deal.probability)
        .bind(deal.close_date)
        .bind(deal.customer_id)
        .bind(deal.assigned_to)
        .execute(&self.pool)
        .await
        .map_err(|e| map_child_write_error(e, deal.customer_id))?;

        Ok(())
    }

    async fn save_activity(&self, activity: &Activity) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO activities (id, customer_id, subject, date)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                customer_id = EXCLUDED.customer_id,
                subject = EXCLUDED.subject,
                date = EXCLUDED.date
            "#,
        )
        .bind(activity.id)
        .bind(activity.customer_id)
        .bind(&activity.subject)
        .bind(activity.date)
        .execute(&self.pool)
        .await
        .map_err(|e| map_child_write_error(e, activity.customer_id))?;

        Ok(())
    }

    async fn delete_customer_cascade(&self, id: Uuid) -> Result<Option<CascadeRemoval>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Trava a linha do cliente: gravações de filhos esperam o commit
        let locked = sqlx::query("SELECT id FROM customers WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let deals = sqlx::query("DELETE FROM deals WHERE customer_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let activities = sqlx::query("DELETE FROM activities WHERE customer_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(CascadeRemoval {
            deals: deals as usize,
            activities: activities as usize,
        }))
    }

    async fn delete_deal(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM deals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA_UPDATE: &str =
        include_str!("../../migrations/20240201000000_exact_values_and_activities.sql");

    #[test]
    fn customers_are_listed_in_insertion_order() {
        let sql = load_customers_sql();
        assert!(sql.ends_with("ORDER BY inserted_at ASC, id ASC"));
        assert!(!sql.contains("name ASC"));
        assert!(SCHEMA_UPDATE.contains("ADD COLUMN inserted_at TIMESTAMPTZ"));
    }

    #[test]
    fn deal_value_column_has_no_fixed_scale() {
        assert!(SCHEMA_UPDATE.contains("ALTER COLUMN value TYPE NUMERIC;"));
    }

    #[test]
    fn email_index_compares_exactly() {
        assert!(SCHEMA_UPDATE.contains("DROP INDEX customers_email_lower_idx;"));
        assert!(SCHEMA_UPDATE.contains("ON customers (email);"));
    }
}
