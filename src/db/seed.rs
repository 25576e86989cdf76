// src/db/seed.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CrmDataSource,
    models::{
        activity::Activity,
        crm::{Customer, CustomerStatus},
        pipeline::{Deal, DealStage},
    },
};

// Datas fixas da demonstração
fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn demo_customer(
    name: &str,
    email: &str,
    phone: &str,
    company: &str,
    address: &str,
    status: CustomerStatus,
    source: &str,
    created_at: NaiveDate,
) -> Customer {
    Customer {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        phone: Some(phone.to_string()),
        company: Some(company.to_string()),
        address: Some(address.to_string()),
        status,
        source: Some(source.to_string()),
        created_at,
    }
}

fn demo_deal(
    title: &str,
    description: &str,
    value: i64,
    stage: DealStage,
    probability: i32,
    close_date: Option<NaiveDate>,
    customer: &Customer,
) -> Deal {
    Deal {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: Some(description.to_string()),
        value: Decimal::from(value),
        stage,
        probability,
        close_date,
        customer_id: customer.id,
        assigned_to: None,
    }
}

/// Dados de demonstração: cinco clientes e um negócio por cliente.
pub fn demo_dataset() -> (Vec<Customer>, Vec<Deal>) {
    let customers = vec![
        demo_customer(
            "John Smith", "john@acme.com", "+1-555-0123", "Acme Corporation",
            "123 Business St, New York, NY", CustomerStatus::Active, "website",
            date(2024, 1, 15),
        ),
        demo_customer(
            "Sarah Johnson", "sarah@techsolutions.com", "+1-555-0124", "Tech Solutions Ltd",
            "456 Innovation Ave, San Francisco, CA", CustomerStatus::Active, "referral",
            date(2024, 1, 14),
        ),
        demo_customer(
            "Mike Wilson", "mike@global.com", "+1-555-0125", "Global Industries",
            "789 Corporate Blvd, Chicago, IL", CustomerStatus::Prospect, "cold_call",
            date(2024, 1, 13),
        ),
        demo_customer(
            "Lisa Brown", "lisa@startup.com", "+1-555-0126", "Startup Inc",
            "12 Garage Rd, Austin, TX", CustomerStatus::Active, "event",
            date(2024, 1, 12),
        ),
        demo_customer(
            "David Lee", "david@enterprise.com", "+1-555-0127", "Enterprise Corp",
            "1 Enterprise Plaza, Seattle, WA", CustomerStatus::Inactive, "website",
            date(2024, 1, 11),
        ),
    ];

    let deals = vec![
        demo_deal(
            "ERP System Implementation", "Complete ERP system setup and migration",
            25000, DealStage::Proposal, 75, Some(date(2024, 3, 15)), &customers[0],
        ),
        demo_deal(
            "CRM Integration Project", "CRM system integration with existing tools",
            15000, DealStage::Qualified, 60, Some(date(2024, 2, 28)), &customers[1],
        ),
        demo_deal(
            "WMS Consultation", "Warehouse management system consultation",
            8000, DealStage::Lead, 25, Some(date(2024, 4, 10)), &customers[2],
        ),
        demo_deal(
            "Cloud Migration", "Infrastructure move to the cloud",
            35000, DealStage::Negotiation, 80, Some(date(2024, 3, 1)), &customers[3],
        ),
        demo_deal(
            "Security Audit", "Annual security audit",
            12000, DealStage::ClosedWon, 100, Some(date(2024, 1, 20)), &customers[4],
        ),
    ];

    (customers, deals)
}

/// Atividades recentes da demonstração, uma por cliente, na ordem de `customers`.
pub fn demo_activities(customers: &[Customer]) -> Vec<Activity> {
    let entries = [
        ("Called Acme Corp", date(2024, 1, 15)),
        ("Email sent to Tech Solutions", date(2024, 1, 14)),
        ("Meeting scheduled", date(2024, 1, 13)),
        ("Proposal sent", date(2024, 1, 12)),
        ("Deal closed", date(2024, 1, 11)),
    ];

    customers
        .iter()
        .zip(entries)
        .map(|(customer, (subject, day))| Activity {
            id: Uuid::new_v4(),
            customer_id: customer.id,
            subject: subject.to_string(),
            date: day,
        })
        .collect()
}

/// Popula a fonte de dados com a demonstração, só se ela estiver vazia.
pub async fn seed_if_empty(source: &dyn CrmDataSource) -> Result<bool, AppError> {
    if !source.load_customers().await?.is_empty() {
        tracing::info!("Base já possui clientes, seed ignorado.");
        return Ok(false);
    }

    let (customers, deals) = demo_dataset();
    for customer in &customers {
        source.save_customer(customer).await?;
    }
    for deal in &deals {
        source.save_deal(deal).await?;
    }
    let activities = demo_activities(&customers);
    for activity in &activities {
        source.save_activity(activity).await?;
    }

    tracing::info!(
        "🌱 Seed aplicado: {} clientes, {} negócios, {} atividades.",
        customers.len(),
        deals.len(),
        activities.len()
    );
    Ok(true)
}
