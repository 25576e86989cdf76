// src/services/aggregator.rs

//! Motor do funil: funções puras sobre fatias de clientes e negócios.
//!
//! Nada aqui toca em banco ou guarda estado. Quem chama carrega os
//! registros do `CrmDataSource`, aplica a função e grava o resultado.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    models::{
        activity::{Activity, ActivityDraft, ActivityFeedItem},
        crm::{Customer, CustomerDraft, CustomerStatus, CustomerSummary, StatusFilter},
        dashboard::Analytics,
        pipeline::{Deal, DealDraft, DealStage, PipelineBoard, StageColumn, StageTotal},
    },
};

// =========================================================================
//  1. CLIENTES
// =========================================================================

/// Filtra clientes por termo de busca e status, preservando a ordem original.
///
/// O termo é comparado sem diferenciar maiúsculas contra nome, e-mail e
/// empresa (basta um campo conter o termo). Termo ausente ou vazio aceita tudo.
pub fn filter_customers<'a>(
    customers: &'a [Customer],
    search_term: Option<&str>,
    status_filter: StatusFilter,
) -> Vec<&'a Customer> {
    let needle = search_term.map(str::to_lowercase).unwrap_or_default();

    customers
        .iter()
        .filter(|customer| matches_search(customer, &needle))
        .filter(|customer| status_filter.matches(customer.status))
        .collect()
}

fn matches_search(customer: &Customer, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    customer.name.to_lowercase().contains(needle)
        || customer.email.to_lowercase().contains(needle)
        || customer
            .company
            .as_deref()
            .is_some_and(|company| company.to_lowercase().contains(needle))
}

// Comparação exata: só os espaços das pontas são descartados (pelo `normalized`)
fn email_taken<'a>(mut others: impl Iterator<Item = &'a Customer>, email: &str) -> bool {
    others.any(|c| c.email == email)
}

/// Valida e cria um cliente novo. Não altera `existing`: quem chama decide se grava.
pub fn create_customer(existing: &[Customer], candidate: &CustomerDraft) -> Result<Customer, AppError> {
    let draft = candidate.normalized();
    draft.validate()?;

    if email_taken(existing.iter(), &draft.email) {
        return Err(AppError::EmailAlreadyExists(draft.email));
    }

    Ok(Customer {
        id: Uuid::new_v4(),
        name: draft.name,
        email: draft.email,
        phone: draft.phone,
        company: draft.company,
        address: draft.address,
        status: draft.status.unwrap_or_default(),
        source: draft.source,
        created_at: Utc::now().date_naive(),
    })
}

/// Substituição completa do registro: mantém `id` e `created_at`.
/// O e-mail continua único, ignorando o próprio registro.
pub fn replace_customer(
    existing: &[Customer],
    current: &Customer,
    candidate: &CustomerDraft,
) -> Result<Customer, AppError> {
    let draft = candidate.normalized();
    draft.validate()?;

    if email_taken(existing.iter().filter(|c| c.id != current.id), &draft.email) {
        return Err(AppError::EmailAlreadyExists(draft.email));
    }

    Ok(Customer {
        id: current.id,
        name: draft.name,
        email: draft.email,
        phone: draft.phone,
        company: draft.company,
        address: draft.address,
        status: draft.status.unwrap_or(current.status),
        source: draft.source,
        created_at: current.created_at,
    })
}

/// Contadores por cliente recalculados a partir dos negócios e atividades.
pub fn customer_summaries(
    customers: &[Customer],
    deals: &[Deal],
    activities: &[Activity],
) -> Vec<CustomerSummary> {
    customers
        .iter()
        .map(|customer| {
            let (deals_count, total_value) = deals
                .iter()
                .filter(|deal| deal.customer_id == customer.id)
                .fold((0, Decimal::ZERO), |(count, sum), deal| (count + 1, sum + deal.value));

            let activities_count = activities
                .iter()
                .filter(|activity| activity.customer_id == customer.id)
                .count();

            CustomerSummary {
                customer: customer.clone(),
                deals_count,
                total_value,
                activities_count,
            }
        })
        .collect()
}

// =========================================================================
//  2. NEGÓCIOS (FUNIL)
// =========================================================================

/// Separa os negócios nas seis etapas. Todas as chaves estão sempre
/// presentes, e a ordem de inserção é mantida dentro de cada etapa.
pub fn group_deals_by_stage(deals: &[Deal]) -> BTreeMap<DealStage, Vec<Deal>> {
    let mut groups: BTreeMap<DealStage, Vec<Deal>> =
        DealStage::ALL.into_iter().map(|stage| (stage, Vec::new())).collect();

    for deal in deals {
        groups.entry(deal.stage).or_default().push(deal.clone());
    }

    groups
}

pub fn stage_totals(deals: &[Deal]) -> BTreeMap<DealStage, StageTotal> {
    let mut totals: BTreeMap<DealStage, StageTotal> =
        DealStage::ALL.into_iter().map(|stage| (stage, StageTotal::default())).collect();

    for deal in deals {
        let total = totals.entry(deal.stage).or_default();
        total.count += 1;
        total.value += deal.value;
    }

    totals
}

/// Quadro do funil: uma coluna por etapa, já com contagem e soma.
pub fn pipeline_board(deals: &[Deal]) -> PipelineBoard {
    let columns = group_deals_by_stage(deals)
        .into_iter()
        .map(|(stage, stage_deals)| StageColumn {
            stage,
            label: stage.label().to_string(),
            count: stage_deals.len(),
            value: stage_deals.iter().map(|d| d.value).sum(),
            deals: stage_deals,
        })
        .collect();

    PipelineBoard {
        total_deals: deals.len(),
        columns,
    }
}

/// Devolve uma cópia do negócio na próxima etapa.
///
/// Em `closed_won` e `closed_lost` o negócio volta igual (no-op).
/// Não grava nada: persistir o retorno é responsabilidade de quem chama.
pub fn advance_stage(deal: &Deal) -> Deal {
    match deal.stage.next() {
        Some(next) => Deal {
            stage: next,
            ..deal.clone()
        },
        None => deal.clone(),
    }
}

/// Valida o rascunho e monta um negócio novo (etapa padrão: lead).
/// A existência do cliente é checada pelo serviço, que tem acesso ao repositório.
pub fn create_deal(candidate: &DealDraft) -> Result<Deal, AppError> {
    let draft = candidate.normalized();
    draft.validate()?;

    Ok(Deal {
        id: Uuid::new_v4(),
        title: draft.title,
        description: draft.description,
        value: draft.value,
        stage: draft.stage.unwrap_or_default(),
        probability: draft.probability,
        close_date: draft.close_date,
        customer_id: draft.customer_id,
        assigned_to: draft.assigned_to,
    })
}

pub fn replace_deal(current: &Deal, candidate: &DealDraft) -> Result<Deal, AppError> {
    let draft = candidate.normalized();
    draft.validate()?;

    Ok(Deal {
        id: current.id,
        title: draft.title,
        description: draft.description,
        value: draft.value,
        stage: draft.stage.unwrap_or(current.stage),
        probability: draft.probability,
        close_date: draft.close_date,
        customer_id: draft.customer_id,
        assigned_to: draft.assigned_to,
    })
}

// =========================================================================
//  3. ATIVIDADES
// =========================================================================

/// Valida e monta uma atividade nova (data padrão: hoje).
/// Assim como nos negócios, o serviço confere se o cliente existe.
pub fn create_activity(candidate: &ActivityDraft) -> Result<Activity, AppError> {
    let draft = candidate.normalized();
    draft.validate()?;

    Ok(Activity {
        id: Uuid::new_v4(),
        customer_id: draft.customer_id,
        subject: draft.subject,
        date: draft.date.unwrap_or_else(|| Utc::now().date_naive()),
    })
}

/// Feed do painel: as `limit` atividades mais recentes, com o nome do cliente.
/// Empates de data mantêm a ordem de registro.
pub fn recent_activities(
    activities: &[Activity],
    customers: &[Customer],
    limit: usize,
) -> Vec<ActivityFeedItem> {
    let mut sorted: Vec<&Activity> = activities.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    sorted
        .into_iter()
        .filter_map(|activity| {
            let customer = customers.iter().find(|c| c.id == activity.customer_id)?;
            Some(ActivityFeedItem {
                activity: activity.clone(),
                customer_name: customer.name.clone(),
            })
        })
        .take(limit)
        .collect()
}

// =========================================================================
//  4. PAINEL
// =========================================================================

pub fn compute_analytics(customers: &[Customer], deals: &[Deal]) -> Analytics {
    let total_customers = customers.len();
    let active_customers = customers
        .iter()
        .filter(|c| c.status == CustomerStatus::Active)
        .count();

    let total_deals = deals.len();
    let won: Vec<&Deal> = deals.iter().filter(|d| d.stage == DealStage::ClosedWon).collect();
    let closed_deals = won.len();

    let total_value: Decimal = deals.iter().map(|d| d.value).sum();
    let closed_value: Decimal = won.iter().map(|d| d.value).sum();

    // Sem negócios, taxa e ticket médio ficam em zero (nada de divisão por zero)
    let (conversion_rate, avg_deal_size) = if total_deals == 0 {
        (0.0, 0.0)
    } else {
        (
            closed_deals as f64 / total_deals as f64 * 100.0,
            total_value.to_f64().unwrap_or_default() / total_deals as f64,
        )
    };

    Analytics {
        total_customers,
        active_customers,
        total_deals,
        closed_deals,
        total_value,
        closed_value,
        conversion_rate,
        avg_deal_size,
    }
}
