//! Testes de propriedade do motor do funil.
//!
//! Usam proptest para verificar invariantes sobre coleções geradas:
//! filtro, agrupamento por etapa, totais e transição de etapa.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crm_backend::{
    models::{
        crm::{Customer, CustomerStatus, StatusFilter},
        pipeline::{Deal, DealStage},
    },
    services::aggregator::{advance_stage, compute_analytics, filter_customers, group_deals_by_stage, stage_totals},
};

// Estratégias de geração
fn stage_strategy() -> impl Strategy<Value = DealStage> {
    prop::sample::select(DealStage::ALL.to_vec())
}

fn status_strategy() -> impl Strategy<Value = CustomerStatus> {
    prop::sample::select(CustomerStatus::ALL.to_vec())
}

fn value_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000, 0u32..3).prop_map(|(units, scale)| Decimal::new(units, scale))
}

fn customer_strategy() -> impl Strategy<Value = Customer> {
    (
        "[A-Za-z]{3,12}",
        "[a-z]{3,10}",
        prop::option::of("[A-Za-z ]{3,20}"),
        status_strategy(),
    )
        .prop_map(|(name, local, company, status)| Customer {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", local),
            name,
            phone: None,
            company,
            address: None,
            status,
            source: None,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        })
}

fn deal_strategy() -> impl Strategy<Value = Deal> {
    (value_strategy(), stage_strategy(), 0i32..=100).prop_map(|(value, stage, probability)| Deal {
        id: Uuid::new_v4(),
        title: "Deal".to_string(),
        description: None,
        value,
        stage,
        probability,
        close_date: None,
        customer_id: Uuid::nil(),
        assigned_to: None,
    })
}

// Propriedade: filtro
proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn empty_search_with_all_is_identity(customers in prop::collection::vec(customer_strategy(), 0..30)) {
        let filtered = filter_customers(&customers, Some(""), StatusFilter::All);
        let ids: Vec<Uuid> = filtered.iter().map(|c| c.id).collect();
        let expected: Vec<Uuid> = customers.iter().map(|c| c.id).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn company_substring_finds_its_customer(
        customers in prop::collection::vec(customer_strategy(), 1..30),
        pick in any::<prop::sample::Index>(),
        start in 0usize..3,
    ) {
        let target = pick.get(&customers);
        if let Some(company) = &target.company {
            let chars: Vec<char> = company.chars().collect();
            let from = start.min(chars.len() - 1);
            let needle: String = chars[from..].iter().collect::<String>().to_uppercase();

            let found = filter_customers(&customers, Some(&needle), StatusFilter::All);
            prop_assert!(found.iter().any(|c| c.id == target.id));
        }
    }

    #[test]
    fn status_filter_only_returns_that_status(
        customers in prop::collection::vec(customer_strategy(), 0..30),
        status in status_strategy(),
    ) {
        let found = filter_customers(&customers, None, StatusFilter::Only(status));
        prop_assert!(found.iter().all(|c| c.status == status));
        prop_assert_eq!(found.len(), customers.iter().filter(|c| c.status == status).count());
    }
}

// Propriedade: agrupamento e totais
proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn grouping_reconstructs_input(deals in prop::collection::vec(deal_strategy(), 0..50)) {
        let groups = group_deals_by_stage(&deals);
        prop_assert_eq!(groups.len(), 6);

        for (stage, bucket) in &groups {
            let expected: Vec<Uuid> = deals.iter().filter(|d| d.stage == *stage).map(|d| d.id).collect();
            let actual: Vec<Uuid> = bucket.iter().map(|d| d.id).collect();
            prop_assert_eq!(actual, expected);
        }

        let total: usize = groups.values().map(Vec::len).sum();
        prop_assert_eq!(total, deals.len());
    }

    #[test]
    fn totals_agree_with_groups(deals in prop::collection::vec(deal_strategy(), 0..50)) {
        let totals = stage_totals(&deals);
        let groups = group_deals_by_stage(&deals);

        for stage in DealStage::ALL {
            let sum: Decimal = groups[&stage].iter().map(|d| d.value).sum();
            prop_assert_eq!(totals[&stage].value, sum);
            prop_assert_eq!(totals[&stage].count, groups[&stage].len());
        }

        let analytics = compute_analytics(&[], &deals);
        let all: Decimal = totals.values().map(|t| t.value).sum();
        prop_assert_eq!(analytics.total_value, all);
        prop_assert!(analytics.conversion_rate >= 0.0 && analytics.conversion_rate <= 100.0);
    }
}

// Propriedade: transição de etapa
proptest! {
    #[test]
    fn advance_moves_exactly_one_step_or_stays(deal in deal_strategy()) {
        let advanced = advance_stage(&deal);

        if deal.stage.is_terminal() {
            prop_assert_eq!(&advanced, &deal);
        } else {
            prop_assert_eq!(advanced.stage.index(), deal.stage.index() + 1);
            prop_assert_ne!(advanced.stage, DealStage::ClosedLost);
            prop_assert_eq!(advanced.id, deal.id);
            prop_assert_eq!(advanced.value, deal.value);
        }
    }

    #[test]
    fn at_most_four_advances_reach_a_terminal_stage(deal in deal_strategy()) {
        let mut current = deal;
        for _ in 0..4 {
            current = advance_stage(&current);
        }
        prop_assert!(current.stage.is_terminal());
    }
}
