// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "CRM Backend", description = "Clientes, funil de vendas e painel"),
    paths(
        // --- Customers ---
        handlers::customers::list_customers,
        handlers::customers::list_customer_summaries,
        handlers::customers::create_customer,
        handlers::customers::get_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,

        // --- Deals ---
        handlers::deals::list_deals,
        handlers::deals::get_board,
        handlers::deals::create_deal,
        handlers::deals::get_deal,
        handlers::deals::update_deal,
        handlers::deals::delete_deal,
        handlers::deals::advance_deal,

        // --- Activities ---
        handlers::activities::list_activities,
        handlers::activities::log_activity,

        // --- Dashboard ---
        handlers::dashboard::get_overview,
    ),
    components(
        schemas(
            // --- Customers ---
            models::crm::CustomerStatus,
            models::crm::Customer,
            models::crm::CustomerDraft,
            models::crm::CustomerSummary,

            // --- Deals ---
            models::pipeline::DealStage,
            models::pipeline::Deal,
            models::pipeline::DealDraft,
            models::pipeline::StageTotal,
            models::pipeline::StageColumn,
            models::pipeline::PipelineBoard,

            // --- Activities ---
            models::activity::Activity,
            models::activity::ActivityDraft,
            models::activity::ActivityFeedItem,

            // --- Dashboard ---
            models::dashboard::Analytics,
            models::dashboard::DashboardOverview,
        )
    ),
    tags(
        (name = "Customers", description = "Cadastro e busca de clientes"),
        (name = "Deals", description = "Negócios e quadro do funil"),
        (name = "Activities", description = "Interações registradas com clientes"),
        (name = "Dashboard", description = "Métricas consolidadas"),
    )
)]
pub struct ApiDoc;
