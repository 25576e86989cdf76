// src/routes.rs

use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn build_router(app_state: AppState) -> Router {
    // Gestão de Clientes
    let customer_routes: Router<AppState> = Router::new()
        .route("/api/customers"
               ,get(handlers::customers::list_customers)
               .post(handlers::customers::create_customer)
        )
        .route("/api/customers/summaries", get(handlers::customers::list_customer_summaries))
        .route("/api/customers/{id}"
               ,get(handlers::customers::get_customer)
               .put(handlers::customers::update_customer)
               .delete(handlers::customers::delete_customer)
        );

    // Funil de vendas
    let deal_routes: Router<AppState> = Router::new()
        .route("/api/deals"
               ,get(handlers::deals::list_deals)
               .post(handlers::deals::create_deal)
        )
        .route("/api/deals/board", get(handlers::deals::get_board))
        .route("/api/deals/{id}"
               ,get(handlers::deals::get_deal)
               .put(handlers::deals::update_deal)
               .delete(handlers::deals::delete_deal)
        )
        .route("/api/deals/{id}/advance", post(handlers::deals::advance_deal));

    // Atividades
    let activity_routes: Router<AppState> = Router::new()
        .route("/api/activities"
               ,get(handlers::activities::list_activities)
               .post(handlers::activities::log_activity)
        );

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/api/dashboard", get(handlers::dashboard::get_overview))
        .merge(customer_routes)
        .merge(deal_routes)
        .merge(activity_routes)
        .with_state(app_state)
}
