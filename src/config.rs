// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    db::{seed, CrmDataSource, InMemoryCrmRepository, PgCrmRepository},
    services::{crm_service::CrmService, dashboard_service::DashboardService, pipeline_service::PipelineService},
};

// Configurações lidas do ambiente (.env incluso)
#[derive(Debug, Clone)]
pub struct Config {
    // Sem DATABASE_URL a aplicação roda com o repositório em memória
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub seed_demo_data: bool,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let seed_demo_data = match env::var("SEED_DEMO_DATA") {
            Ok(value) => parse_flag(&value)
                .with_context(|| format!("SEED_DEMO_DATA inválido: '{}'", value))?,
            Err(_) => true,
        };

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: '{}'", value))?,
            Err(_) => 5,
        };

        Ok(Self {
            database_url,
            bind_addr,
            seed_demo_data,
            db_max_connections,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Clone)]
pub struct AppState {
    pub crm_service: CrmService,
    pub pipeline_service: PipelineService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let data_source: Arc<dyn CrmDataSource> = match &config.database_url {
            Some(database_url) => {
                let db_pool = PgPoolOptions::new()
                    .max_connections(config.db_max_connections)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await?;

                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                // Faz o app rodar as migrações do SQLx na inicialização
                sqlx::migrate!("./migrations").run(&db_pool).await?;
                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                Arc::new(PgCrmRepository::new(db_pool))
            }
            None => {
                tracing::warn!("DATABASE_URL ausente: usando repositório em memória.");
                Arc::new(InMemoryCrmRepository::new())
            }
        };

        if config.seed_demo_data {
            seed::seed_if_empty(data_source.as_ref()).await?;
        }

        Ok(Self::from_data_source(data_source))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_data_source(data_source: Arc<dyn CrmDataSource>) -> Self {
        Self {
            crm_service: CrmService::new(data_source.clone()),
            pipeline_service: PipelineService::new(data_source.clone()),
            dashboard_service: DashboardService::new(data_source),
        }
    }
}
