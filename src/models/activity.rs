// src/models/activity.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

// --- ATIVIDADE (interação registrada com um cliente) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    pub customer_id: Uuid,

    #[schema(example = "Called Acme Corp")]
    pub subject: String,

    #[schema(value_type = String, format = Date, example = "2024-01-15")]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDraft {
    pub customer_id: Uuid,

    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Meeting scheduled")]
    pub subject: String,

    // Ausente = hoje
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
}

impl ActivityDraft {
    pub(crate) fn normalized(&self) -> Self {
        Self {
            subject: self.subject.trim().to_string(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ActivityQuery {
    /// Só as atividades deste cliente
    pub customer_id: Option<Uuid>,
}

// Linha do feed "Recent Activities" do painel
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFeedItem {
    #[serde(flatten)]
    pub activity: Activity,
    pub customer_name: String,
}
