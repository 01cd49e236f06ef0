// src/models/dashboard.rs

use serde::Serialize;
use utoipa::ToSchema;

// Contadores de reservas para o painel
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    #[schema(example = 42)]
    pub total: i64,
    #[schema(example = 5)]
    pub pending: i64,
    #[schema(example = 30)]
    pub confirmed: i64,
    #[schema(example = 7)]
    pub cancelled: i64,
}
