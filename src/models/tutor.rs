// src/models/tutor.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Perfil de tutor. O cadastro em si é feito fora deste serviço; aqui o
// perfil é lido para checagens de posse e para derivar o valor da sessão.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tutor {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "Matemática")]
    pub subject: String,
    #[schema(example = "20.00")]
    pub hourly_rate: Decimal,
    pub created_at: DateTime<Utc>,
}
