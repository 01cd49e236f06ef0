// src/models/review.rs

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Janela em que a avaliação ainda pode ser editada pelo aluno
pub const EDIT_WINDOW_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    pub booking_id: Uuid,
    #[schema(example = 5, minimum = 1, maximum = 5)]
    pub rating: i16,
    #[schema(example = "Excelente aula, muito didático!")]
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

// Resposta de leitura: a avaliação mais os campos derivados do relógio.
// Nada disso é persistido; é recalculado a cada chamada.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithEditability {
    #[serde(flatten)]
    pub review: Review,
    #[schema(example = true)]
    pub is_editable: bool,
    #[schema(example = 23)]
    pub remaining_edit_hours: i64,
}

// A avaliação é editável estritamente dentro de 24h da criação:
// 23h59m ainda edita, 24h00m em diante não.
pub fn is_editable_at(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(created_at) < Duration::hours(EDIT_WINDOW_HOURS)
}

// Horas inteiras restantes, para exibição. A conta usa horas completas:
// com 23h59m decorridos ainda resta 1 hora.
pub fn remaining_edit_hours(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed_hours = now.signed_duration_since(created_at).num_hours();
    (EDIT_WINDOW_HOURS - elapsed_hours).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn editable_right_after_creation() {
        let now = t0();
        assert!(is_editable_at(t0(), now));
        assert_eq!(remaining_edit_hours(t0(), now), 24);
    }

    #[test]
    fn editable_at_23h59m() {
        let now = t0() + Duration::hours(23) + Duration::minutes(59);
        assert!(is_editable_at(t0(), now));
        assert_eq!(remaining_edit_hours(t0(), now), 1);
    }

    #[test]
    fn not_editable_at_exactly_24h() {
        let now = t0() + Duration::hours(24);
        assert!(!is_editable_at(t0(), now));
        assert_eq!(remaining_edit_hours(t0(), now), 0);
    }

    #[test]
    fn not_editable_after_window() {
        let now = t0() + Duration::hours(25);
        assert!(!is_editable_at(t0(), now));
        assert_eq!(remaining_edit_hours(t0(), now), 0);
    }
}
