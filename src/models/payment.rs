// src/models/payment.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums (mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

// Métodos reconhecidos pela plataforma. Valores fora do conjunto morrem
// na desserialização, antes de qualquer escrita.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Gopay,
    Dana,
    BankTransfer,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    pub booking_id: Uuid,
    #[schema(example = "20.00")]
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

// Histórico de pagamentos: pagamento + dados da sessão correspondente
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHistoryEntry {
    pub id: Uuid,
    pub booking_id: Uuid,
    #[schema(example = "20.00")]
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    #[schema(value_type = String, format = Date, example = "2025-06-10")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "10:00:00")]
    pub end_time: NaiveTime,
    #[schema(example = "Matemática")]
    pub subject: String,
    pub counterpart_name: String,
}

// O que a tela de pagamento precisa: o valor devido (sempre recalculado no
// servidor) e o pagamento já registrado, se houver
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentQuote {
    #[schema(example = "20.00")]
    pub amount: Decimal,
    pub payment: Option<Payment>,
}

// Valor devido: tarifa horária x duração da sessão (horas inteiras mais
// fração de minutos), arredondado a 2 casas para cima no meio-termo.
// O valor nunca vem do usuário.
pub fn calculate_amount(
    start_time: NaiveTime,
    end_time: NaiveTime,
    hourly_rate: Decimal,
) -> Decimal {
    let minutes = end_time.signed_duration_since(start_time).num_minutes();
    let hours = Decimal::from(minutes) / Decimal::from(60);

    (hourly_rate * hours).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn ninety_minutes_at_eight() {
        let amount = calculate_amount(t(9, 0), t(10, 30), dec("8.00"));
        assert_eq!(amount, dec("12.00"));
    }

    #[test]
    fn forty_five_minutes_at_ten() {
        let amount = calculate_amount(t(14, 0), t(14, 45), dec("10.00"));
        assert_eq!(amount, dec("7.50"));
    }

    #[test]
    fn whole_hour() {
        let amount = calculate_amount(t(9, 0), t(10, 0), dec("20.00"));
        assert_eq!(amount, dec("20.00"));
    }

    #[test]
    fn midpoint_rounds_up() {
        // 45 min a 9.90/h = 7.425 exato -> 7.43
        let amount = calculate_amount(t(9, 0), t(9, 45), dec("9.90"));
        assert_eq!(amount, dec("7.43"));
    }

    #[test]
    fn two_hours_at_fractional_rate() {
        let amount = calculate_amount(t(8, 0), t(10, 0), dec("17.25"));
        assert_eq!(amount, dec("34.50"));
    }
}
