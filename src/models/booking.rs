// src/models/booking.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    // Máquina de estados da reserva. `cancelled` é terminal; `confirmed`
    // só sai para `cancelled`.
    pub fn can_transition_to(self, new_status: BookingStatus) -> bool {
        matches!(
            (self, new_status),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    pub student_id: Uuid,
    pub schedule_id: Uuid,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

// Projeção completa: reserva + horário + tutor + dados dos dois usuários
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetail {
    pub id: Uuid,
    pub student_id: Uuid,
    pub schedule_id: Uuid,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub tutor_id: Uuid,
    pub tutor_user_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2025-06-10")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "10:00:00")]
    pub end_time: NaiveTime,
    #[schema(example = "Matemática")]
    pub subject: String,
    #[schema(example = "20.00")]
    pub hourly_rate: Decimal,
    #[schema(example = "Ana Souza")]
    pub student_name: String,
    pub student_email: String,
    #[schema(example = "Carlos Lima")]
    pub tutor_name: String,
    pub tutor_email: String,
}

// Item de listagem: o `counterpart_name` é o tutor quando a lista é do
// aluno, e o aluno quando a lista é do tutor.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingListItem {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = Date, example = "2025-06-10")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "10:00:00")]
    pub end_time: NaiveTime,
    #[schema(example = "Matemática")]
    pub subject: String,
    #[schema(example = "20.00")]
    pub hourly_rate: Decimal,
    pub counterpart_name: String,
}

#[cfg(test)]
mod tests {
    use super::BookingStatus::*;

    #[test]
    fn pending_can_be_confirmed_or_cancelled() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
    }

    #[test]
    fn confirmed_can_only_be_cancelled() {
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Confirmed));
    }

    #[test]
    fn cancelled_is_terminal() {
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn no_self_transitions() {
        for status in [Pending, Confirmed, Cancelled] {
            assert!(!status.can_transition_to(status));
        }
    }
}
