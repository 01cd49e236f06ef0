// src/models/schedule.rs

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

// Duração mínima de um horário de tutoria
pub const MIN_SLOT_MINUTES: i64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    pub tutor_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2025-06-10")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "10:00:00")]
    pub end_time: NaiveTime,
    #[schema(example = false)]
    pub is_booked: bool,
    pub created_at: DateTime<Utc>,
}

// Projeção da agenda do tutor: cada horário com a reserva ativa (se houver)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleWithBooking {
    pub id: Uuid,
    pub tutor_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2025-06-10")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "10:00:00")]
    pub end_time: NaiveTime,
    pub is_booked: bool,
    pub created_at: DateTime<Utc>,
    // Reserva não cancelada apontando para este horário
    pub booking_id: Option<Uuid>,
}

// Resultado da criação recorrente: melhor esforço, sem rollback entre datas
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecurringOutcome {
    #[schema(example = 8)]
    pub created_count: u32,
    #[schema(example = 1)]
    pub failed_count: u32,
    pub slots: Vec<Schedule>,
}

pub fn duration_minutes(start_time: NaiveTime, end_time: NaiveTime) -> i64 {
    end_time.signed_duration_since(start_time).num_minutes()
}

// Validação semântica de um horário. A validação de formato já aconteceu na
// desserialização; aqui entram as regras de negócio. O `today` vem de fora
// para manter a função determinística.
pub fn validate_slot(
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    today: NaiveDate,
) -> Result<(), AppError> {
    if date < today {
        return Err(AppError::InvalidSchedule(
            "Não é possível agendar em datas passadas",
        ));
    }

    if end_time <= start_time {
        return Err(AppError::InvalidSchedule(
            "O horário de término deve ser após o horário de início",
        ));
    }

    if duration_minutes(start_time, end_time) < MIN_SLOT_MINUTES {
        return Err(AppError::InvalidSchedule(
            "O horário deve ter no mínimo 30 minutos",
        ));
    }

    Ok(())
}

// Expande o intervalo de datas para os dias da semana selecionados.
// Dias seguem a convenção do formulário: 0 = domingo .. 6 = sábado.
pub fn expand_recurring_dates(
    start_date: NaiveDate,
    end_date: NaiveDate,
    days_of_week: &[u8],
) -> Vec<NaiveDate> {
    start_date
        .iter_days()
        .take_while(|d| *d <= end_date)
        .filter(|d| days_of_week.contains(&(d.weekday().num_days_from_sunday() as u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn rejects_past_date() {
        let result = validate_slot(d(2025, 6, 9), t(9, 0), t(10, 0), d(2025, 6, 10));
        assert!(matches!(result, Err(AppError::InvalidSchedule(_))));
    }

    #[test]
    fn accepts_today() {
        let today = d(2025, 6, 10);
        assert!(validate_slot(today, t(9, 0), t(10, 0), today).is_ok());
    }

    #[test]
    fn rejects_end_before_start() {
        let today = d(2025, 6, 1);
        let result = validate_slot(d(2025, 6, 10), t(10, 0), t(9, 0), today);
        assert!(matches!(result, Err(AppError::InvalidSchedule(_))));
    }

    #[test]
    fn rejects_equal_start_and_end() {
        let today = d(2025, 6, 1);
        let result = validate_slot(d(2025, 6, 10), t(9, 0), t(9, 0), today);
        assert!(matches!(result, Err(AppError::InvalidSchedule(_))));
    }

    #[test]
    fn rejects_below_minimum_duration() {
        let today = d(2025, 6, 1);
        let result = validate_slot(d(2025, 6, 10), t(9, 0), t(9, 29), today);
        assert!(matches!(result, Err(AppError::InvalidSchedule(_))));
    }

    #[test]
    fn accepts_exactly_thirty_minutes() {
        let today = d(2025, 6, 1);
        assert!(validate_slot(d(2025, 6, 10), t(9, 0), t(9, 30), today).is_ok());
    }

    #[test]
    fn expands_selected_weekdays_only() {
        // 2025-06-02 é segunda-feira; duas semanas, segundas (1) e quartas (3)
        let dates = expand_recurring_dates(d(2025, 6, 2), d(2025, 6, 15), &[1, 3]);
        assert_eq!(
            dates,
            vec![d(2025, 6, 2), d(2025, 6, 4), d(2025, 6, 9), d(2025, 6, 11)]
        );
    }

    #[test]
    fn expansion_includes_boundary_dates() {
        // Intervalo de um único dia que cai no dia selecionado
        let sunday = d(2025, 6, 8);
        let dates = expand_recurring_dates(sunday, sunday, &[0]);
        assert_eq!(dates, vec![sunday]);
    }

    #[test]
    fn expansion_is_empty_without_matching_days() {
        let dates = expand_recurring_dates(d(2025, 6, 2), d(2025, 6, 6), &[0, 6]);
        assert!(dates.is_empty());
    }
}
