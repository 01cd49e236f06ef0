// src/services/schedule_service.rs

use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ScheduleRepository,
    models::schedule::{self, RecurringOutcome, Schedule, ScheduleWithBooking, MIN_SLOT_MINUTES},
};

#[derive(Clone)]
pub struct ScheduleService {
    repo: ScheduleRepository,
}

impl ScheduleService {
    pub fn new(repo: ScheduleRepository) -> Self {
        Self { repo }
    }

    pub async fn create_slot<'e, E>(
        &self,
        executor: E,
        tutor_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Schedule, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        schedule::validate_slot(date, start_time, end_time, Utc::now().date_naive())?;

        self.repo
            .create(executor, tutor_id, date, start_time, end_time)
            .await
    }

    // Criação recorrente: expande o intervalo nos dias da semana escolhidos
    // e tenta cada data de forma independente. Melhor esforço, sem rollback
    // do lote: o resultado carrega os contadores de sucesso e falha.
    pub async fn create_recurring<'e, E>(
        &self,
        executor: E,
        tutor_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        days_of_week: &[u8],
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<RecurringOutcome, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        if end_time <= start_time {
            return Err(AppError::InvalidSchedule(
                "O horário de término deve ser após o horário de início",
            ));
        }

        if schedule::duration_minutes(start_time, end_time) < MIN_SLOT_MINUTES {
            return Err(AppError::InvalidSchedule(
                "O horário deve ter no mínimo 30 minutos",
            ));
        }

        if end_date < start_date {
            return Err(AppError::InvalidSchedule(
                "A data final deve ser igual ou posterior à data inicial",
            ));
        }

        if days_of_week.iter().any(|day| *day > 6) {
            return Err(AppError::InvalidSchedule(
                "Dia da semana inválido (use 0 = domingo até 6 = sábado)",
            ));
        }

        let today = Utc::now().date_naive();
        let dates = schedule::expand_recurring_dates(start_date, end_date, days_of_week);

        let mut conn = executor.acquire().await?;
        let mut slots = Vec::new();
        let mut failed_count = 0u32;

        for date in dates {
            if let Err(e) = schedule::validate_slot(date, start_time, end_time, today) {
                tracing::warn!("Criação recorrente pulou a data {}: {}", date, e);
                failed_count += 1;
                continue;
            }

            match self
                .repo
                .create(&mut *conn, tutor_id, date, start_time, end_time)
                .await
            {
                Ok(slot) => slots.push(slot),
                Err(e) => {
                    tracing::warn!("Falha ao criar horário recorrente em {}: {}", date, e);
                    failed_count += 1;
                }
            }
        }

        Ok(RecurringOutcome {
            created_count: slots.len() as u32,
            failed_count,
            slots,
        })
    }

    pub async fn update_slot<'e, E>(
        &self,
        executor: E,
        slot_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Schedule, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        schedule::validate_slot(date, start_time, end_time, Utc::now().date_naive())?;

        match self
            .repo
            .update_unbooked(executor, slot_id, date, start_time, end_time)
            .await?
        {
            Some(slot) => Ok(slot),
            // Zero linhas atualizadas: ou o horário não existe, ou está
            // reservado e não pode ser alterado.
            None => match self.repo.find_by_id(slot_id).await? {
                Some(_) => Err(AppError::SlotUnavailable),
                None => Err(AppError::NotFound("Horário")),
            },
        }
    }

    pub async fn delete_slot<'e, E>(&self, executor: E, slot_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let deleted = self.repo.delete_unbooked(executor, slot_id).await?;

        if deleted == 0 {
            return match self.repo.find_by_id(slot_id).await? {
                Some(_) => Err(AppError::SlotUnavailable),
                None => Err(AppError::NotFound("Horário")),
            };
        }

        Ok(())
    }

    pub async fn get_slot(&self, slot_id: Uuid) -> Result<Schedule, AppError> {
        self.repo
            .find_by_id(slot_id)
            .await?
            .ok_or(AppError::NotFound("Horário"))
    }

    pub async fn is_available(&self, slot_id: Uuid) -> Result<bool, AppError> {
        self.repo.is_available(slot_id).await
    }

    pub async fn get_available(
        &self,
        tutor_id: Uuid,
        from_date: Option<NaiveDate>,
    ) -> Result<Vec<Schedule>, AppError> {
        self.repo.get_available_by_tutor(tutor_id, from_date).await
    }

    pub async fn get_by_tutor(
        &self,
        tutor_id: Uuid,
        from_date: Option<NaiveDate>,
    ) -> Result<Vec<ScheduleWithBooking>, AppError> {
        self.repo.get_by_tutor(tutor_id, from_date).await
    }
}
