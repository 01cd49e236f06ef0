// src/db/schedule_repo.rs

use chrono::{NaiveDate, NaiveTime};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::schedule::{Schedule, ScheduleWithBooking},
};

// O repositório de horários, responsável pela tabela 'schedules'.
// Leituras usam a pool direto; escritas recebem o executor de quem chama,
// para poderem participar de uma transação maior.
#[derive(Clone)]
pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Schedule>, AppError> {
        let slot = sqlx::query_as::<_, Schedule>("SELECT * FROM schedules WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(slot)
    }

    pub async fn create<'e, E>(
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
        let slot = sqlx::query_as::<_, Schedule>(
            r#"
            INSERT INTO schedules (tutor_id, date, start_time, end_time)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(tutor_id)
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .fetch_one(executor)
        .await?;

        Ok(slot)
    }

    // Horários reservados são imutáveis: o guard `is_booked = FALSE` vai na
    // própria query, sem janela entre checagem e escrita. `None` significa
    // que nenhuma linha livre com esse id existia.
    pub async fn update_unbooked<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Option<Schedule>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slot = sqlx::query_as::<_, Schedule>(
            r#"
            UPDATE schedules
            SET date = $1, start_time = $2, end_time = $3
            WHERE id = $4 AND is_booked = FALSE
            RETURNING *
            "#,
        )
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(slot)
    }

    pub async fn delete_unbooked<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1 AND is_booked = FALSE")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    // Trava a linha do horário dentro da transação de reserva. Duas reservas
    // concorrentes serializam aqui: a segunda só lê depois do commit da
    // primeira e encontra `is_booked = true`.
    pub async fn lock_for_booking<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Schedule>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slot = sqlx::query_as::<_, Schedule>("SELECT * FROM schedules WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(slot)
    }

    // Só o motor de reservas escreve este campo.
    pub async fn set_booked<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        booked: bool,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE schedules SET is_booked = $1 WHERE id = $2")
            .bind(booked)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn is_available(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self
            .find_by_id(id)
            .await?
            .map(|slot| !slot.is_booked)
            .unwrap_or(false))
    }

    pub async fn get_available_by_tutor(
        &self,
        tutor_id: Uuid,
        from_date: Option<NaiveDate>,
    ) -> Result<Vec<Schedule>, AppError> {
        let slots = sqlx::query_as::<_, Schedule>(
            r#"
            SELECT * FROM schedules
            WHERE tutor_id = $1
              AND is_booked = FALSE
              AND ($2::date IS NULL OR date >= $2)
            ORDER BY date ASC, start_time ASC
            "#,
        )
        .bind(tutor_id)
        .bind(from_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(slots)
    }

    // Agenda completa do tutor, com o id da reserva ativa de cada horário
    pub async fn get_by_tutor(
        &self,
        tutor_id: Uuid,
        from_date: Option<NaiveDate>,
    ) -> Result<Vec<ScheduleWithBooking>, AppError> {
        let slots = sqlx::query_as::<_, ScheduleWithBooking>(
            r#"
            SELECT s.*, b.id AS booking_id
            FROM schedules s
            LEFT JOIN bookings b
                   ON b.schedule_id = s.id AND b.status <> 'cancelled'
            WHERE s.tutor_id = $1
              AND ($2::date IS NULL OR s.date >= $2)
            ORDER BY s.date ASC, s.start_time ASC
            "#,
        )
        .bind(tutor_id)
        .bind(from_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(slots)
    }
}
