// src/db/payment_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::payment::{Payment, PaymentHistoryEntry, PaymentMethod},
};

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>, AppError> {
        let payment = sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(payment)
    }

    pub async fn find_by_booking(&self, booking_id: Uuid) -> Result<Option<Payment>, AppError> {
        let payment = sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE booking_id = $1")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(payment)
    }

    pub async fn lock_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment =
            sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;

        Ok(payment)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        booking_id: Uuid,
        amount: Decimal,
        payment_method: PaymentMethod,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (booking_id, amount, payment_method, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(amount)
        .bind(payment_method)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Um pagamento por reserva: a constraint de unicidade segura
            // a submissão repetida.
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::PaymentAlreadyExists;
                }
            }
            AppError::DatabaseError(e)
        })
    }

    pub async fn mark_completed<'e, E>(&self, executor: E, id: Uuid) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET status = 'completed', paid_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    // Falha não registra `paid_at`; a linha fica disponível para reprocesso.
    pub async fn mark_failed<'e, E>(&self, executor: E, id: Uuid) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET status = 'failed'
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    pub async fn get_by_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<PaymentHistoryEntry>, AppError> {
        let payments = sqlx::query_as::<_, PaymentHistoryEntry>(
            r#"
            SELECT p.id, p.booking_id, p.amount, p.payment_method, p.status,
                   p.created_at, p.paid_at,
                   s.date, s.start_time, s.end_time,
                   t.subject, u.name AS counterpart_name
            FROM payments p
            JOIN bookings b ON p.booking_id = b.id
            JOIN schedules s ON b.schedule_id = s.id
            JOIN tutors t ON s.tutor_id = t.id
            JOIN users u ON t.user_id = u.id
            WHERE b.student_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    pub async fn get_by_tutor(&self, tutor_id: Uuid) -> Result<Vec<PaymentHistoryEntry>, AppError> {
        let payments = sqlx::query_as::<_, PaymentHistoryEntry>(
            r#"
            SELECT p.id, p.booking_id, p.amount, p.payment_method, p.status,
                   p.created_at, p.paid_at,
                   s.date, s.start_time, s.end_time,
                   t.subject, u.name AS counterpart_name
            FROM payments p
            JOIN bookings b ON p.booking_id = b.id
            JOIN schedules s ON b.schedule_id = s.id
            JOIN tutors t ON s.tutor_id = t.id
            JOIN users u ON b.student_id = u.id
            WHERE s.tutor_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(tutor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }
}
