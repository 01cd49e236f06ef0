// src/db/booking_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::booking::{Booking, BookingDetail, BookingListItem, BookingStatus},
};

#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    pub async fn lock_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Booking>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let booking =
            sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;

        Ok(booking)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        student_id: Uuid,
        schedule_id: Uuid,
    ) -> Result<Booking, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (student_id, schedule_id, status)
            VALUES ($1, $2, 'pending')
            RETURNING *
            "#,
        )
        .bind(student_id)
        .bind(schedule_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // O índice parcial de unicidade é o backstop contra corridas:
            // violação aqui significa que outra reserva ativa chegou antes.
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::SlotUnavailable;
                }
            }
            AppError::DatabaseError(e)
        })
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE bookings SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    // Projeção completa para a página da reserva: horário, tutor e os dois
    // usuários envolvidos.
    pub async fn get_detail(&self, id: Uuid) -> Result<Option<BookingDetail>, AppError> {
        let detail = sqlx::query_as::<_, BookingDetail>(
            r#"
            SELECT b.id, b.student_id, b.schedule_id, b.status, b.created_at,
                   s.tutor_id, t.user_id AS tutor_user_id,
                   s.date, s.start_time, s.end_time,
                   t.subject, t.hourly_rate,
                   u.name AS student_name, u.email AS student_email,
                   tu.name AS tutor_name, tu.email AS tutor_email
            FROM bookings b
            JOIN schedules s ON b.schedule_id = s.id
            JOIN users u ON b.student_id = u.id
            JOIN tutors t ON s.tutor_id = t.id
            JOIN users tu ON t.user_id = tu.id
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(detail)
    }

    pub async fn get_by_student(&self, student_id: Uuid) -> Result<Vec<BookingListItem>, AppError> {
        let bookings = sqlx::query_as::<_, BookingListItem>(
            r#"
            SELECT b.id, b.schedule_id, b.status, b.created_at,
                   s.date, s.start_time, s.end_time,
                   t.subject, t.hourly_rate,
                   u.name AS counterpart_name
            FROM bookings b
            JOIN schedules s ON b.schedule_id = s.id
            JOIN tutors t ON s.tutor_id = t.id
            JOIN users u ON t.user_id = u.id
            WHERE b.student_id = $1
            ORDER BY s.date DESC, s.start_time DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn get_by_tutor(&self, tutor_id: Uuid) -> Result<Vec<BookingListItem>, AppError> {
        let bookings = sqlx::query_as::<_, BookingListItem>(
            r#"
            SELECT b.id, b.schedule_id, b.status, b.created_at,
                   s.date, s.start_time, s.end_time,
                   t.subject, t.hourly_rate,
                   u.name AS counterpart_name
            FROM bookings b
            JOIN schedules s ON b.schedule_id = s.id
            JOIN tutors t ON s.tutor_id = t.id
            JOIN users u ON b.student_id = u.id
            WHERE s.tutor_id = $1
            ORDER BY s.date DESC, s.start_time DESC
            "#,
        )
        .bind(tutor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn count_total(&self) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    pub async fn count_by_status(&self, status: BookingStatus) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }
}
