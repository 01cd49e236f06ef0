// src/services/booking_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BookingRepository, ScheduleRepository},
    models::{
        booking::{Booking, BookingDetail, BookingListItem, BookingStatus},
        dashboard::BookingSummary,
    },
};

// O motor de reservas concentra as duas sequências atômicas do sistema:
// reservar (checar + inserir + marcar) e cancelar-e-liberar. Nenhum estado
// intermediário é observável fora da transação.
#[derive(Clone)]
pub struct BookingService {
    repo: BookingRepository,
    schedule_repo: ScheduleRepository,
}

impl BookingService {
    pub fn new(repo: BookingRepository, schedule_repo: ScheduleRepository) -> Self {
        Self {
            repo,
            schedule_repo,
        }
    }

    // Reserva atômica. A linha do horário é travada dentro da transação:
    // de duas chamadas concorrentes para o mesmo horário, exatamente uma
    // confirma; a outra recebe `SlotUnavailable`.
    pub async fn create_booking<'e, E>(
        &self,
        executor: E,
        student_id: Uuid,
        schedule_id: Uuid,
    ) -> Result<Booking, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let slot = self
            .schedule_repo
            .lock_for_booking(&mut *tx, schedule_id)
            .await?
            .ok_or(AppError::NotFound("Horário"))?;

        if slot.is_booked {
            return Err(AppError::SlotUnavailable);
        }

        let booking = self.repo.insert(&mut *tx, student_id, schedule_id).await?;

        self.schedule_repo
            .set_booked(&mut *tx, schedule_id, true)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Reserva {} criada para o horário {}",
            booking.id,
            schedule_id
        );

        Ok(booking)
    }

    // Transição de status. Cancelamento libera o horário na mesma transação;
    // confirmação não toca o horário (já está marcado desde a reserva).
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        booking_id: Uuid,
        new_status: BookingStatus,
    ) -> Result<Booking, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let booking = self
            .repo
            .lock_by_id(&mut *tx, booking_id)
            .await?
            .ok_or(AppError::NotFound("Reserva"))?;

        if !booking.status.can_transition_to(new_status) {
            return Err(AppError::IllegalTransition {
                from: booking.status,
                to: new_status,
            });
        }

        self.repo.set_status(&mut *tx, booking_id, new_status).await?;

        if new_status == BookingStatus::Cancelled {
            self.schedule_repo
                .set_booked(&mut *tx, booking.schedule_id, false)
                .await?;
        }

        tx.commit().await?;

        Ok(Booking {
            status: new_status,
            ..booking
        })
    }

    pub async fn get_detail(&self, booking_id: Uuid) -> Result<BookingDetail, AppError> {
        self.repo
            .get_detail(booking_id)
            .await?
            .ok_or(AppError::NotFound("Reserva"))
    }

    pub async fn get_by_student(&self, student_id: Uuid) -> Result<Vec<BookingListItem>, AppError> {
        self.repo.get_by_student(student_id).await
    }

    pub async fn get_by_tutor(&self, tutor_id: Uuid) -> Result<Vec<BookingListItem>, AppError> {
        self.repo.get_by_tutor(tutor_id).await
    }

    pub async fn booking_summary(&self) -> Result<BookingSummary, AppError> {
        Ok(BookingSummary {
            total: self.repo.count_total().await?,
            pending: self.repo.count_by_status(BookingStatus::Pending).await?,
            confirmed: self.repo.count_by_status(BookingStatus::Confirmed).await?,
            cancelled: self.repo.count_by_status(BookingStatus::Cancelled).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveTime, Utc};
    use sqlx::postgres::PgPoolOptions;
    use sqlx::PgPool;

    // Estes testes exercitam as propriedades de concorrência contra um
    // Postgres real. Rodam com `cargo test -- --ignored` e exigem
    // DATABASE_URL apontando para um banco de testes.

    async fn test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .unwrap();
        sqlx::migrate!().run(&pool).await.unwrap();
        pool
    }

    fn service(pool: &PgPool) -> BookingService {
        BookingService::new(
            BookingRepository::new(pool.clone()),
            ScheduleRepository::new(pool.clone()),
        )
    }

    async fn seed_student(pool: &PgPool) -> Uuid {
        let suffix = Uuid::new_v4().simple().to_string();
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (name, email, role) VALUES ('Aluno Teste', $1, 'student') RETURNING id",
        )
        .bind(format!("aluno-{suffix}@teste.dev"))
        .fetch_one(pool)
        .await
        .unwrap()
    }

    // Tutor com um horário livre de uma hora, daqui a uma semana
    async fn seed_slot(pool: &PgPool) -> Uuid {
        let suffix = Uuid::new_v4().simple().to_string();
        let tutor_user = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (name, email, role) VALUES ('Tutor Teste', $1, 'tutor') RETURNING id",
        )
        .bind(format!("tutor-{suffix}@teste.dev"))
        .fetch_one(pool)
        .await
        .unwrap();

        let tutor_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO tutors (user_id, subject, hourly_rate) VALUES ($1, 'Matemática', 20.00) RETURNING id",
        )
        .bind(tutor_user)
        .fetch_one(pool)
        .await
        .unwrap();

        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO schedules (tutor_id, date, start_time, end_time) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(tutor_id)
        .bind(Utc::now().date_naive() + Duration::days(7))
        .bind(NaiveTime::from_hms_opt(9, 0, 0).unwrap())
        .bind(NaiveTime::from_hms_opt(10, 0, 0).unwrap())
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    #[ignore = "requer Postgres em DATABASE_URL"]
    async fn concurrent_bookings_cannot_share_a_slot() {
        let pool = test_pool().await;
        let service = service(&pool);
        let schedule_id = seed_slot(&pool).await;
        let student_a = seed_student(&pool).await;
        let student_b = seed_student(&pool).await;

        let (result_a, result_b) = tokio::join!(
            service.create_booking(&pool, student_a, schedule_id),
            service.create_booking(&pool, student_b, schedule_id),
        );

        let successes = [&result_a, &result_b]
            .iter()
            .filter(|r| r.is_ok())
            .count();
        assert_eq!(successes, 1, "exatamente uma reserva deve vencer");

        let loser = if result_a.is_ok() { result_b } else { result_a };
        assert!(matches!(loser, Err(AppError::SlotUnavailable)));

        let slot = ScheduleRepository::new(pool.clone())
            .find_by_id(schedule_id)
            .await
            .unwrap()
            .unwrap();
        assert!(slot.is_booked);
    }

    #[tokio::test]
    #[ignore = "requer Postgres em DATABASE_URL"]
    async fn cancelling_releases_the_slot_for_a_new_student() {
        let pool = test_pool().await;
        let service = service(&pool);
        let schedule_id = seed_slot(&pool).await;
        let student_a = seed_student(&pool).await;
        let student_b = seed_student(&pool).await;

        let booking = service
            .create_booking(&pool, student_a, schedule_id)
            .await
            .unwrap();

        service
            .update_status(&pool, booking.id, BookingStatus::Cancelled)
            .await
            .unwrap();

        let slot = ScheduleRepository::new(pool.clone())
            .find_by_id(schedule_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!slot.is_booked, "cancelamento deve liberar o horário");

        // Outro aluno consegue reservar o mesmo horário
        let rebooked = service.create_booking(&pool, student_b, schedule_id).await;
        assert!(rebooked.is_ok());
    }

    #[tokio::test]
    #[ignore = "requer Postgres em DATABASE_URL"]
    async fn status_machine_is_closed_under_updates() {
        let pool = test_pool().await;
        let service = service(&pool);
        let schedule_id = seed_slot(&pool).await;
        let student = seed_student(&pool).await;

        let booking = service
            .create_booking(&pool, student, schedule_id)
            .await
            .unwrap();

        let confirmed = service
            .update_status(&pool, booking.id, BookingStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);

        // confirmed -> confirmed não existe
        let again = service
            .update_status(&pool, booking.id, BookingStatus::Confirmed)
            .await;
        assert!(matches!(again, Err(AppError::IllegalTransition { .. })));

        service
            .update_status(&pool, booking.id, BookingStatus::Cancelled)
            .await
            .unwrap();

        // cancelled é terminal
        let out_of_terminal = service
            .update_status(&pool, booking.id, BookingStatus::Confirmed)
            .await;
        assert!(matches!(
            out_of_terminal,
            Err(AppError::IllegalTransition { .. })
        ));
    }
}
