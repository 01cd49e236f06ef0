// src/services/review_service.rs

use chrono::Utc;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BookingRepository, ReviewRepository},
    models::{
        booking::BookingStatus,
        review::{self, Review, ReviewWithEditability},
    },
};

// Porteiro das avaliações: só reservas confirmadas recebem avaliação, uma
// por reserva, editável nas primeiras 24 horas.
#[derive(Clone)]
pub struct ReviewService {
    repo: ReviewRepository,
    booking_repo: BookingRepository,
}

impl ReviewService {
    pub fn new(repo: ReviewRepository, booking_repo: BookingRepository) -> Self {
        Self { repo, booking_repo }
    }

    pub async fn add_review<'e, E>(
        &self,
        executor: E,
        booking_id: Uuid,
        rating: i16,
        comment: &str,
    ) -> Result<Review, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or(AppError::NotFound("Reserva"))?;

        if booking.status != BookingStatus::Confirmed {
            return Err(AppError::BookingNotConfirmed);
        }

        if self.repo.find_by_booking(booking_id).await?.is_some() {
            return Err(AppError::AlreadyReviewed);
        }

        // A constraint de unicidade no banco cobre a corrida entre a
        // checagem acima e o insert.
        self.repo.insert(executor, booking_id, rating, comment).await
    }

    pub async fn update_review<'e, E>(
        &self,
        executor: E,
        review_id: Uuid,
        rating: i16,
        comment: &str,
    ) -> Result<Review, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let review = self
            .repo
            .find_by_id(review_id)
            .await?
            .ok_or(AppError::NotFound("Avaliação"))?;

        if !review::is_editable_at(review.created_at, Utc::now()) {
            return Err(AppError::ReviewWindowClosed);
        }

        self.repo.update(executor, review_id, rating, comment).await
    }

    pub async fn get_review(&self, review_id: Uuid) -> Result<Review, AppError> {
        self.repo
            .find_by_id(review_id)
            .await?
            .ok_or(AppError::NotFound("Avaliação"))
    }

    // Avaliação da reserva com os campos derivados do relógio. Nada é
    // persistido: a janela é reavaliada a cada leitura.
    pub async fn get_for_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<ReviewWithEditability, AppError> {
        let review = self
            .repo
            .find_by_booking(booking_id)
            .await?
            .ok_or(AppError::NotFound("Avaliação"))?;

        let now = Utc::now();

        Ok(ReviewWithEditability {
            is_editable: review::is_editable_at(review.created_at, now),
            remaining_edit_hours: review::remaining_edit_hours(review.created_at, now),
            review,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ScheduleRepository;
    use crate::services::BookingService;
    use chrono::{Duration, NaiveTime, Utc};
    use sqlx::postgres::PgPoolOptions;
    use sqlx::PgPool;

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

    // Aluno + tutor + horário + reserva pendente
    async fn seed_booking(pool: &PgPool) -> Uuid {
        let suffix = Uuid::new_v4().simple().to_string();
        let student = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (name, email, role) VALUES ('Aluno Teste', $1, 'student') RETURNING id",
        )
        .bind(format!("aluno-{suffix}@teste.dev"))
        .fetch_one(pool)
        .await
        .unwrap();

        let tutor_user = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (name, email, role) VALUES ('Tutor Teste', $1, 'tutor') RETURNING id",
        )
        .bind(format!("tutor-{suffix}@teste.dev"))
        .fetch_one(pool)
        .await
        .unwrap();

        let tutor_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO tutors (user_id, subject, hourly_rate) VALUES ($1, 'Física', 15.00) RETURNING id",
        )
        .bind(tutor_user)
        .fetch_one(pool)
        .await
        .unwrap();

        let schedule_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO schedules (tutor_id, date, start_time, end_time) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(tutor_id)
        .bind(Utc::now().date_naive() + Duration::days(7))
        .bind(NaiveTime::from_hms_opt(14, 0, 0).unwrap())
        .bind(NaiveTime::from_hms_opt(15, 0, 0).unwrap())
        .fetch_one(pool)
        .await
        .unwrap();

        let booking_service = BookingService::new(
            BookingRepository::new(pool.clone()),
            ScheduleRepository::new(pool.clone()),
        );

        booking_service
            .create_booking(pool, student, schedule_id)
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    #[ignore = "requer Postgres em DATABASE_URL"]
    async fn review_requires_a_confirmed_booking() {
        let pool = test_pool().await;
        let service = ReviewService::new(
            ReviewRepository::new(pool.clone()),
            BookingRepository::new(pool.clone()),
        );
        let booking_id = seed_booking(&pool).await;

        // Ainda pendente: avaliação rejeitada
        let rejected = service.add_review(&pool, booking_id, 5, "Ótima aula").await;
        assert!(matches!(rejected, Err(AppError::BookingNotConfirmed)));

        let booking_service = BookingService::new(
            BookingRepository::new(pool.clone()),
            ScheduleRepository::new(pool.clone()),
        );
        booking_service
            .update_status(&pool, booking_id, BookingStatus::Confirmed)
            .await
            .unwrap();

        let review = service
            .add_review(&pool, booking_id, 5, "Ótima aula")
            .await
            .unwrap();
        assert_eq!(review.rating, 5);

        // Uma avaliação por reserva
        let duplicate = service.add_review(&pool, booking_id, 4, "De novo").await;
        assert!(matches!(duplicate, Err(AppError::AlreadyReviewed)));
    }

    #[tokio::test]
    #[ignore = "requer Postgres em DATABASE_URL"]
    async fn fresh_review_is_editable() {
        let pool = test_pool().await;
        let service = ReviewService::new(
            ReviewRepository::new(pool.clone()),
            BookingRepository::new(pool.clone()),
        );
        let booking_id = seed_booking(&pool).await;

        let booking_service = BookingService::new(
            BookingRepository::new(pool.clone()),
            ScheduleRepository::new(pool.clone()),
        );
        booking_service
            .update_status(&pool, booking_id, BookingStatus::Confirmed)
            .await
            .unwrap();

        let review = service
            .add_review(&pool, booking_id, 4, "Boa aula")
            .await
            .unwrap();

        let updated = service
            .update_review(&pool, review.id, 3, "Revendo a nota")
            .await
            .unwrap();
        assert_eq!(updated.rating, 3);
        assert_eq!(updated.created_at, review.created_at);

        let with_editability = service.get_for_booking(booking_id).await.unwrap();
        assert!(with_editability.is_editable);
        assert_eq!(with_editability.remaining_edit_hours, 24);
    }
}
