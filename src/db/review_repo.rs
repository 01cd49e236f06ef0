// src/db/review_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::review::Review};

#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, AppError> {
        let review = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(review)
    }

    pub async fn find_by_booking(&self, booking_id: Uuid) -> Result<Option<Review>, AppError> {
        let review = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE booking_id = $1")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(review)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        booking_id: Uuid,
        rating: i16,
        comment: &str,
    ) -> Result<Review, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (booking_id, rating, comment)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::AlreadyReviewed;
                }
            }
            AppError::DatabaseError(e)
        })
    }

    // `created_at` nunca muda: a janela de edição conta a partir da criação.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        rating: i16,
        comment: &str,
    ) -> Result<Review, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let review = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET rating = $1, comment = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(rating)
        .bind(comment)
        .bind(id)
        .fetch_one(executor)
        .await?;

        Ok(review)
    }
}
