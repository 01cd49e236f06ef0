// src/db/tutor_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::tutor::Tutor};

// Leitura do perfil de tutor. O cadastro é responsabilidade do serviço de
// contas; aqui só resolvemos posse e tarifa.
#[derive(Clone)]
pub struct TutorRepository {
    pool: PgPool,
}

impl TutorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Tutor>, AppError> {
        let tutor = sqlx::query_as::<_, Tutor>("SELECT * FROM tutors WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(tutor)
    }
}
