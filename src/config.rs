// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        BookingRepository, PaymentRepository, ReviewRepository, ScheduleRepository,
        TutorRepository,
    },
    services::{BookingService, PaymentService, ReviewService, ScheduleService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub tutor_repo: TutorRepository,
    pub schedule_service: ScheduleService,
    pub booking_service: BookingService,
    pub review_service: ReviewService,
    pub payment_service: PaymentService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let schedule_repo = ScheduleRepository::new(db_pool.clone());
        let booking_repo = BookingRepository::new(db_pool.clone());
        let review_repo = ReviewRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let tutor_repo = TutorRepository::new(db_pool.clone());

        let schedule_service = ScheduleService::new(schedule_repo.clone());
        let booking_service = BookingService::new(booking_repo.clone(), schedule_repo);
        let review_service = ReviewService::new(review_repo, booking_repo.clone());
        let payment_service = PaymentService::new(payment_repo, booking_repo);

        Ok(Self {
            db_pool,
            tutor_repo,
            schedule_service,
            booking_service,
            review_service,
            payment_service,
        })
    }
}
