// src/services/payment_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BookingRepository, PaymentRepository},
    models::{
        booking::BookingStatus,
        payment::{self, Payment, PaymentHistoryEntry, PaymentMethod, PaymentStatus},
    },
};

// Livro-razão de pagamentos: um registro por reserva, valor derivado da
// duração do horário vezes a tarifa do tutor. O gateway real é um
// colaborador externo; aqui entra a simulação síncrona.
#[derive(Clone)]
pub struct PaymentService {
    repo: PaymentRepository,
    booking_repo: BookingRepository,
}

impl PaymentService {
    pub fn new(repo: PaymentRepository, booking_repo: BookingRepository) -> Self {
        Self { repo, booking_repo }
    }

    // Valor devido pela reserva. Sempre derivado no servidor.
    pub async fn calculate_for_booking(&self, booking_id: Uuid) -> Result<Decimal, AppError> {
        let detail = self
            .booking_repo
            .get_detail(booking_id)
            .await?
            .ok_or(AppError::NotFound("Reserva"))?;

        Ok(payment::calculate_amount(
            detail.start_time,
            detail.end_time,
            detail.hourly_rate,
        ))
    }

    pub async fn create_payment<'e, E>(
        &self,
        executor: E,
        booking_id: Uuid,
        method: PaymentMethod,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let detail = self
            .booking_repo
            .get_detail(booking_id)
            .await?
            .ok_or(AppError::NotFound("Reserva"))?;

        if detail.status != BookingStatus::Confirmed {
            return Err(AppError::BookingNotConfirmed);
        }

        if self.repo.find_by_booking(booking_id).await?.is_some() {
            return Err(AppError::PaymentAlreadyExists);
        }

        let amount =
            payment::calculate_amount(detail.start_time, detail.end_time, detail.hourly_rate);

        self.repo.insert(executor, booking_id, amount, method).await
    }

    // Processa o pagamento pelo gateway simulado. Pagamentos `failed` podem
    // ser reprocessados na mesma linha; `completed` é rejeitado.
    pub async fn process<'e, E>(&self, executor: E, payment_id: Uuid) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let payment = self
            .repo
            .lock_by_id(&mut *tx, payment_id)
            .await?
            .ok_or(AppError::NotFound("Pagamento"))?;

        if payment.status == PaymentStatus::Completed {
            return Err(AppError::AlreadyPaid);
        }

        let receipt = gateway::charge(payment.payment_method, payment.amount);

        let payment = if receipt.approved {
            tracing::info!(
                "Pagamento {} aprovado pelo gateway ({})",
                payment_id,
                receipt.reference
            );
            self.repo.mark_completed(&mut *tx, payment_id).await?
        } else {
            tracing::warn!(
                "Pagamento {} recusado pelo gateway ({})",
                payment_id,
                receipt.reference
            );
            self.repo.mark_failed(&mut *tx, payment_id).await?
        };

        tx.commit().await?;

        Ok(payment)
    }

    pub async fn get_payment(&self, payment_id: Uuid) -> Result<Payment, AppError> {
        self.repo
            .find_by_id(payment_id)
            .await?
            .ok_or(AppError::NotFound("Pagamento"))
    }

    pub async fn get_by_booking(&self, booking_id: Uuid) -> Result<Option<Payment>, AppError> {
        self.repo.find_by_booking(booking_id).await
    }

    pub async fn history_by_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<PaymentHistoryEntry>, AppError> {
        self.repo.get_by_student(student_id).await
    }

    pub async fn history_by_tutor(
        &self,
        tutor_id: Uuid,
    ) -> Result<Vec<PaymentHistoryEntry>, AppError> {
        self.repo.get_by_tutor(tutor_id).await
    }
}

// Simulação do gateway de pagamento. A integração real fica atrás deste
// ponto único; a simulação aprova tudo e devolve uma referência por método,
// no formato dos comprovantes do provedor.
mod gateway {
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::models::payment::PaymentMethod;

    pub(super) struct GatewayReceipt {
        pub approved: bool,
        pub reference: String,
    }

    pub(super) fn charge(method: PaymentMethod, _amount: Decimal) -> GatewayReceipt {
        let nonce = Uuid::new_v4().simple().to_string();
        let reference = match method {
            PaymentMethod::Gopay => format!("GP{}", &nonce[..12]),
            PaymentMethod::Dana => format!("DA{}", &nonce[..12]),
            PaymentMethod::BankTransfer => format!("BT{}", &nonce[..12]),
        };

        GatewayReceipt {
            approved: true,
            reference,
        }
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
    use std::str::FromStr;

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

    // Reserva confirmada de uma hora a 20.00/h
    async fn seed_confirmed_booking(pool: &PgPool) -> Uuid {
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
            "INSERT INTO tutors (user_id, subject, hourly_rate) VALUES ($1, 'Química', 20.00) RETURNING id",
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
        .bind(NaiveTime::from_hms_opt(10, 0, 0).unwrap())
        .bind(NaiveTime::from_hms_opt(11, 0, 0).unwrap())
        .fetch_one(pool)
        .await
        .unwrap();

        let booking_service = BookingService::new(
            BookingRepository::new(pool.clone()),
            ScheduleRepository::new(pool.clone()),
        );
        let booking = booking_service
            .create_booking(pool, student, schedule_id)
            .await
            .unwrap();
        booking_service
            .update_status(pool, booking.id, BookingStatus::Confirmed)
            .await
            .unwrap();

        booking.id
    }

    #[tokio::test]
    #[ignore = "requer Postgres em DATABASE_URL"]
    async fn payment_is_created_once_per_booking() {
        let pool = test_pool().await;
        let service = PaymentService::new(
            PaymentRepository::new(pool.clone()),
            BookingRepository::new(pool.clone()),
        );
        let booking_id = seed_confirmed_booking(&pool).await;

        let payment = service
            .create_payment(&pool, booking_id, PaymentMethod::BankTransfer)
            .await
            .unwrap();

        // Uma hora a 20.00/h
        assert_eq!(payment.amount, Decimal::from_str("20.00").unwrap());
        assert_eq!(payment.status, PaymentStatus::Pending);

        let duplicate = service
            .create_payment(&pool, booking_id, PaymentMethod::Gopay)
            .await;
        assert!(matches!(duplicate, Err(AppError::PaymentAlreadyExists)));
    }

    #[tokio::test]
    #[ignore = "requer Postgres em DATABASE_URL"]
    async fn processing_completes_and_rejects_a_second_charge() {
        let pool = test_pool().await;
        let service = PaymentService::new(
            PaymentRepository::new(pool.clone()),
            BookingRepository::new(pool.clone()),
        );
        let booking_id = seed_confirmed_booking(&pool).await;

        let payment = service
            .create_payment(&pool, booking_id, PaymentMethod::Gopay)
            .await
            .unwrap();

        let processed = service.process(&pool, payment.id).await.unwrap();
        assert_eq!(processed.status, PaymentStatus::Completed);
        assert!(processed.paid_at.is_some());

        let again = service.process(&pool, payment.id).await;
        assert!(matches!(again, Err(AppError::AlreadyPaid)));
    }
}
