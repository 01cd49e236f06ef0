// src/handlers/payment.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::utils::{ensure_booking_student, require_tutor},
    middleware::identity::{Identity, Role},
    models::payment::{Payment, PaymentHistoryEntry, PaymentMethod, PaymentQuote},
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentPayload {
    // Método fora do conjunto reconhecido morre na desserialização
    #[schema(example = "bank_transfer")]
    pub payment_method: PaymentMethod,
}

// POST /api/bookings/{booking_id}/payment
#[utoipa::path(
    post,
    path = "/api/bookings/{booking_id}/payment",
    tag = "Payments",
    request_body = CreatePaymentPayload,
    responses(
        (status = 201, description = "Pagamento registrado com o valor derivado (tarifa x duração)", body = Payment),
        (status = 403, description = "Só o aluno da reserva paga"),
        (status = 404, description = "Reserva não encontrada"),
        (status = 409, description = "Reserva não confirmada ou pagamento já registrado")
    ),
    params(
        ("booking_id" = Uuid, Path, description = "ID da reserva"),
        ("x-user-id" = Uuid, Header, description = "ID do usuário autenticado"),
        ("x-user-role" = String, Header, description = "Papel: student ou tutor")
    )
)]
pub async fn create_payment(
    State(app_state): State<AppState>,
    identity: Identity,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<CreatePaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.booking_service.get_detail(booking_id).await?;
    ensure_booking_student(&identity, &detail)?;

    let payment = app_state
        .payment_service
        .create_payment(&app_state.db_pool, booking_id, payload.payment_method)
        .await?;

    Ok((StatusCode::CREATED, Json(payment)))
}

// GET /api/bookings/{booking_id}/payment
#[utoipa::path(
    get,
    path = "/api/bookings/{booking_id}/payment",
    tag = "Payments",
    responses(
        (status = 200, description = "Valor devido e pagamento já registrado, se houver", body = PaymentQuote),
        (status = 403, description = "Só o aluno da reserva consulta"),
        (status = 404, description = "Reserva não encontrada")
    ),
    params(
        ("booking_id" = Uuid, Path, description = "ID da reserva"),
        ("x-user-id" = Uuid, Header, description = "ID do usuário autenticado"),
        ("x-user-role" = String, Header, description = "Papel: student ou tutor")
    )
)]
pub async fn get_payment_quote(
    State(app_state): State<AppState>,
    identity: Identity,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.booking_service.get_detail(booking_id).await?;
    ensure_booking_student(&identity, &detail)?;

    let amount = app_state
        .payment_service
        .calculate_for_booking(booking_id)
        .await?;
    let payment = app_state.payment_service.get_by_booking(booking_id).await?;

    Ok(Json(PaymentQuote { amount, payment }))
}

// POST /api/payments/{payment_id}/process
#[utoipa::path(
    post,
    path = "/api/payments/{payment_id}/process",
    tag = "Payments",
    responses(
        (status = 200, description = "Pagamento processado pelo gateway (pendente ou falho pode reprocessar)", body = Payment),
        (status = 403, description = "Só o aluno da reserva processa"),
        (status = 404, description = "Pagamento não encontrado"),
        (status = 409, description = "Pagamento já concluído")
    ),
    params(
        ("payment_id" = Uuid, Path, description = "ID do pagamento"),
        ("x-user-id" = Uuid, Header, description = "ID do usuário autenticado"),
        ("x-user-role" = String, Header, description = "Papel: student ou tutor")
    )
)]
pub async fn process_payment(
    State(app_state): State<AppState>,
    identity: Identity,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let payment = app_state.payment_service.get_payment(payment_id).await?;
    let detail = app_state
        .booking_service
        .get_detail(payment.booking_id)
        .await?;
    ensure_booking_student(&identity, &detail)?;

    let processed = app_state
        .payment_service
        .process(&app_state.db_pool, payment_id)
        .await?;

    Ok(Json(processed))
}

// GET /api/payments
#[utoipa::path(
    get,
    path = "/api/payments",
    tag = "Payments",
    responses(
        (status = 200, description = "Histórico de pagamentos de quem chama, mais recentes primeiro", body = [PaymentHistoryEntry])
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "ID do usuário autenticado"),
        ("x-user-role" = String, Header, description = "Papel: student ou tutor")
    )
)]
pub async fn payment_history(
    State(app_state): State<AppState>,
    identity: Identity,
) -> Result<impl IntoResponse, AppError> {
    let payments = match identity.role {
        Role::Student => {
            app_state
                .payment_service
                .history_by_student(identity.user_id)
                .await?
        }
        Role::Tutor => {
            let tutor = require_tutor(&app_state, &identity).await?;
            app_state.payment_service.history_by_tutor(tutor.id).await?
        }
    };

    Ok(Json(payments))
}
