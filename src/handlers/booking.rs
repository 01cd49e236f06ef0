// src/handlers/booking.rs

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
    handlers::utils::{ensure_booking_party, require_student, require_tutor},
    middleware::identity::{Identity, Role},
    models::booking::{Booking, BookingDetail, BookingListItem, BookingStatus},
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingPayload {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub schedule_id: Uuid,
}

// POST /api/bookings
#[utoipa::path(
    post,
    path = "/api/bookings",
    tag = "Bookings",
    request_body = CreateBookingPayload,
    responses(
        (status = 201, description = "Reserva criada (pendente de confirmação do tutor)", body = Booking),
        (status = 404, description = "Horário não encontrado"),
        (status = 409, description = "Horário já reservado por outro aluno")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "ID do usuário autenticado"),
        ("x-user-role" = String, Header, description = "Papel: student ou tutor")
    )
)]
pub async fn create_booking(
    State(app_state): State<AppState>,
    identity: Identity,
    Json(payload): Json<CreateBookingPayload>,
) -> Result<impl IntoResponse, AppError> {
    require_student(&identity)?;

    // Mesmo fluxo da página de reserva: 404 para horário inexistente e
    // resposta amigável se já estiver ocupado. A garantia contra corrida é
    // da transação no service, não desta checagem.
    app_state
        .schedule_service
        .get_slot(payload.schedule_id)
        .await?;
    if !app_state
        .schedule_service
        .is_available(payload.schedule_id)
        .await?
    {
        return Err(AppError::SlotUnavailable);
    }

    let booking = app_state
        .booking_service
        .create_booking(&app_state.db_pool, identity.user_id, payload.schedule_id)
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /api/bookings
#[utoipa::path(
    get,
    path = "/api/bookings",
    tag = "Bookings",
    responses(
        (status = 200, description = "Reservas de quem chama (aluno ou tutor), mais recentes primeiro", body = [BookingListItem])
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "ID do usuário autenticado"),
        ("x-user-role" = String, Header, description = "Papel: student ou tutor")
    )
)]
pub async fn list_bookings(
    State(app_state): State<AppState>,
    identity: Identity,
) -> Result<impl IntoResponse, AppError> {
    let bookings = match identity.role {
        Role::Student => {
            app_state
                .booking_service
                .get_by_student(identity.user_id)
                .await?
        }
        Role::Tutor => {
            let tutor = require_tutor(&app_state, &identity).await?;
            app_state.booking_service.get_by_tutor(tutor.id).await?
        }
    };

    Ok(Json(bookings))
}

// GET /api/bookings/{booking_id}
#[utoipa::path(
    get,
    path = "/api/bookings/{booking_id}",
    tag = "Bookings",
    responses(
        (status = 200, description = "Detalhe completo da reserva", body = BookingDetail),
        (status = 403, description = "Reserva de outra pessoa"),
        (status = 404, description = "Reserva não encontrada")
    ),
    params(
        ("booking_id" = Uuid, Path, description = "ID da reserva"),
        ("x-user-id" = Uuid, Header, description = "ID do usuário autenticado"),
        ("x-user-role" = String, Header, description = "Papel: student ou tutor")
    )
)]
pub async fn get_booking(
    State(app_state): State<AppState>,
    identity: Identity,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.booking_service.get_detail(booking_id).await?;

    ensure_booking_party(&identity, &detail)?;

    Ok(Json(detail))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusPayload {
    #[schema(example = "confirmed")]
    pub status: BookingStatus,
}

// PATCH /api/bookings/{booking_id}/status
#[utoipa::path(
    patch,
    path = "/api/bookings/{booking_id}/status",
    tag = "Bookings",
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status atualizado (cancelamento libera o horário)", body = Booking),
        (status = 403, description = "Só o tutor confirma; só as partes cancelam"),
        (status = 404, description = "Reserva não encontrada"),
        (status = 409, description = "Transição não permitida pela máquina de estados")
    ),
    params(
        ("booking_id" = Uuid, Path, description = "ID da reserva"),
        ("x-user-id" = Uuid, Header, description = "ID do usuário autenticado"),
        ("x-user-role" = String, Header, description = "Papel: student ou tutor")
    )
)]
pub async fn update_booking_status(
    State(app_state): State<AppState>,
    identity: Identity,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.booking_service.get_detail(booking_id).await?;

    ensure_booking_party(&identity, &detail)?;

    // Confirmar é ato do tutor; cancelar, de qualquer uma das partes.
    // A legalidade da transição em si fica com a máquina de estados.
    if payload.status == BookingStatus::Confirmed && identity.user_id != detail.tutor_user_id {
        return Err(AppError::Forbidden);
    }

    let booking = app_state
        .booking_service
        .update_status(&app_state.db_pool, booking_id, payload.status)
        .await?;

    Ok(Json(booking))
}
