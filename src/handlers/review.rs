// src/handlers/review.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::utils::{ensure_booking_party, ensure_booking_student},
    middleware::identity::Identity,
    models::review::{Review, ReviewWithEditability},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    #[validate(range(min = 1, max = 5, message = "a nota deve estar entre 1 e 5"))]
    #[schema(example = 5, minimum = 1, maximum = 5)]
    pub rating: i16,

    #[serde(default)]
    #[schema(example = "Excelente aula, muito didático!")]
    pub comment: String,
}

// POST /api/bookings/{booking_id}/review
#[utoipa::path(
    post,
    path = "/api/bookings/{booking_id}/review",
    tag = "Reviews",
    request_body = ReviewPayload,
    responses(
        (status = 201, description = "Avaliação registrada", body = Review),
        (status = 403, description = "Só o aluno da reserva avalia"),
        (status = 404, description = "Reserva não encontrada"),
        (status = 409, description = "Reserva não confirmada ou já avaliada")
    ),
    params(
        ("booking_id" = Uuid, Path, description = "ID da reserva"),
        ("x-user-id" = Uuid, Header, description = "ID do usuário autenticado"),
        ("x-user-role" = String, Header, description = "Papel: student ou tutor")
    )
)]
pub async fn add_review(
    State(app_state): State<AppState>,
    identity: Identity,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<ReviewPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let detail = app_state.booking_service.get_detail(booking_id).await?;
    ensure_booking_student(&identity, &detail)?;

    let review = app_state
        .review_service
        .add_review(
            &app_state.db_pool,
            booking_id,
            payload.rating,
            &payload.comment,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(review)))
}

// GET /api/bookings/{booking_id}/review
#[utoipa::path(
    get,
    path = "/api/bookings/{booking_id}/review",
    tag = "Reviews",
    responses(
        (status = 200, description = "Avaliação com a janela de edição recalculada", body = ReviewWithEditability),
        (status = 404, description = "Reserva sem avaliação")
    ),
    params(
        ("booking_id" = Uuid, Path, description = "ID da reserva"),
        ("x-user-id" = Uuid, Header, description = "ID do usuário autenticado"),
        ("x-user-role" = String, Header, description = "Papel: student ou tutor")
    )
)]
pub async fn get_review(
    State(app_state): State<AppState>,
    identity: Identity,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.booking_service.get_detail(booking_id).await?;
    ensure_booking_party(&identity, &detail)?;

    let review = app_state.review_service.get_for_booking(booking_id).await?;

    Ok(Json(review))
}

// PUT /api/reviews/{review_id}
#[utoipa::path(
    put,
    path = "/api/reviews/{review_id}",
    tag = "Reviews",
    request_body = ReviewPayload,
    responses(
        (status = 200, description = "Avaliação atualizada (created_at preservado)", body = Review),
        (status = 403, description = "Só o aluno autor edita"),
        (status = 404, description = "Avaliação não encontrada"),
        (status = 409, description = "Janela de 24 horas expirada")
    ),
    params(
        ("review_id" = Uuid, Path, description = "ID da avaliação"),
        ("x-user-id" = Uuid, Header, description = "ID do usuário autenticado"),
        ("x-user-role" = String, Header, description = "Papel: student ou tutor")
    )
)]
pub async fn update_review(
    State(app_state): State<AppState>,
    identity: Identity,
    Path(review_id): Path<Uuid>,
    Json(payload): Json<ReviewPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let review = app_state.review_service.get_review(review_id).await?;
    let detail = app_state
        .booking_service
        .get_detail(review.booking_id)
        .await?;
    ensure_booking_student(&identity, &detail)?;

    let updated = app_state
        .review_service
        .update_review(
            &app_state.db_pool,
            review_id,
            payload.rating,
            &payload.comment,
        )
        .await?;

    Ok(Json(updated))
}
