// src/handlers/schedule.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::utils::require_tutor,
    middleware::identity::Identity,
    // Models de resposta para o Swagger
    models::schedule::{RecurringOutcome, Schedule, ScheduleWithBooking},
};

// =============================================================================
//  1. GESTÃO DA AGENDA (TUTOR)
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchedulePayload {
    #[schema(value_type = String, format = Date, example = "2025-06-10")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "10:00:00")]
    pub end_time: NaiveTime,
}

// POST /api/schedules
#[utoipa::path(
    post,
    path = "/api/schedules",
    tag = "Schedules",
    request_body = CreateSchedulePayload,
    responses(
        (status = 201, description = "Horário criado", body = Schedule),
        (status = 400, description = "Horário inválido (data passada, duração menor que 30 minutos)")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "ID do usuário autenticado"),
        ("x-user-role" = String, Header, description = "Papel: student ou tutor")
    )
)]
pub async fn create_schedule(
    State(app_state): State<AppState>,
    identity: Identity,
    Json(payload): Json<CreateSchedulePayload>,
) -> Result<impl IntoResponse, AppError> {
    let tutor = require_tutor(&app_state, &identity).await?;

    let slot = app_state
        .schedule_service
        .create_slot(
            &app_state.db_pool,
            tutor.id,
            payload.date,
            payload.start_time,
            payload.end_time,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(slot)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecurringPayload {
    #[schema(value_type = String, format = Date, example = "2025-06-02")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2025-06-27")]
    pub end_date: NaiveDate,

    // 0 = domingo .. 6 = sábado, como no formulário
    #[validate(length(min = 1, message = "selecione pelo menos um dia da semana"))]
    #[schema(example = json!([1, 3, 5]))]
    pub days_of_week: Vec<u8>,

    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "10:00:00")]
    pub end_time: NaiveTime,
}

// POST /api/schedules/recurring
#[utoipa::path(
    post,
    path = "/api/schedules/recurring",
    tag = "Schedules",
    request_body = CreateRecurringPayload,
    responses(
        (status = 201, description = "Lote criado (melhor esforço, com contadores)", body = RecurringOutcome),
        (status = 400, description = "Parâmetros do lote inválidos")
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "ID do usuário autenticado"),
        ("x-user-role" = String, Header, description = "Papel: student ou tutor")
    )
)]
pub async fn create_recurring(
    State(app_state): State<AppState>,
    identity: Identity,
    Json(payload): Json<CreateRecurringPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let tutor = require_tutor(&app_state, &identity).await?;

    let outcome = app_state
        .schedule_service
        .create_recurring(
            &app_state.db_pool,
            tutor.id,
            payload.start_date,
            payload.end_date,
            &payload.days_of_week,
            payload.start_time,
            payload.end_time,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

// PUT /api/schedules/{schedule_id}
#[utoipa::path(
    put,
    path = "/api/schedules/{schedule_id}",
    tag = "Schedules",
    request_body = CreateSchedulePayload,
    responses(
        (status = 200, description = "Horário atualizado", body = Schedule),
        (status = 404, description = "Horário não encontrado"),
        (status = 409, description = "Horário reservado não pode ser alterado")
    ),
    params(
        ("schedule_id" = Uuid, Path, description = "ID do horário"),
        ("x-user-id" = Uuid, Header, description = "ID do usuário autenticado"),
        ("x-user-role" = String, Header, description = "Papel: student ou tutor")
    )
)]
pub async fn update_schedule(
    State(app_state): State<AppState>,
    identity: Identity,
    Path(schedule_id): Path<Uuid>,
    Json(payload): Json<CreateSchedulePayload>,
) -> Result<impl IntoResponse, AppError> {
    let tutor = require_tutor(&app_state, &identity).await?;

    let slot = app_state.schedule_service.get_slot(schedule_id).await?;
    if slot.tutor_id != tutor.id {
        return Err(AppError::Forbidden);
    }

    let updated = app_state
        .schedule_service
        .update_slot(
            &app_state.db_pool,
            schedule_id,
            payload.date,
            payload.start_time,
            payload.end_time,
        )
        .await?;

    Ok(Json(updated))
}

// DELETE /api/schedules/{schedule_id}
#[utoipa::path(
    delete,
    path = "/api/schedules/{schedule_id}",
    tag = "Schedules",
    responses(
        (status = 204, description = "Horário removido"),
        (status = 404, description = "Horário não encontrado"),
        (status = 409, description = "Horário reservado não pode ser removido")
    ),
    params(
        ("schedule_id" = Uuid, Path, description = "ID do horário"),
        ("x-user-id" = Uuid, Header, description = "ID do usuário autenticado"),
        ("x-user-role" = String, Header, description = "Papel: student ou tutor")
    )
)]
pub async fn delete_schedule(
    State(app_state): State<AppState>,
    identity: Identity,
    Path(schedule_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tutor = require_tutor(&app_state, &identity).await?;

    let slot = app_state.schedule_service.get_slot(schedule_id).await?;
    if slot.tutor_id != tutor.id {
        return Err(AppError::Forbidden);
    }

    app_state
        .schedule_service
        .delete_slot(&app_state.db_pool, schedule_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  2. CONSULTA DE DISPONIBILIDADE
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ScheduleFilter {
    // Filtro opcional: só horários a partir desta data
    pub from: Option<NaiveDate>,
}

// GET /api/tutors/{tutor_id}/schedules
#[utoipa::path(
    get,
    path = "/api/tutors/{tutor_id}/schedules",
    tag = "Schedules",
    responses(
        (status = 200, description = "Agenda do tutor com as reservas ativas", body = [ScheduleWithBooking])
    ),
    params(
        ("tutor_id" = Uuid, Path, description = "ID do tutor"),
        ("from" = Option<String>, Query, description = "Data inicial (YYYY-MM-DD)"),
        ("x-user-id" = Uuid, Header, description = "ID do usuário autenticado"),
        ("x-user-role" = String, Header, description = "Papel: student ou tutor")
    )
)]
pub async fn get_tutor_schedules(
    State(app_state): State<AppState>,
    identity: Identity,
    Path(tutor_id): Path<Uuid>,
    Query(filter): Query<ScheduleFilter>,
) -> Result<impl IntoResponse, AppError> {
    // A agenda completa (com reservas) é só do próprio tutor
    let tutor = require_tutor(&app_state, &identity).await?;
    if tutor.id != tutor_id {
        return Err(AppError::Forbidden);
    }

    let slots = app_state
        .schedule_service
        .get_by_tutor(tutor_id, filter.from)
        .await?;

    Ok(Json(slots))
}

// GET /api/tutors/{tutor_id}/schedules/available
#[utoipa::path(
    get,
    path = "/api/tutors/{tutor_id}/schedules/available",
    tag = "Schedules",
    responses(
        (status = 200, description = "Horários livres do tutor, ordenados por data e hora", body = [Schedule])
    ),
    params(
        ("tutor_id" = Uuid, Path, description = "ID do tutor"),
        ("from" = Option<String>, Query, description = "Data inicial (YYYY-MM-DD)")
    )
)]
pub async fn get_available_schedules(
    State(app_state): State<AppState>,
    Path(tutor_id): Path<Uuid>,
    Query(filter): Query<ScheduleFilter>,
) -> Result<impl IntoResponse, AppError> {
    let slots = app_state
        .schedule_service
        .get_available(tutor_id, filter.from)
        .await?;

    Ok(Json(slots))
}
