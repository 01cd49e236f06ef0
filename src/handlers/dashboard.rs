// src/handlers/dashboard.rs

use axum::{extract::State, response::IntoResponse, Json};
use uuid::Uuid;

use crate::{
    common::error::AppError, config::AppState, middleware::identity::Identity,
    models::dashboard::BookingSummary,
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Contadores de reservas por status", body = BookingSummary)
    ),
    params(
        ("x-user-id" = Uuid, Header, description = "ID do usuário autenticado"),
        ("x-user-role" = String, Header, description = "Papel: student ou tutor")
    )
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    _identity: Identity,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.booking_service.booking_summary().await?;

    Ok(Json(summary))
}
