// src/handlers/utils.rs

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::identity::{Identity, Role},
    models::{booking::BookingDetail, tutor::Tutor},
};

// As checagens de posse moram na borda: o núcleo confia nos ids que recebe,
// e é aqui que garantimos que o recurso pertence a quem está agindo.

// Quem chama precisa ser tutor e ter perfil cadastrado
pub(crate) async fn require_tutor(
    app_state: &AppState,
    identity: &Identity,
) -> Result<Tutor, AppError> {
    if identity.role != Role::Tutor {
        return Err(AppError::Forbidden);
    }

    app_state
        .tutor_repo
        .find_by_user_id(identity.user_id)
        .await?
        .ok_or(AppError::NotFound("Perfil de tutor"))
}

pub(crate) fn require_student(identity: &Identity) -> Result<(), AppError> {
    if identity.role != Role::Student {
        return Err(AppError::Forbidden);
    }

    Ok(())
}

// Aluno dono da reserva ou tutor do horário
pub(crate) fn ensure_booking_party(
    identity: &Identity,
    detail: &BookingDetail,
) -> Result<(), AppError> {
    if identity.user_id != detail.student_id && identity.user_id != detail.tutor_user_id {
        return Err(AppError::Forbidden);
    }

    Ok(())
}

// Só o aluno dono da reserva
pub(crate) fn ensure_booking_student(
    identity: &Identity,
    detail: &BookingDetail,
) -> Result<(), AppError> {
    require_student(identity)?;

    if identity.user_id != detail.student_id {
        return Err(AppError::Forbidden);
    }

    Ok(())
}
