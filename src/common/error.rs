use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::booking::BookingStatus;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Condições esperadas viram variantes; só falhas de infraestrutura viram 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Regras semânticas de horário (data passada, duração mínima, ordem dos horários)
    #[error("Agendamento inválido: {0}")]
    InvalidSchedule(&'static str),

    // O horário foi reservado por outro aluno, ou está reservado e não pode ser alterado
    #[error("Horário indisponível")]
    SlotUnavailable,

    #[error("Transição de status não permitida: {from} -> {to}")]
    IllegalTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Reserva ainda não confirmada")]
    BookingNotConfirmed,

    #[error("Reserva já avaliada")]
    AlreadyReviewed,

    #[error("Janela de edição da avaliação expirada")]
    ReviewWindowClosed,

    #[error("Pagamento já registrado para esta reserva")]
    PaymentAlreadyExists,

    #[error("Pagamento já concluído")]
    AlreadyPaid,

    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error("Identidade ausente ou inválida")]
    MissingIdentity,

    #[error("Acesso negado")]
    Forbidden,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidSchedule(msg) => (StatusCode::BAD_REQUEST, msg.to_string()),
            AppError::SlotUnavailable => (
                StatusCode::CONFLICT,
                "Este horário não está mais disponível.".to_string(),
            ),
            AppError::IllegalTransition { from, to } => (
                StatusCode::CONFLICT,
                format!("Transição de status não permitida: {} -> {}.", from, to),
            ),
            AppError::BookingNotConfirmed => (
                StatusCode::CONFLICT,
                "A reserva ainda não foi confirmada pelo tutor.".to_string(),
            ),
            AppError::AlreadyReviewed => (
                StatusCode::CONFLICT,
                "Esta reserva já possui uma avaliação.".to_string(),
            ),
            AppError::ReviewWindowClosed => (
                StatusCode::CONFLICT,
                "O prazo de 24 horas para editar a avaliação já expirou.".to_string(),
            ),
            AppError::PaymentAlreadyExists => (
                StatusCode::CONFLICT,
                "Já existe um pagamento registrado para esta reserva.".to_string(),
            ),
            AppError::AlreadyPaid => (
                StatusCode::CONFLICT,
                "Esta reserva já foi paga.".to_string(),
            ),
            AppError::NotFound(resource) => {
                (StatusCode::NOT_FOUND, format!("{} não encontrado.", resource))
            }
            AppError::MissingIdentity => (
                StatusCode::UNAUTHORIZED,
                "Identidade ausente ou inválida.".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Você não tem permissão para acessar este recurso.".to_string(),
            ),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que o `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
