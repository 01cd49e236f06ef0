use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::common::error::AppError;

// A autenticação em si é responsabilidade do gateway de identidade, que já
// validou o usuário e injeta `x-user-id` e `x-user-role` na requisição.
// Aqui só materializamos esse contexto como um extrator tipado, em vez de
// depender de estado de sessão ambiente.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Tutor,
}

#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok())
            .ok_or(AppError::MissingIdentity)?;

        let role = match parts
            .headers
            .get("x-user-role")
            .and_then(|value| value.to_str().ok())
        {
            Some("student") => Role::Student,
            Some("tutor") => Role::Tutor,
            _ => return Err(AppError::MissingIdentity),
        };

        Ok(Identity { user_id, role })
    }
}
