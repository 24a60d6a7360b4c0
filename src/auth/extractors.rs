use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{
    auth::{repo_types::User, services::authenticate},
    error::AppError,
    state::AppState,
};

/// Authenticated caller, resolved from `Authorization: Bearer <token>`.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Not authenticated".into()))?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(AppError::unauthorized)?;

        let user = authenticate(state.users.as_ref(), &state.keys, token).await?;
        Ok(AuthUser(user))
    }
}
