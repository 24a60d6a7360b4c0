use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    chat::{
        dto::{ChatRequest, ChatResponse},
        services,
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub fn chat_routes() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn chat(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let client = state.chat.clone().ok_or(AppError::Unavailable("chat"))?;
    let Json(req) = payload?;
    let res = services::converse(
        client.as_ref(),
        req.history,
        &req.message,
        state.chat_max_history,
    )
    .await?;
    Ok(Json(res))
}
