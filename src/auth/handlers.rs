use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginForm, LoginRequest, PublicUser, RegisterRequest, TokenResponse},
        extractors::AuthUser,
        services,
    },
    error::AppResult,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login_form))
        .route("/auth/login/email", post(login_json))
        .route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<PublicUser>)> {
    let Json(payload) = payload?;
    let user = services::register(
        state.users.as_ref(),
        &payload.email,
        &payload.username,
        &payload.password,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// OAuth2 password form, where `username` holds the email.
#[instrument(skip(state, form))]
pub async fn login_form(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> AppResult<Json<TokenResponse>> {
    let Form(form) = form?;
    let token = services::login(state.users.as_ref(), &state.keys, &form.username, &form.password)
        .await?;
    Ok(Json(TokenResponse::bearer(token)))
}

#[instrument(skip(state, payload))]
pub async fn login_json(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let Json(payload) = payload?;
    let token = services::login(
        state.users.as_ref(),
        &state.keys,
        &payload.email,
        &payload.password,
    )
    .await?;
    Ok(Json(TokenResponse::bearer(token)))
}

#[instrument(skip_all)]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<PublicUser> {
    Json(user.into())
}
