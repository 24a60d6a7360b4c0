use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppResult},
    journal::{
        dto::{CreateEntryRequest, ListQuery, MessageResponse, ReflectionAnswer},
        repo_types::{EntryFilter, EntryPatch, JournalEntry, MoodOfDay},
        services,
    },
    state::AppState,
};

pub fn journal_routes() -> Router<AppState> {
    Router::new()
        .route("/api/journal", post(create_entry).get(list_entries))
        .route("/api/journal/mood-tracker", get(mood_tracker))
        .route("/api/journal/reflection-answers", post(save_reflection_answers))
        .route(
            "/api/journal/:id",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}

fn parse_entry_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| {
        warn!(entry_id = %raw, "invalid entry id");
        AppError::Validation("Invalid journal entry ID".into())
    })
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<JournalEntry>)> {
    let Json(body) = payload?;
    let entry = services::create_entry(
        state.journal.as_ref(),
        user.id,
        body.content,
        body.mood,
        body.is_draft,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state, user, query), fields(user_id = %user.id))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<JournalEntry>>> {
    let Query(q) = query?;
    let filter = EntryFilter {
        date: q.date,
        is_draft: q.is_draft,
    };
    let entries =
        services::list_entries(state.journal.as_ref(), user.id, &filter, q.skip, q.limit).await?;
    Ok(Json(entries))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn mood_tracker(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<MoodOfDay>>> {
    Ok(Json(services::mood_by_day(state.journal.as_ref(), user.id).await?))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_entry(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<JournalEntry>> {
    let id = parse_entry_id(&id)?;
    Ok(Json(services::get_entry(state.journal.as_ref(), user.id, id).await?))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_entry(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<EntryPatch>, JsonRejection>,
) -> AppResult<Json<JournalEntry>> {
    let id = parse_entry_id(&id)?;
    let Json(patch) = payload?;
    let entry = services::update_entry(state.journal.as_ref(), user.id, id, patch).await?;
    Ok(Json(entry))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_entry_id(&id)?;
    services::delete_entry(state.journal.as_ref(), user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn save_reflection_answers(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<Vec<ReflectionAnswer>>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(answers) = payload?;
    let pairs: Vec<(String, String)> = answers
        .into_iter()
        .map(|a| (a.question, a.answer))
        .collect();
    services::save_reflection_answers(state.journal.as_ref(), user.id, &pairs).await?;
    Ok(Json(MessageResponse {
        message: "Reflection answers saved successfully".into(),
    }))
}
