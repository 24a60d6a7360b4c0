use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    journal::{
        repo::JournalStore,
        repo_types::{EntryFilter, EntryPatch, JournalEntry, Mood, MoodOfDay, NewEntry},
    },
};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

fn not_found() -> AppError {
    AppError::NotFound("Journal entry not found".into())
}

/// Existence is checked before ownership for every id-addressed operation,
/// so a foreign entry answers 403 and a missing one 404.
async fn load_owned(store: &dyn JournalStore, caller: Uuid, id: Uuid) -> AppResult<JournalEntry> {
    let entry = store.find_by_id(id).await?.ok_or_else(not_found)?;
    if entry.user_id != caller {
        warn!(entry_id = %id, caller = %caller, "entry owned by another user");
        return Err(AppError::Forbidden(
            "Not authorized to access this journal entry".into(),
        ));
    }
    Ok(entry)
}

pub async fn create_entry(
    store: &dyn JournalStore,
    caller: Uuid,
    content: String,
    mood: Option<Mood>,
    is_draft: bool,
) -> AppResult<JournalEntry> {
    let entry = store
        .insert(NewEntry {
            id: Uuid::new_v4(),
            user_id: caller,
            content,
            mood: mood.unwrap_or_default(),
            is_draft,
            created_at: OffsetDateTime::now_utc(),
        })
        .await?;
    info!(entry_id = %entry.id, user_id = %caller, "journal entry created");
    Ok(entry)
}

pub async fn list_entries(
    store: &dyn JournalStore,
    caller: Uuid,
    filter: &EntryFilter,
    skip: i64,
    limit: i64,
) -> AppResult<Vec<JournalEntry>> {
    let skip = skip.max(0);
    let limit = limit.clamp(1, MAX_LIMIT);
    store.list_by_user(caller, filter, skip, limit).await
}

pub async fn get_entry(store: &dyn JournalStore, caller: Uuid, id: Uuid) -> AppResult<JournalEntry> {
    load_owned(store, caller, id).await
}

/// An empty patch changes nothing, `updated_at` included.
pub async fn update_entry(
    store: &dyn JournalStore,
    caller: Uuid,
    id: Uuid,
    patch: EntryPatch,
) -> AppResult<JournalEntry> {
    let entry = load_owned(store, caller, id).await?;
    if patch.is_empty() {
        return Ok(entry);
    }
    let updated = store
        .update(id, patch, OffsetDateTime::now_utc())
        .await?
        .ok_or_else(not_found)?;
    info!(entry_id = %id, user_id = %caller, "journal entry updated");
    Ok(updated)
}

pub async fn delete_entry(store: &dyn JournalStore, caller: Uuid, id: Uuid) -> AppResult<()> {
    load_owned(store, caller, id).await?;
    if !store.delete(id).await? {
        return Err(not_found());
    }
    info!(entry_id = %id, user_id = %caller, "journal entry deleted");
    Ok(())
}

pub async fn mood_by_day(store: &dyn JournalStore, caller: Uuid) -> AppResult<Vec<MoodOfDay>> {
    store.mood_by_day(caller).await
}

pub async fn save_reflection_answers(
    store: &dyn JournalStore,
    caller: Uuid,
    answers: &[(String, String)],
) -> AppResult<()> {
    for (question, answer) in answers {
        store
            .upsert_reflection_answer(caller, question, answer)
            .await?;
    }
    info!(user_id = %caller, count = answers.len(), "reflection answers saved");
    Ok(())
}
