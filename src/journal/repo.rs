use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppResult;
use crate::journal::repo_types::{
    EntryFilter, EntryPatch, JournalEntry, JournalEntryRow, MoodOfDay, MoodOfDayRow, NewEntry,
};

/// Persistence seam for journal entries and reflection answers. Ownership is
/// not checked here; see `journal::services`.
#[async_trait]
pub trait JournalStore: Send + Sync {
    async fn insert(&self, entry: NewEntry) -> AppResult<JournalEntry>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JournalEntry>>;
    /// Newest first.
    async fn list_by_user(
        &self,
        user_id: Uuid,
        filter: &EntryFilter,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<JournalEntry>>;
    /// `None` when the id is unknown.
    async fn update(
        &self,
        id: Uuid,
        patch: EntryPatch,
        now: OffsetDateTime,
    ) -> AppResult<Option<JournalEntry>>;
    /// `false` when the id is unknown.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
    /// First mood of each UTC day, oldest day first.
    async fn mood_by_day(&self, user_id: Uuid) -> AppResult<Vec<MoodOfDay>>;
    async fn upsert_reflection_answer(
        &self,
        user_id: Uuid,
        question: &str,
        answer: &str,
    ) -> AppResult<()>;
}

#[derive(Clone)]
pub struct PgJournalStore {
    db: PgPool,
}

impl PgJournalStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl JournalStore for PgJournalStore {
    async fn insert(&self, entry: NewEntry) -> AppResult<JournalEntry> {
        let row = sqlx::query_as::<_, JournalEntryRow>(
            r#"
            INSERT INTO journal_entries (id, user_id, content, mood, is_draft, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, content, mood, tags, is_draft, created_at, updated_at, ai_response
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(&entry.content)
        .bind(Json(&entry.mood))
        .bind(entry.is_draft)
        .bind(entry.created_at)
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JournalEntry>> {
        let row = sqlx::query_as::<_, JournalEntryRow>(
            r#"
            SELECT id, user_id, content, mood, tags, is_draft, created_at, updated_at, ai_response
            FROM journal_entries
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        filter: &EntryFilter,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<JournalEntry>> {
        let (from, until) = filter.day_bounds().unzip();
        let rows = sqlx::query_as::<_, JournalEntryRow>(
            r#"
            SELECT id, user_id, content, mood, tags, is_draft, created_at, updated_at, ai_response
            FROM journal_entries
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at < $3)
              AND ($4::boolean IS NULL OR is_draft = $4)
            ORDER BY created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(until)
        .bind(filter.is_draft)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: EntryPatch,
        now: OffsetDateTime,
    ) -> AppResult<Option<JournalEntry>> {
        let row = sqlx::query_as::<_, JournalEntryRow>(
            r#"
            UPDATE journal_entries
            SET content    = COALESCE($2, content),
                mood       = COALESCE($3, mood),
                is_draft   = COALESCE($4, is_draft),
                tags       = COALESCE($5, tags),
                updated_at = $6
            WHERE id = $1
            RETURNING id, user_id, content, mood, tags, is_draft, created_at, updated_at, ai_response
            "#,
        )
        .bind(id)
        .bind(patch.content)
        .bind(patch.mood.map(Json))
        .bind(patch.is_draft)
        .bind(patch.tags)
        .bind(now)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn mood_by_day(&self, user_id: Uuid) -> AppResult<Vec<MoodOfDay>> {
        let rows = sqlx::query_as::<_, MoodOfDayRow>(
            r#"
            SELECT DISTINCT ON ((created_at AT TIME ZONE 'UTC')::date)
                   (created_at AT TIME ZONE 'UTC')::date AS day,
                   mood
            FROM journal_entries
            WHERE user_id = $1
            ORDER BY (created_at AT TIME ZONE 'UTC')::date ASC, created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn upsert_reflection_answer(
        &self,
        user_id: Uuid,
        question: &str,
        answer: &str,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reflection_answers (user_id, question, answer, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (user_id, question)
            DO UPDATE SET answer = EXCLUDED.answer, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user_id)
        .bind(question)
        .bind(answer)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
