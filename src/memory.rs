//! In-process `UserStore` / `JournalStore` used by unit and router tests.

use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    auth::{
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    error::{AppError, AppResult, ConflictField},
    journal::{
        repo::JournalStore,
        repo_types::{EntryFilter, EntryPatch, JournalEntry, MoodOfDay, NewEntry},
    },
};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(ConflictField::Email));
        }
        if users.iter().any(|u| u.username == user.username) {
            return Err(AppError::Conflict(ConflictField::Username));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            username: user.username,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[derive(Default)]
pub struct MemoryJournalStore {
    entries: RwLock<Vec<JournalEntry>>,
    reflections: RwLock<HashMap<(Uuid, String), (String, OffsetDateTime)>>,
}

impl MemoryJournalStore {
    pub async fn reflection_answer(&self, user_id: Uuid, question: &str) -> Option<String> {
        self.reflections
            .read()
            .await
            .get(&(user_id, question.to_string()))
            .map(|(answer, _)| answer.clone())
    }
}

#[async_trait]
impl JournalStore for MemoryJournalStore {
    async fn insert(&self, entry: NewEntry) -> AppResult<JournalEntry> {
        let entry = JournalEntry::from(entry);
        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JournalEntry>> {
        Ok(self.entries.read().await.iter().find(|e| e.id == id).cloned())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        filter: &EntryFilter,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<JournalEntry>> {
        let mut found: Vec<JournalEntry> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.user_id == user_id && filter.matches(e))
            .cloned()
            .collect();
        // Ties end up latest insert first.
        found.sort_by_key(|e| e.created_at);
        found.reverse();
        Ok(found
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: EntryPatch,
        now: OffsetDateTime,
    ) -> AppResult<Option<JournalEntry>> {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        patch.apply(entry, now);
        Ok(Some(entry.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        Ok(entries.len() != before)
    }

    async fn mood_by_day(&self, user_id: Uuid) -> AppResult<Vec<MoodOfDay>> {
        let mut mine: Vec<JournalEntry> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by_key(|e| e.created_at);

        let mut days: Vec<MoodOfDay> = Vec::new();
        for entry in mine {
            let date = entry.created_at.to_offset(time::UtcOffset::UTC).date();
            if days.last().map_or(true, |d| d.date != date) {
                days.push(MoodOfDay {
                    date,
                    mood: entry.mood,
                });
            }
        }
        Ok(days)
    }

    async fn upsert_reflection_answer(
        &self,
        user_id: Uuid,
        question: &str,
        answer: &str,
    ) -> AppResult<()> {
        self.reflections.write().await.insert(
            (user_id, question.to_string()),
            (answer.to_string(), OffsetDateTime::now_utc()),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::repo_types::Mood;
    use time::macros::{date, datetime};

    fn mood(value: &str) -> Mood {
        Mood {
            emoji: "•".into(),
            label: value.to_uppercase(),
            value: value.into(),
        }
    }

    async fn seed(
        store: &MemoryJournalStore,
        user_id: Uuid,
        at: OffsetDateTime,
        m: &str,
        draft: bool,
    ) -> JournalEntry {
        store
            .insert(NewEntry {
                id: Uuid::new_v4(),
                user_id,
                content: format!("{m} at {at}"),
                mood: mood(m),
                is_draft: draft,
                created_at: at,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn date_filter_is_half_open_utc_day() {
        let store = MemoryJournalStore::default();
        let me = Uuid::new_v4();
        seed(&store, me, datetime!(2024-01-14 23:59:59 UTC), "before", false).await;
        let start = seed(&store, me, datetime!(2024-01-15 00:00 UTC), "start", false).await;
        let late = seed(&store, me, datetime!(2024-01-15 23:59:59 UTC), "late", false).await;
        seed(&store, me, datetime!(2024-01-16 00:00 UTC), "next", false).await;

        let filter = EntryFilter {
            date: Some(date!(2024-01-15)),
            is_draft: None,
        };
        let found = store.list_by_user(me, &filter, 0, 10).await.unwrap();
        let ids: Vec<Uuid> = found.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![late.id, start.id]);
    }

    #[tokio::test]
    async fn list_is_newest_first_with_skip_limit_and_draft_filter() {
        let store = MemoryJournalStore::default();
        let me = Uuid::new_v4();
        let a = seed(&store, me, datetime!(2024-01-01 10:00 UTC), "a", false).await;
        let b = seed(&store, me, datetime!(2024-01-02 10:00 UTC), "b", true).await;
        let c = seed(&store, me, datetime!(2024-01-03 10:00 UTC), "c", false).await;

        let page = store
            .list_by_user(me, &EntryFilter::default(), 1, 1)
            .await
            .unwrap();
        assert_eq!(page.iter().map(|e| e.id).collect::<Vec<_>>(), vec![b.id]);

        let published = store
            .list_by_user(
                me,
                &EntryFilter {
                    date: None,
                    is_draft: Some(false),
                },
                0,
                10,
            )
            .await
            .unwrap();
        assert_eq!(published.iter().map(|e| e.id).collect::<Vec<_>>(), vec![c.id, a.id]);
    }

    #[tokio::test]
    async fn mood_by_day_takes_earliest_mood_per_day() {
        let store = MemoryJournalStore::default();
        let me = Uuid::new_v4();
        // Inserted out of order on purpose.
        seed(&store, me, datetime!(2024-01-15 18:00 UTC), "evening", false).await;
        seed(&store, me, datetime!(2024-01-15 08:00 UTC), "morning", false).await;
        seed(&store, me, datetime!(2024-01-14 12:00 UTC), "yesterday", false).await;

        let days = store.mood_by_day(me).await.unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date!(2024-01-14));
        assert_eq!(days[0].mood.value, "yesterday");
        assert_eq!(days[1].date, date!(2024-01-15));
        assert_eq!(days[1].mood.value, "morning");

        let json = serde_json::to_value(&days[1]).unwrap();
        assert_eq!(json["date"], "2024-01-15");
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let users = MemoryUserStore::default();
        let new = |email: &str, username: &str| NewUser {
            email: email.into(),
            username: username.into(),
            password_hash: "h".into(),
        };
        users.create(new("a@x.io", "a")).await.unwrap();
        assert!(matches!(
            users.create(new("a@x.io", "b")).await.unwrap_err(),
            AppError::Conflict(ConflictField::Email)
        ));
        assert!(matches!(
            users.create(new("b@x.io", "a")).await.unwrap_err(),
            AppError::Conflict(ConflictField::Username)
        ));
    }
}
