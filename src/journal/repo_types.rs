use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

time::serde::format_description!(pub day_format, Date, "[year]-[month]-[day]");

/// Structured mood tag attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mood {
    pub emoji: String,
    pub label: String,
    pub value: String,
}

impl Default for Mood {
    fn default() -> Self {
        Self {
            emoji: "😐".into(),
            label: "Neutral".into(),
            value: "neutral".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub mood: Mood,
    pub tags: Vec<String>,
    pub is_draft: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    pub ai_response: Option<String>,
}

#[derive(Debug, FromRow)]
pub struct JournalEntryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub mood: Json<Mood>,
    pub tags: Vec<String>,
    pub is_draft: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
    pub ai_response: Option<String>,
}

impl From<JournalEntryRow> for JournalEntry {
    fn from(r: JournalEntryRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            content: r.content,
            mood: r.mood.0,
            tags: r.tags,
            is_draft: r.is_draft,
            created_at: r.created_at,
            updated_at: r.updated_at,
            ai_response: r.ai_response,
        }
    }
}

/// Entry as handed to the store; id and timestamp are assigned by the service.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub mood: Mood,
    pub is_draft: bool,
    pub created_at: OffsetDateTime,
}

impl From<NewEntry> for JournalEntry {
    fn from(n: NewEntry) -> Self {
        Self {
            id: n.id,
            user_id: n.user_id,
            content: n.content,
            mood: n.mood,
            tags: Vec::new(),
            is_draft: n.is_draft,
            created_at: n.created_at,
            updated_at: None,
            ai_response: None,
        }
    }
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryPatch {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub is_draft: Option<bool>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.mood.is_none() && self.is_draft.is_none() && self.tags.is_none()
    }

    /// Field-by-field merge onto an existing entry.
    pub fn apply(self, entry: &mut JournalEntry, now: OffsetDateTime) {
        if let Some(content) = self.content {
            entry.content = content;
        }
        if let Some(mood) = self.mood {
            entry.mood = mood;
        }
        if let Some(is_draft) = self.is_draft {
            entry.is_draft = is_draft;
        }
        if let Some(tags) = self.tags {
            entry.tags = tags;
        }
        entry.updated_at = Some(now);
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub date: Option<Date>,
    pub is_draft: Option<bool>,
}

impl EntryFilter {
    /// `[date 00:00 UTC, next day 00:00 UTC)` when a date is set.
    pub fn day_bounds(&self) -> Option<(OffsetDateTime, OffsetDateTime)> {
        self.date.map(|d| {
            let start = d.midnight().assume_utc();
            (start, start + time::Duration::days(1))
        })
    }

    pub fn matches(&self, entry: &JournalEntry) -> bool {
        if let Some((start, end)) = self.day_bounds() {
            if entry.created_at < start || entry.created_at >= end {
                return false;
            }
        }
        self.is_draft.map_or(true, |d| entry.is_draft == d)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodOfDay {
    #[serde(with = "day_format")]
    pub date: Date,
    pub mood: Mood,
}

#[derive(Debug, FromRow)]
pub struct MoodOfDayRow {
    pub day: Date,
    pub mood: Json<Mood>,
}

impl From<MoodOfDayRow> for MoodOfDay {
    fn from(r: MoodOfDayRow) -> Self {
        Self {
            date: r.day,
            mood: r.mood.0,
        }
    }
}
