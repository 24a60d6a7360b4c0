use serde::{Deserialize, Serialize};
use time::Date;

use crate::journal::{repo_types::day_format, repo_types::Mood, services::DEFAULT_LIMIT};

#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub content: String,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub is_draft: bool,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default, with = "day_format::option")]
    pub date: Option<Date>,
    #[serde(default)]
    pub is_draft: Option<bool>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct ReflectionAnswer {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
