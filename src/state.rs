use crate::auth::{jwt::JwtKeys, repo::PgUserStore, repo::UserStore};
use crate::chat::client::{ChatClient, HttpChatClient};
use crate::config::AppConfig;
use crate::journal::repo::{JournalStore, PgJournalStore};
use crate::speech::{HttpSpeechClient, SpeechClient};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub keys: JwtKeys,
    pub users: Arc<dyn UserStore>,
    pub journal: Arc<dyn JournalStore>,
    pub chat: Option<Arc<dyn ChatClient>>,
    pub chat_max_history: usize,
    pub speech: Option<Arc<dyn SpeechClient>>,
}

impl AppState {
    /// Wires the Postgres stores and whichever collaborators are configured.
    pub fn init(config: &AppConfig, db: PgPool) -> anyhow::Result<Self> {
        let chat = match &config.chat {
            Some(c) => Some(Arc::new(HttpChatClient::new(c)?) as Arc<dyn ChatClient>),
            None => {
                tracing::warn!("CHAT_API_KEY not set; /chat is disabled");
                None
            }
        };
        let speech = match &config.speech {
            Some(s) => Some(Arc::new(HttpSpeechClient::new(s)?) as Arc<dyn SpeechClient>),
            None => {
                tracing::warn!("TTS_URL not set; /voice is disabled");
                None
            }
        };

        Ok(Self {
            keys: JwtKeys::new(&config.jwt),
            users: Arc::new(PgUserStore::new(db.clone())),
            journal: Arc::new(PgJournalStore::new(db)),
            chat_max_history: config.chat.as_ref().map_or(20, |c| c.max_history),
            chat,
            speech,
        })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::JwtConfig;
        use crate::memory::{MemoryJournalStore, MemoryUserStore};

        Self {
            keys: JwtKeys::new(&JwtConfig {
                secret: "test".into(),
                ttl_minutes: 30,
            }),
            users: Arc::new(MemoryUserStore::default()),
            journal: Arc::new(MemoryJournalStore::default()),
            chat: None,
            chat_max_history: 20,
            speech: None,
        }
    }
}
