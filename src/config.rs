use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

/// Remote chat-completion provider (OpenAI-compatible `/chat/completions`).
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub max_history: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt: JwtConfig,
    pub chat: Option<ChatConfig>,
    pub speech: Option<SpeechConfig>,
    /// Browser origin allowed to call the API with credentials.
    pub cors_origin: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let database_max_connections = parse_var("DATABASE_MAX_CONNECTIONS").unwrap_or(10);

        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            ttl_minutes: parse_var("JWT_TTL_MINUTES").unwrap_or(30),
        };

        // Chat is optional: without a key the endpoint answers 503.
        let chat = std::env::var("CHAT_API_KEY").ok().map(|api_key| ChatConfig {
            api_url: std::env::var("CHAT_API_URL")
                .unwrap_or_else(|_| "https://models.inference.ai.azure.com".into()),
            api_key,
            model: std::env::var("CHAT_MODEL")
                .unwrap_or_else(|_| "Meta-Llama-3.1-8B-Instruct".into()),
            max_history: parse_var("CHAT_MAX_HISTORY").unwrap_or(20),
        });

        let speech = std::env::var("TTS_URL").ok().map(|url| SpeechConfig { url });
        let cors_origin =
            std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".into());

        Ok(Self {
            database_url,
            database_max_connections,
            jwt,
            chat,
            speech,
            cors_origin,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse::<T>().ok())
}
