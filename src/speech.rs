//! Text-to-speech pass-through. Synthesis happens in the remote engine; this
//! module only forwards text and relays the audio bytes.

use anyhow::Context;
use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    auth::extractors::AuthUser,
    config::SpeechConfig,
    error::{AppError, AppResult},
    state::AppState,
};

#[async_trait]
pub trait SpeechClient: Send + Sync {
    /// Returns WAV audio for `text`.
    async fn synthesize(&self, text: &str) -> anyhow::Result<Bytes>;
}

/// Posts `{"text": ...}` to the configured engine URL.
pub struct HttpSpeechClient {
    http: reqwest::Client,
    url: String,
}

impl HttpSpeechClient {
    pub fn new(config: &SpeechConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .context("build speech http client")?;
        Ok(Self {
            http,
            url: config.url.clone(),
        })
    }
}

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
}

#[async_trait]
impl SpeechClient for HttpSpeechClient {
    async fn synthesize(&self, text: &str) -> anyhow::Result<Bytes> {
        let audio = self
            .http
            .post(&self.url)
            .json(&SynthesisRequest { text })
            .send()
            .await
            .context("send synthesis request")?
            .error_for_status()
            .context("synthesis status")?
            .bytes()
            .await
            .context("read synthesized audio")?;
        Ok(audio)
    }
}

#[derive(Debug, Deserialize)]
pub struct VoiceRequest {
    pub message: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/voice", post(generate_speech))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn generate_speech(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<VoiceRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let client = state.speech.clone().ok_or(AppError::Unavailable("speech"))?;
    let Json(req) = payload?;
    if req.message.trim().is_empty() {
        return Err(AppError::Validation("Message must not be empty".into()));
    }

    let audio = client
        .synthesize(&req.message)
        .await
        .map_err(AppError::Upstream)?;
    info!(bytes = audio.len(), "speech synthesized");
    Ok(([(header::CONTENT_TYPE, "audio/wav")], audio))
}
