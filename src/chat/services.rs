use tracing::info;

use crate::{
    chat::{
        client::ChatClient,
        dto::{ChatMessage, ChatResponse, Role},
    },
    error::{AppError, AppResult},
};

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Prepends the system prompt when missing, appends the new user message and
/// keeps at most `max_history` messages besides the system prompt, dropping
/// the oldest first.
pub fn build_conversation(
    history: Vec<ChatMessage>,
    message: &str,
    max_history: usize,
) -> Vec<ChatMessage> {
    let mut system = None;
    let mut turns = Vec::with_capacity(history.len() + 1);
    for m in history {
        match m.role {
            Role::System if system.is_none() => system = Some(m),
            Role::System => {}
            _ => turns.push(m),
        }
    }
    turns.push(ChatMessage::new(Role::User, message));

    let excess = turns.len().saturating_sub(max_history.max(1));
    turns.drain(..excess);

    let mut conversation = Vec::with_capacity(turns.len() + 1);
    conversation.push(system.unwrap_or_else(|| ChatMessage::new(Role::System, SYSTEM_PROMPT)));
    conversation.extend(turns);
    conversation
}

pub async fn converse(
    client: &dyn ChatClient,
    history: Vec<ChatMessage>,
    message: &str,
    max_history: usize,
) -> AppResult<ChatResponse> {
    if message.trim().is_empty() {
        return Err(AppError::Validation("Message must not be empty".into()));
    }

    let mut conversation = build_conversation(history, message, max_history);
    let completion = client
        .complete(&conversation)
        .await
        .map_err(AppError::Upstream)?;
    info!(turns = conversation.len(), "chat turn completed");

    conversation.push(ChatMessage::new(Role::Assistant, completion.content.clone()));
    Ok(ChatResponse {
        response: completion.content,
        usage: completion.usage,
        history: conversation,
    })
}
