// src/services/relay.rs
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::{
    error::RelayError,
    message::PostMessageRequest,
    services::{
        gemini::GenerateContentRequest,
        transcript::{Message, TranscriptStore},
    },
    state::AppState,
};

/// Inbound message that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub text: String,
    pub sender: String,
}

impl TryFrom<PostMessageRequest> for NewMessage {
    type Error = RelayError;

    fn try_from(req: PostMessageRequest) -> Result<Self, Self::Error> {
        match (req.text, req.sender) {
            (Some(text), Some(sender)) if !text.is_empty() && !sender.is_empty() => {
                Ok(Self { text, sender })
            }
            _ => Err(RelayError::Validation),
        }
    }
}

/// Upper-case the first character and trim the remainder.
pub fn format_bot_reply(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().trim().chars()).collect(),
        None => String::new(),
    }
}

pub async fn list_messages(transcript: &TranscriptStore) -> Vec<Message> {
    transcript.all().await
}

/// Commit the user's message, replay the transcript upstream and commit the reply.
///
/// The user's record is appended before the upstream call and is kept when
/// generation fails, leaving an unanswered trailing message.
pub async fn post_message(state: &AppState, req: PostMessageRequest) -> Result<(), RelayError> {
    let incoming = NewMessage::try_from(req)?;

    let span = info_span!("post_message", request_id = %Uuid::new_v4(), sender = %incoming.sender);
    async move {
        let len = state
            .transcript
            .append(Message::new(incoming.text, incoming.sender))
            .await;
        info!(len, "user message committed");

        let history = state.transcript.all().await;
        let request = GenerateContentRequest::from_history(&history);

        let reply = match generate_reply(state, &request).await {
            Ok(reply) => reply,
            Err(err) => {
                error!(error = %err, "generation failed");
                return Err(err);
            }
        };

        let len = state.transcript.append(Message::bot(reply)).await;
        info!(len, "reply committed");
        Ok(())
    }
    .instrument(span)
    .await
}

async fn generate_reply(
    state: &AppState,
    request: &GenerateContentRequest,
) -> Result<String, RelayError> {
    let response = state.generator.generate_content(request).await?;
    let text = response.first_text()?;
    Ok(format_bot_reply(text))
}
