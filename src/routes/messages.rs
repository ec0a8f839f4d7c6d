use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::warn;

use crate::{
    error::RelayError,
    message::{PostMessageRequest, PostMessageResponse},
    services::{relay, transcript::Message},
    state::SharedState,
};

pub async fn list_messages_handler(State(state): State<SharedState>) -> Json<Vec<Message>> {
    Json(relay::list_messages(&state.transcript).await)
}

pub async fn post_message_handler(
    State(state): State<SharedState>,
    payload: Result<Json<PostMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PostMessageResponse>), RelayError> {
    // An unreadable body is treated like one with no fields.
    let Json(payload) = payload.map_err(|rejection| {
        warn!(%rejection, "rejected message body");
        RelayError::Validation
    })?;

    relay::post_message(&state, payload).await?;

    Ok((StatusCode::CREATED, Json(PostMessageResponse { success: true })))
}
