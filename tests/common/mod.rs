#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use chat_relay::routes::create_router;
use chat_relay::services::gemini::{
    GenerateContentRequest, GenerateContentResponse, GenerateError, Generator,
};
use chat_relay::state::{AppState, SharedState};

/// Generator that replays queued responses and records every request it sees.
#[derive(Default)]
pub struct FakeGenerator {
    replies: Mutex<VecDeque<Result<GenerateContentResponse, GenerateError>>>,
    requests: Mutex<Vec<GenerateContentRequest>>,
    stalled: AtomicBool,
}

impl FakeGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_text(&self, text: &str) {
        self.push(Ok(GenerateContentResponse::with_text(text)));
    }

    pub fn push(&self, reply: Result<GenerateContentResponse, GenerateError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Make every later call wait forever instead of answering.
    pub fn stall(&self) {
        self.stalled.store(true, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<GenerateContentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenerateError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerateError::Protocol("no reply queued".to_string())))
    }
}

pub fn app_with(generator: Arc<dyn Generator>) -> (Router, SharedState) {
    let state = Arc::new(AppState::new(generator));
    (create_router().with_state(state.clone()), state)
}

pub fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/messages")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_messages() -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/messages")
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
