// src/state.rs
use std::sync::Arc;

use crate::services::gemini::Generator;
use crate::services::transcript::TranscriptStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub transcript: TranscriptStore,
    pub generator: Arc<dyn Generator>,
}

impl AppState {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            transcript: TranscriptStore::new(),
            generator,
        }
    }
}
