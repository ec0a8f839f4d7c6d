// src/message.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct PostMessageRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostMessageResponse {
    pub success: bool,
}
