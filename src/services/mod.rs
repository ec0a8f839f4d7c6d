pub mod gemini;
pub mod relay;
pub mod transcript;
