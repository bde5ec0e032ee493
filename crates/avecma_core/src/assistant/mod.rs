//! AI assistant relay: chat with a persona, and performance analysis.
//!
//! # Responsibility
//! - Turn relay requests into generative-language calls.
//! - Classify upstream failures into typed kinds.
//!
//! # See also
//! - `client::GenerativeClient` for the backend seam used by tests.

pub mod client;
pub mod error;
pub mod prompt;
pub mod relay;

pub use client::{GeminiClient, GenerateRequest, GenerateTurn, GenerativeClient};
pub use error::{AssistantError, AssistantErrorKind};
pub use relay::{
    handle_analyze, handle_analyze_json, handle_chat, handle_chat_json, AnalyzeRequest,
    ChatRequest, RelayResponse,
};
