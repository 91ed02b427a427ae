//! CompletionService trait — the abstraction over the chat-completion API.
//!
//! A CompletionService accepts an ordered list of role-tagged messages plus
//! a sampling configuration and returns a single text completion. One
//! blocking request/response per call; no retry, streaming, or cancellation
//! is implemented at this layer.
//!
//! Implementations: OpenRouter (or any OpenAI-compatible endpoint).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CompletionError;
use crate::message::Message;

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Temperature (0.0 = deterministic, 1.0 = creative)
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Nucleus sampling cutoff
    pub top_p: f32,

    /// Penalty for repeating tokens already present
    pub frequency_penalty: f32,

    /// Penalty for reusing tokens at all
    pub presence_penalty: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1500,
            top_p: 0.9,
            frequency_penalty: 0.3,
            presence_penalty: 0.3,
        }
    }
}

/// A complete request to the completion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "openai/gpt-4o-mini")
    pub model: String,

    /// The ordered conversation messages
    pub messages: Vec<Message>,

    /// Sampling configuration
    #[serde(default)]
    pub sampling: SamplingConfig,
}

impl CompletionRequest {
    /// Build a request with the default sampling configuration.
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            sampling: SamplingConfig::default(),
        }
    }
}

/// The core CompletionService trait.
///
/// The tutoring engine calls `complete()` without knowing which backend is
/// being used — pure polymorphism.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// A human-readable name for this service (e.g., "openrouter").
    fn name(&self) -> &str;

    /// Send a request and get the single generated text back.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<String, CompletionError>;
}
