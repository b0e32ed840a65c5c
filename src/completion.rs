use async_trait::async_trait;

use crate::chat::ChatMessage;
use crate::error::SweepError;

/// A single completion request sent to a backend.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model identifier to generate with.
    pub model: String,
    /// Conversation history; the sweep engine always sends one user message.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature for this request.
    pub temperature: f64,
    /// Maximum number of tokens the backend may generate.
    pub max_output_tokens: u32,
    /// Nucleus sampling parameter.
    pub top_p: f64,
}

impl CompletionRequest {
    /// Creates a request with the engine's default sampling parameters.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: 1.0,
            max_output_tokens: 512,
            top_p: 1.0,
        }
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the output token budget
    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Set the nucleus sampling parameter
    pub fn top_p(mut self, top_p: f64) -> Self {
        self.top_p = top_p;
        self
    }
}

/// A successful completion from a backend.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// The generated text.
    pub text: String,
}

impl std::fmt::Display for CompletionResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Trait for backends that can service completion requests.
///
/// The sweep engine receives one handle implementing this trait at
/// construction and issues every generation and judge call through it.
/// Any backend failure surfaces as a [`SweepError`], never as partial text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, req: &CompletionRequest) -> Result<CompletionResponse, SweepError>;
}
