//! Chat-completion access for AI-suggested actions.
//!
//! Handlers talk to a [`CompletionProvider`] held in the app state, so
//! tests can substitute a canned provider for [`openai::OpenAiClient`].

pub mod openai;

use async_trait::async_trait;

/// Errors from the completion layer.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// No API key is configured.
    #[error("OPENAI_API_KEY not set")]
    NotConfigured,

    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[error("AI request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The completion service returned a non-2xx status.
    #[error("{message}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Error message taken from the response body.
        message: String,
    },
}

/// Sends a single user prompt, with the fixed system instruction, and
/// returns the model's text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AiError>;
}
