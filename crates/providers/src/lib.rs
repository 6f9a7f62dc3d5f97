//! AI completion and image-generation backends.
//!
//! The dispatcher consumes the two traits here and nothing else; the
//! bundled [`OpenAiChat`] implementation speaks the OpenAI-compatible
//! HTTP API. An empty completion string is the in-band failure signal —
//! the dispatcher turns it into an apology reply.

pub mod openai_compat;

use async_trait::async_trait;

use magpie_common::ChatRecord;

pub use openai_compat::OpenAiChat;

/// Conversational completion over a session's full history.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Produce the assistant's next message. `session_key` identifies the
    /// conversation for logging and provider-side affinity; the prompt is
    /// the `history` slice, system record first.
    ///
    /// Returning an empty string signals a soft failure.
    async fn complete(&self, session_key: &str, history: &[ChatRecord]) -> anyhow::Result<String>;
}

/// Prompt-to-image generation.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Generate an image and return its URL.
    async fn generate(&self, session_key: &str, prompt: &str) -> anyhow::Result<String>;
}
