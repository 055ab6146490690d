//! Chat Completions wire types.
//!
//! Reference: <https://platform.openai.com/docs/api-reference/chat/streaming>

use serde::{Deserialize, Serialize};
use streamchat_types::Message;

/// Streaming Chat Completions request body.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    /// Model identifier.
    pub model: &'a str,
    /// Conversation messages, already `{role, content}` shaped.
    pub messages: &'a [Message],
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
    /// Nucleus sampling mass.
    pub top_p: f64,
    /// Presence penalty.
    pub presence_penalty: f64,
    /// Always `true`; this client only streams.
    pub stream: bool,
}

/// One `data:` payload of the event stream.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunk {
    /// Choices carried by this chunk. Only the first is read.
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    /// Error object some servers emit in-band instead of a status code.
    #[serde(default)]
    pub error: Option<ApiError>,
}

/// A choice within a streamed chunk.
#[derive(Debug, Deserialize)]
pub struct ChunkChoice {
    /// Incremental message content.
    #[serde(default)]
    pub delta: ChunkDelta,
    /// Why generation stopped, on the last chunk.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The incremental part of a choice.
#[derive(Debug, Default, Deserialize)]
pub struct ChunkDelta {
    /// New text, if any. `null` on role-only or tool-call deltas.
    #[serde(default)]
    pub content: Option<String>,
}

/// In-band error object.
#[derive(Debug, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}
