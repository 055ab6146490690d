//! Configuration for a chat session.

/// System prompt sent ahead of every user turn.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant";

/// Assistant text shown when a turn fails.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Static configuration for a [`ChatSession`](crate::ChatSession).
///
/// Generation parameters are per request and live in
/// [`RequestParameters`](streamchat_types::RequestParameters); this holds
/// what stays fixed for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// System prompt sent as the first message of every request.
    pub system_prompt: String,

    /// Fixed assistant text that replaces the reply when a turn fails.
    pub failure_message: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            failure_message: DEFAULT_FAILURE_MESSAGE.into(),
        }
    }
}
