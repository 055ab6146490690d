#![deny(missing_docs)]
//! # streamchat — umbrella crate
//!
//! Single import surface for streamchat: the shared types, the session
//! core, and (behind `provider-openai`, on by default) the
//! OpenAI-compatible streaming client. Plus a `prelude` for the happy path.

pub use streamchat_session;
pub use streamchat_types;

#[cfg(feature = "provider-openai")]
pub use streamchat_provider_openai;

/// Happy-path imports for wiring a chat session.
pub mod prelude {
    pub use streamchat_types::{
        CompletionClient, CompletionRequest, FragmentStream, Message, Model, ParameterError,
        RequestParameters, Role, TransportError,
    };

    pub use streamchat_session::{
        ChatSession, Conversation, IgnoreReason, NullSurface, RenderSurface, SessionConfig,
        Submission,
    };

    #[cfg(feature = "provider-openai")]
    pub use streamchat_provider_openai::{ApiKey, ConfigError, OpenAiCompatible};
}
