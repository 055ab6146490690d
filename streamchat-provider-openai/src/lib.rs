//! Streaming client for OpenAI-compatible Chat Completions endpoints.
//!
//! Implements [`CompletionClient`] from `streamchat-types` against any
//! server that speaks the `/chat/completions` SSE protocol. The default
//! target is Scaleway's Generative APIs.
//!
//! # Usage
//!
//! ```no_run
//! use streamchat_provider_openai::OpenAiCompatible;
//!
//! # fn main() -> Result<(), streamchat_provider_openai::ConfigError> {
//! let client = OpenAiCompatible::from_env()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - Bearer auth with a redacted, zeroize-on-drop [`ApiKey`]
//! - SSE parsing tolerant of arbitrary chunk boundaries
//! - Non-2xx statuses, read errors and in-band error objects all surface
//!   as [`TransportError`]

pub mod client;
pub mod config;
pub(crate) mod error;
pub mod mapping;
pub(crate) mod streaming;
pub mod types;

pub use client::{DEFAULT_BASE_URL, OpenAiCompatible};
pub use config::{API_KEY_ENV, ApiKey};
pub use error::ConfigError;

// Re-export streamchat-types for convenience
pub use streamchat_types::{CompletionClient, FragmentStream, TransportError};
