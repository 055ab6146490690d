#![deny(missing_docs)]
//! Shared types for streamchat.
//!
//! Provides the conversation [`Message`] model, the per-request
//! [`RequestParameters`], and the [`CompletionClient`] trait that streaming
//! backends implement. The session crate is generic over the client;
//! provider crates implement it.

pub mod client;
pub mod error;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod test_utils;

// Re-exports
pub use client::{CompletionClient, FragmentStream};
pub use error::{ParameterError, TransportError};
pub use types::*;
