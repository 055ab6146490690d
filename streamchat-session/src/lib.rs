#![deny(missing_docs)]
//! Stream-to-conversation reduction for streamchat.
//!
//! Turns a sequence of streamed text fragments into one assistant message
//! that grows in place, with at most one request in flight.
//!
//! - [`Conversation`] holds the messages, the busy flag, and the single
//!   assistant slot of the current turn.
//! - [`TurnReducer`] folds fragments into that slot; [`reduce_turn`] does
//!   the same as a stream of snapshots.
//! - [`ChatSession`] ties a [`CompletionClient`](streamchat_types::CompletionClient)
//!   to a conversation and a [`RenderSurface`].

pub mod config;
pub mod conversation;
pub mod reducer;
pub mod render;
pub mod session;

// Re-exports
pub use config::{DEFAULT_FAILURE_MESSAGE, DEFAULT_SYSTEM_PROMPT, SessionConfig};
pub use conversation::{Conversation, ConversationError, SlotId};
pub use reducer::{StreamState, TurnReducer, apply_fragment, reduce_turn};
pub use render::{NullSurface, RenderSurface};
pub use session::{ChatSession, IgnoreReason, Submission};
