//! In-memory implementations for testing.
//!
//! Available behind the `test-utils` feature flag.

mod scripted_client;

pub use scripted_client::{Reply, ScriptedClient, Step};
