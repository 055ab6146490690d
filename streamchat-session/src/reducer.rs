//! Folding a fragment stream into the conversation.
//!
//! [`apply_fragment`] is the pure fold over [`StreamState`]. [`TurnReducer`]
//! drives it against a [`Conversation`], keeping the assistant slot equal
//! to the accumulator after every fragment. [`reduce_turn`] packages a
//! whole turn as a stream of conversation snapshots.

use futures::{Stream, StreamExt};
use streamchat_types::TransportError;

use crate::conversation::Conversation;

/// Accumulated reply text for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamState {
    /// Concatenation of every fragment so far, in arrival order.
    pub accumulated: String,
    /// Whether the fragment stream ended normally.
    pub is_complete: bool,
}

/// Append `fragment` to the accumulator.
///
/// Empty fragments leave the state unchanged.
#[must_use]
pub fn apply_fragment(mut state: StreamState, fragment: &str) -> StreamState {
    state.accumulated.push_str(fragment);
    state
}

/// Owns the [`StreamState`] of one turn and mirrors it into the
/// conversation's assistant slot.
///
/// Use inside a turn started with [`Conversation::append_user`].
#[derive(Debug, Default)]
pub struct TurnReducer {
    state: StreamState,
    fragments: usize,
}

impl TurnReducer {
    /// A reducer with an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulator so far.
    pub fn state(&self) -> &StreamState {
        &self.state
    }

    /// Number of non-empty fragments applied.
    pub fn fragments(&self) -> usize {
        self.fragments
    }

    /// Apply one fragment. Returns `false` (and changes nothing) for an
    /// empty fragment or when `conversation` has no turn in flight.
    ///
    /// The first non-empty fragment opens the assistant slot; every one
    /// replaces the slot's content with the full accumulator.
    pub fn apply(&mut self, conversation: &mut Conversation, fragment: &str) -> bool {
        if fragment.is_empty() || !conversation.is_busy() {
            return false;
        }
        self.state = apply_fragment(std::mem::take(&mut self.state), fragment);
        self.fragments += 1;
        conversation.fill_slot(&self.state.accumulated);
        true
    }

    /// End the turn successfully and hand back the final state.
    pub fn finish(mut self, conversation: &mut Conversation) -> StreamState {
        self.state.is_complete = true;
        conversation.finalize_assistant_reply();
        self.state
    }

    /// End the turn with a failure.
    ///
    /// Partial output is discarded: the slot (opened if needed) holds
    /// exactly `failure_message`. Does nothing outside a turn.
    pub fn fail(self, conversation: &mut Conversation, failure_message: &str) {
        if conversation.fill_slot(failure_message) {
            conversation.finalize_assistant_reply();
        }
    }
}

/// Run one turn over `fragments`, yielding a snapshot after every change.
///
/// Snapshot 0 is `conversation` plus the user message. Each non-empty
/// fragment yields a snapshot whose assistant slot holds the concatenation
/// so far. The last snapshot is the finalized turn (idle), carrying either
/// the full reply or `failure_message` if the stream yielded an error.
/// Blank input yields nothing.
pub fn reduce_turn<S>(
    mut conversation: Conversation,
    user_input: String,
    fragments: S,
    failure_message: String,
) -> impl Stream<Item = Conversation>
where
    S: Stream<Item = Result<String, TransportError>>,
{
    async_stream::stream! {
        if let Err(reason) = conversation.append_user(user_input) {
            tracing::debug!(%reason, "turn not started");
            return;
        }
        yield conversation.clone();

        let mut reducer = TurnReducer::new();
        let mut fragments = std::pin::pin!(fragments);
        while let Some(item) = fragments.next().await {
            match item {
                Ok(fragment) => {
                    if reducer.apply(&mut conversation, &fragment) {
                        yield conversation.clone();
                    }
                }
                Err(error) => {
                    tracing::error!(%error, "completion stream failed");
                    reducer.fail(&mut conversation, &failure_message);
                    yield conversation;
                    return;
                }
            }
        }

        reducer.finish(&mut conversation);
        yield conversation;
    }
}
