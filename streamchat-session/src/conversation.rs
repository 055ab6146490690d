//! Conversation state: the ordered message list, the in-flight flag, and
//! the single assistant slot being streamed into.

use streamchat_types::{Message, Role};
use thiserror::Error;

/// Misuse of the [`Conversation`] turn protocol.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    /// The user input was empty or whitespace only.
    #[error("user input is empty")]
    EmptyInput,

    /// A turn is already in flight.
    #[error("a turn is already in progress")]
    Busy,

    /// No turn has been started with `append_user`.
    #[error("no turn in progress")]
    NoTurn,

    /// The current turn already has an assistant reply open.
    #[error("an assistant reply is already open for this turn")]
    ReplyInProgress,

    /// `update_assistant_reply` was called without an open reply.
    #[error("no assistant reply is open")]
    NoActiveReply,
}

/// Handle to the assistant message currently being streamed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

impl SlotId {
    /// Position of the slot in [`Conversation::messages`].
    pub fn index(self) -> usize {
        self.0
    }
}

/// Ordered messages plus the state of the current turn.
///
/// A turn runs `append_user` → `begin_assistant_reply` →
/// `update_assistant_reply`* → `finalize_assistant_reply`. While it runs the
/// conversation is busy and holds at most one open assistant slot; updates
/// replace that slot's content wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
    slot: Option<SlotId>,
    busy: bool,
}

impl Conversation {
    /// An empty, idle conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// An idle conversation seeded with existing messages.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            slot: None,
            busy: false,
        }
    }

    /// All messages in chronological order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether there are no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Whether a turn is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Handle to the open assistant slot, if any.
    pub fn slot(&self) -> Option<SlotId> {
        self.slot
    }

    /// The assistant message currently being streamed into, if any.
    pub fn assistant_slot(&self) -> Option<&Message> {
        self.slot.and_then(|SlotId(i)| self.messages.get(i))
    }

    /// Start a turn with the user's message.
    ///
    /// Blank input and input arriving mid-turn leave the conversation
    /// untouched.
    pub fn append_user(&mut self, content: impl Into<String>) -> Result<(), ConversationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ConversationError::EmptyInput);
        }
        if self.busy {
            return Err(ConversationError::Busy);
        }
        self.messages.push(Message::user(content));
        self.slot = None;
        self.busy = true;
        Ok(())
    }

    /// Open the assistant slot for the current turn, with empty content.
    pub fn begin_assistant_reply(&mut self) -> Result<SlotId, ConversationError> {
        if !self.busy {
            return Err(ConversationError::NoTurn);
        }
        if self.slot.is_some() {
            return Err(ConversationError::ReplyInProgress);
        }
        Ok(self.open_slot())
    }

    /// Replace the open slot's content with `full_content`.
    pub fn update_assistant_reply(&mut self, full_content: &str) -> Result<(), ConversationError> {
        let slot = self.slot.ok_or(ConversationError::NoActiveReply)?;
        self.replace_slot(slot, full_content);
        Ok(())
    }

    /// End the current turn: the slot is closed and the conversation idles.
    ///
    /// Idempotent.
    pub fn finalize_assistant_reply(&mut self) {
        self.slot = None;
        self.busy = false;
    }

    /// Write `content` into the slot, opening it first if needed.
    ///
    /// Returns `false` and changes nothing outside a turn.
    pub(crate) fn fill_slot(&mut self, content: &str) -> bool {
        if !self.busy {
            return false;
        }
        let slot = match self.slot {
            Some(slot) => slot,
            None => self.open_slot(),
        };
        self.replace_slot(slot, content);
        true
    }

    fn open_slot(&mut self) -> SlotId {
        self.messages.push(Message::new(Role::Assistant, String::new()));
        let slot = SlotId(self.messages.len() - 1);
        self.slot = Some(slot);
        slot
    }

    fn replace_slot(&mut self, SlotId(index): SlotId, content: &str) {
        if let Some(message) = self.messages.get_mut(index) {
            message.content.clear();
            message.content.push_str(content);
        }
    }
}
