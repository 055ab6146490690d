//! The seam to whatever draws the conversation.

use crate::conversation::Conversation;

/// Receives a snapshot every time the conversation changes.
///
/// Called synchronously from the submitting task with the session
/// unlocked. The turn does not advance until `render` returns.
pub trait RenderSurface {
    /// Draw `conversation`.
    fn render(&self, conversation: &Conversation);
}

impl<F> RenderSurface for F
where
    F: Fn(&Conversation),
{
    fn render(&self, conversation: &Conversation) {
        self(conversation)
    }
}

/// A surface that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn render(&self, _conversation: &Conversation) {}
}
