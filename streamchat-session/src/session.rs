//! A chat session: one conversation, one client, at most one turn in flight.

use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::StreamExt;
use streamchat_types::{
    CompletionClient, CompletionRequest, FragmentStream, Message, ParameterError,
    RequestParameters, TransportError,
};

use crate::config::SessionConfig;
use crate::conversation::{Conversation, ConversationError};
use crate::reducer::TurnReducer;
use crate::render::RenderSurface;

/// Why a submit did nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum IgnoreReason {
    /// The input was empty or whitespace only.
    EmptyInput,
    /// Another turn was still in flight.
    Busy,
    /// The request parameters were out of range.
    InvalidParameters(ParameterError),
}

/// Outcome of [`ChatSession::submit`].
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Submission {
    /// The reply streamed to the end.
    Completed {
        /// Number of non-empty fragments received.
        fragments: usize,
    },
    /// The transport failed; the reply shows the failure message.
    Failed,
    /// Nothing was sent and the conversation is unchanged.
    Ignored(IgnoreReason),
}

/// Drives turns against a [`CompletionClient`] and publishes every change
/// to a [`RenderSurface`].
///
/// A submit arriving while a turn is in flight is dropped, not queued.
/// Only the system prompt and the current user message are sent; earlier
/// turns stay local.
///
/// # Example
///
/// ```no_run
/// # async fn run(client: impl streamchat_types::CompletionClient) {
/// use streamchat_session::{ChatSession, NullSurface};
/// use streamchat_types::RequestParameters;
///
/// let session = ChatSession::new(client);
/// let _ = session
///     .submit("Hello!", &RequestParameters::default(), &NullSurface)
///     .await;
/// # }
/// ```
pub struct ChatSession<C> {
    client: C,
    config: SessionConfig,
    conversation: Mutex<Conversation>,
}

impl<C: CompletionClient> ChatSession<C> {
    /// A session with default configuration and an empty conversation.
    pub fn new(client: C) -> Self {
        Self::with_config(client, SessionConfig::default())
    }

    /// A session with explicit configuration.
    pub fn with_config(client: C, config: SessionConfig) -> Self {
        Self {
            client,
            config,
            conversation: Mutex::new(Conversation::new()),
        }
    }

    /// Replace the conversation the session starts from.
    ///
    /// Any turn left open in `conversation` (e.g. a mid-turn snapshot) is
    /// finalized, so the session starts idle.
    #[must_use]
    pub fn with_conversation(self, mut conversation: Conversation) -> Self {
        conversation.finalize_assistant_reply();
        Self {
            conversation: Mutex::new(conversation),
            ..self
        }
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Whether a turn is in flight.
    pub fn is_busy(&self) -> bool {
        self.lock().is_busy()
    }

    /// A copy of the current conversation.
    pub fn snapshot(&self) -> Conversation {
        self.lock().clone()
    }

    /// Submit user input and stream the reply into the conversation.
    ///
    /// `surface` sees the conversation after the user message is added,
    /// after every non-empty fragment, and once more when the turn ends.
    /// It is called with the session unlocked, so it may query the session.
    /// Transport failures never escape: they are logged and the reply is
    /// replaced by the configured failure message.
    pub async fn submit<S>(
        &self,
        input: &str,
        params: &RequestParameters,
        surface: &S,
    ) -> Submission
    where
        S: RenderSurface + ?Sized,
    {
        if input.trim().is_empty() {
            tracing::debug!("ignoring blank submit");
            return Submission::Ignored(IgnoreReason::EmptyInput);
        }
        if let Err(e) = params.validate() {
            tracing::warn!(error = %e, "ignoring submit with invalid parameters");
            return Submission::Ignored(IgnoreReason::InvalidParameters(e));
        }

        let started = self.update(|conversation| {
            conversation.append_user(input)?;
            Ok::<_, ConversationError>(conversation.clone())
        });
        let snapshot = match started {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::debug!(reason = %e, "ignoring submit");
                return Submission::Ignored(match e {
                    ConversationError::EmptyInput => IgnoreReason::EmptyInput,
                    _ => IgnoreReason::Busy,
                });
            }
        };
        let turn = TurnGuard::new(&self.conversation);
        surface.render(&snapshot);

        let request = CompletionRequest {
            parameters: params.clone(),
            messages: vec![
                Message::system(self.config.system_prompt.as_str()),
                Message::user(input),
            ],
        };
        tracing::debug!(model = %params.model, "turn started");

        let mut reducer = TurnReducer::new();
        let result = match self.client.stream_completion(request).await {
            Ok(stream) => self.consume(stream, &mut reducer, surface).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                let fragments = reducer.fragments();
                let snapshot = turn.end(|conversation| {
                    reducer.finish(conversation);
                });
                surface.render(&snapshot);
                tracing::debug!(fragments, "turn completed");
                Submission::Completed { fragments }
            }
            Err(error) => {
                tracing::error!(%error, status = ?error.status(), "streaming completion failed");
                let snapshot = turn.end(|conversation| {
                    reducer.fail(conversation, &self.config.failure_message);
                });
                surface.render(&snapshot);
                Submission::Failed
            }
        }
    }

    /// Apply fragments until the stream ends or fails.
    async fn consume<S>(
        &self,
        mut stream: FragmentStream,
        reducer: &mut TurnReducer,
        surface: &S,
    ) -> Result<(), TransportError>
    where
        S: RenderSurface + ?Sized,
    {
        while let Some(item) = stream.receiver.next().await {
            let fragment = item?;
            let changed = self.update(|conversation| {
                reducer
                    .apply(conversation, &fragment)
                    .then(|| conversation.clone())
            });
            if let Some(snapshot) = changed {
                surface.render(&snapshot);
            }
        }
        Ok(())
    }

    /// Run `f` with the conversation locked. Never spans an await.
    fn update<R>(&self, f: impl FnOnce(&mut Conversation) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Conversation> {
        lock(&self.conversation)
    }
}

fn lock(conversation: &Mutex<Conversation>) -> MutexGuard<'_, Conversation> {
    conversation.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ends the turn if the submit future is dropped before [`TurnGuard::end`].
///
/// Once disarmed it never touches the conversation again, which by then
/// may belong to the next turn.
struct TurnGuard<'a> {
    conversation: &'a Mutex<Conversation>,
    armed: bool,
}

impl<'a> TurnGuard<'a> {
    fn new(conversation: &'a Mutex<Conversation>) -> Self {
        Self {
            conversation,
            armed: true,
        }
    }

    /// Close the turn with `f` under the lock, disarm, and return the
    /// resulting snapshot.
    fn end(mut self, f: impl FnOnce(&mut Conversation)) -> Conversation {
        let mut conversation = lock(self.conversation);
        f(&mut conversation);
        self.armed = false;
        conversation.clone()
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            lock(self.conversation).finalize_assistant_reply();
        }
    }
}
