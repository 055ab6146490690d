//! ScriptedClient — replays canned replies, no network.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use futures::StreamExt;
use tokio::sync::Notify;

use crate::client::{CompletionClient, FragmentStream};
use crate::error::TransportError;
use crate::types::CompletionRequest;

/// One item of a scripted stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Yield this fragment.
    Fragment(String),
    /// Yield a network failure with this message.
    Fail(String),
}

/// How the client answers one call.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Open a stream that yields these steps in order.
    Stream(Vec<Step>),
    /// Refuse to open the stream with this HTTP status.
    Refuse {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },
}

impl Reply {
    /// A stream of plain fragments that ends normally.
    pub fn fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Reply::Stream(
            fragments
                .into_iter()
                .map(|f| Step::Fragment(f.into()))
                .collect(),
        )
    }

    /// A stream of fragments followed by a network failure.
    pub fn fragments_then_fail<I, S>(fragments: I, error: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut steps: Vec<Step> = fragments
            .into_iter()
            .map(|f| Step::Fragment(f.into()))
            .collect();
        steps.push(Step::Fail(error.into()));
        Reply::Stream(steps)
    }
}

/// A [`CompletionClient`] that answers each call with the next scripted
/// [`Reply`] and records every request it receives.
///
/// Calls beyond the script get an empty stream. With [`ScriptedClient::gated`],
/// every stream waits for [`ScriptedClient::release`] before yielding,
/// which lets tests observe a turn while it is in flight.
#[derive(Clone, Default)]
pub struct ScriptedClient {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedClient {
    /// Create a client that plays back `replies`, one per call.
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            requests: Arc::default(),
            gate: None,
        }
    }

    /// Hold every stream open until [`release`](Self::release) is called.
    #[must_use]
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    /// Let one held stream proceed.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Queue another reply.
    pub fn push(&self, reply: Reply) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many times the client was called.
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl CompletionClient for ScriptedClient {
    fn stream_completion(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<FragmentStream, TransportError>> + Send {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Reply::Stream(Vec::new()));
        let gate = self.gate.clone();

        async move {
            let steps = match reply {
                Reply::Refuse { status, body } => {
                    return Err(TransportError::Status { status, body });
                }
                Reply::Stream(steps) => steps,
            };

            let items = steps.into_iter().map(|step| match step {
                Step::Fragment(text) => Ok(text),
                Step::Fail(message) => Err(TransportError::Network(message.into())),
            });
            let held = futures::stream::once(async move {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
            });
            let stream = held.flat_map(move |()| futures::stream::iter(items.clone()));
            Ok(FragmentStream::new(stream))
        }
    }
}
