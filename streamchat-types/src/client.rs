//! The completion client seam.
//!
//! [`CompletionClient`] uses RPITIT and is not object-safe. The session is
//! generic over it, so no boxing happens on the hot path.

use std::future::Future;
use std::pin::Pin;

use futures::Stream;

use crate::error::TransportError;
use crate::types::CompletionRequest;

/// Handle to a streaming completion: text fragments in arrival order.
///
/// The stream is finite. It ends by exhaustion or by yielding a single
/// `Err`, after which consumers stop polling.
pub struct FragmentStream {
    /// The fragments. Consume with `StreamExt::next()`.
    pub receiver: Pin<Box<dyn Stream<Item = Result<String, TransportError>> + Send>>,
}

impl FragmentStream {
    /// Wrap any sendable fragment stream.
    pub fn new(
        stream: impl Stream<Item = Result<String, TransportError>> + Send + 'static,
    ) -> Self {
        Self {
            receiver: Box::pin(stream),
        }
    }

    /// A stream that replays the given fragments and ends.
    pub fn from_fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<Result<String, TransportError>> =
            fragments.into_iter().map(|f| Ok(f.into())).collect();
        Self::new(futures::stream::iter(items))
    }
}

impl std::fmt::Debug for FragmentStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentStream").finish_non_exhaustive()
    }
}

/// A backend that streams chat completions.
pub trait CompletionClient: Send + Sync {
    /// Open a streaming completion for `request`.
    ///
    /// An `Err` here means the stream never opened (connect failure,
    /// non-2xx status). Failures after that arrive inside the stream.
    fn stream_completion(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<FragmentStream, TransportError>> + Send;
}
