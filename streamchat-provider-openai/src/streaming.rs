//! SSE streaming support for Chat Completions.
//!
//! Parses the Server-Sent Events body and yields the text of each
//! `choices[0].delta.content` as one fragment.
//!
//! Reference: <https://platform.openai.com/docs/api-reference/chat/streaming>

use std::time::Duration;

use futures::{Stream, StreamExt};
use reqwest::Response;
use streamchat_types::{FragmentStream, TransportError};

use crate::error::map_reqwest_error;
use crate::types::ChatCompletionChunk;

/// Wrap an HTTP response body into a [`FragmentStream`].
pub(crate) fn stream_completion(response: Response, timeout: Option<Duration>) -> FragmentStream {
    let byte_stream = response
        .bytes_stream()
        .map(move |chunk| chunk.map_err(|e| map_reqwest_error(e, timeout)));
    FragmentStream::new(parse_sse_stream(byte_stream))
}

/// Parse a raw byte stream into text fragments.
///
/// The body looks like:
/// ```text
/// data: {"id":"...","choices":[{"delta":{"content":"Hel"}}]}
///
/// data: {"id":"...","choices":[{"delta":{"content":"lo"}}]}
///
/// data: [DONE]
/// ```
///
/// Lines are split on raw bytes so a multi-byte character cut across two
/// network chunks is decoded only once it is whole.
pub(crate) fn parse_sse_stream(
    byte_stream: impl Stream<Item = Result<bytes::Bytes, TransportError>> + Send + 'static,
) -> impl Stream<Item = Result<String, TransportError>> + Send + 'static {
    async_stream::stream! {
        let mut parser = SseParser::new();
        let mut bytes_stream = std::pin::pin!(byte_stream);
        let mut line_buf: Vec<u8> = Vec::new();
        let mut fragments = 0usize;

        while let Some(chunk_result) = bytes_stream.next().await {
            let chunk = match chunk_result {
                Ok(b) => b,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };
            line_buf.extend_from_slice(&chunk);

            while let Some(newline_pos) = line_buf.iter().position(|b| *b == b'\n') {
                let raw: Vec<u8> = line_buf.drain(..=newline_pos).collect();
                let line = match std::str::from_utf8(&raw) {
                    Ok(s) => s.trim_end_matches(['\n', '\r']),
                    Err(e) => {
                        yield Err(TransportError::MalformedStream(format!("UTF-8 decode error: {e}")));
                        return;
                    }
                };

                match parser.process_line(line) {
                    Ok(Dispatch::Pending) => {}
                    Ok(Dispatch::Fragment(text)) => {
                        fragments += 1;
                        yield Ok(text);
                    }
                    Ok(Dispatch::Done) => {
                        tracing::trace!(fragments, "stream finished with [DONE]");
                        return;
                    }
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        }

        // Flush a trailing line and any data not followed by a blank line.
        let tail = match String::from_utf8(line_buf) {
            Ok(s) => s,
            Err(e) => {
                yield Err(TransportError::MalformedStream(format!("UTF-8 decode error: {e}")));
                return;
            }
        };
        for line in [tail.trim_end_matches('\r'), ""] {
            match parser.process_line(line) {
                Ok(Dispatch::Fragment(text)) => {
                    fragments += 1;
                    yield Ok(text);
                }
                Ok(Dispatch::Pending) => {}
                Ok(Dispatch::Done) => break,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }
        tracing::trace!(fragments, "stream body ended");
    }
}

/// What one processed line produced.
#[derive(Debug, PartialEq)]
pub(crate) enum Dispatch {
    /// Nothing to emit yet.
    Pending,
    /// A non-empty text fragment.
    Fragment(String),
    /// The `[DONE]` sentinel.
    Done,
}

/// Accumulates `data:` lines until a blank line dispatches the event.
pub(crate) struct SseParser {
    data: String,
}

impl SseParser {
    pub(crate) fn new() -> Self {
        Self {
            data: String::new(),
        }
    }

    /// Process one SSE line (without its terminator).
    pub(crate) fn process_line(&mut self, line: &str) -> Result<Dispatch, TransportError> {
        if line.is_empty() {
            return self.dispatch();
        }

        if let Some(value) = line.strip_prefix("data:") {
            let value = value.strip_prefix(' ').unwrap_or(value);
            if !self.data.is_empty() {
                self.data.push('\n');
            }
            self.data.push_str(value);
        }
        // `event:`, `id:`, `retry:` and `:` comment lines carry nothing we use.

        Ok(Dispatch::Pending)
    }

    fn dispatch(&mut self) -> Result<Dispatch, TransportError> {
        let data = std::mem::take(&mut self.data);

        if data.is_empty() {
            return Ok(Dispatch::Pending);
        }
        if data.trim() == "[DONE]" {
            return Ok(Dispatch::Done);
        }

        let chunk: ChatCompletionChunk = serde_json::from_str(&data).map_err(|e| {
            TransportError::MalformedStream(format!("JSON parse error in SSE: {e}"))
        })?;

        if let Some(error) = chunk.error {
            let message = error
                .message
                .unwrap_or_else(|| "unknown streaming error".to_string());
            return Err(TransportError::MalformedStream(message));
        }

        let Some(choice) = chunk.choices.into_iter().next() else {
            return Ok(Dispatch::Pending);
        };
        if let Some(reason) = &choice.finish_reason {
            tracing::trace!(finish_reason = %reason, "choice finished");
        }
        match choice.delta.content {
            Some(text) if !text.is_empty() => Ok(Dispatch::Fragment(text)),
            _ => Ok(Dispatch::Pending),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
