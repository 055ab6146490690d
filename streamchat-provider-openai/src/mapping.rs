//! Mapping from [`CompletionRequest`] to the Chat Completions wire body.

use streamchat_types::CompletionRequest;

use crate::types::ChatCompletionRequest;

/// Build the streaming request body for `req`.
///
/// Messages are sent exactly as given; the caller decides what context
/// goes out.
#[must_use]
pub fn to_api_request(req: &CompletionRequest) -> ChatCompletionRequest<'_> {
    let params = &req.parameters;
    ChatCompletionRequest {
        model: params.model.as_str(),
        messages: &req.messages,
        max_tokens: params.max_tokens,
        temperature: params.temperature,
        top_p: params.top_p,
        presence_penalty: params.presence_penalty,
        stream: true,
    }
}
