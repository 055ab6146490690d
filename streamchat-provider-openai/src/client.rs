//! OpenAI-compatible client struct and builder.

use std::future::Future;
use std::time::Duration;

use streamchat_types::{CompletionClient, CompletionRequest, FragmentStream, TransportError};

use crate::config::ApiKey;
use crate::error::{ConfigError, map_http_status, map_reqwest_error};
use crate::mapping::to_api_request;
use crate::streaming::stream_completion;

/// Default API base URL (Scaleway Generative APIs, default project).
///
/// Project-scoped endpoints look like
/// `https://api.scaleway.ai/<project-id>/v1`; pass one to
/// [`OpenAiCompatible::base_url`].
pub const DEFAULT_BASE_URL: &str = "https://api.scaleway.ai/v1";

/// Streaming client for any OpenAI-compatible Chat Completions endpoint.
///
/// # Example
///
/// ```no_run
/// use streamchat_provider_openai::OpenAiCompatible;
///
/// let client = OpenAiCompatible::new("scw-...")
///     .base_url("https://api.scaleway.ai/v1");
/// ```
pub struct OpenAiCompatible {
    /// Bearer token.
    pub(crate) api_key: ApiKey,
    /// API base URL, including the version segment.
    pub(crate) base_url: String,
    /// Optional whole-request timeout. `None` keeps the transport default.
    pub(crate) timeout: Option<Duration>,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl OpenAiCompatible {
    /// Create a client with the given API key and the default base URL.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_key(ApiKey::new(api_key))
    }

    /// Create a client from an already wrapped key.
    pub fn with_key(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.into(),
            timeout: None,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client whose key comes from the `SCW_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::with_key(ApiKey::from_env()?))
    }

    /// Override the API base URL.
    ///
    /// Useful for a project-scoped endpoint, another OpenAI-compatible
    /// server, or a local mock. A trailing slash is ignored.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Bound the whole request, streaming included.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the chat completions endpoint URL.
    pub(crate) fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl std::fmt::Debug for OpenAiCompatible {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatible")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl CompletionClient for OpenAiCompatible {
    /// Send a streaming Chat Completions request.
    ///
    /// Resolves once the response headers arrive; the returned stream
    /// yields text fragments as the model generates them.
    fn stream_completion(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<FragmentStream, TransportError>> + Send {
        let url = self.completions_url();
        let timeout = self.timeout;
        let body = to_api_request(&request);

        tracing::debug!(url = %url, model = %body.model, messages = body.messages.len(), "sending streaming completion request");

        let mut builder = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .header("accept", "text/event-stream")
            .json(&body);
        if let Some(limit) = timeout {
            builder = builder.timeout(limit);
        }

        async move {
            let response = builder
                .send()
                .await
                .map_err(|e| map_reqwest_error(e, timeout))?;

            let status = response.status();
            if !status.is_success() {
                let body_text = response
                    .text()
                    .await
                    .map_err(|e| map_reqwest_error(e, timeout))?;
                return Err(map_http_status(status, &body_text));
            }

            Ok(stream_completion(response, timeout))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_url_is_set() {
        let client = OpenAiCompatible::new("test-key");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn builder_overrides_base_url() {
        let client = OpenAiCompatible::new("test-key").base_url("http://localhost:9999/v1/");
        assert_eq!(client.base_url, "http://localhost:9999/v1");
    }

    #[test]
    fn completions_url_includes_path() {
        let client = OpenAiCompatible::new("test-key").base_url("http://localhost:9999/v1");
        assert_eq!(
            client.completions_url(),
            "http://localhost:9999/v1/chat/completions"
        );
    }

    #[test]
    fn timeout_defaults_to_none() {
        let client = OpenAiCompatible::new("test-key");
        assert!(client.timeout.is_none());
        let client = client.timeout(Duration::from_secs(5));
        assert_eq!(client.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn debug_does_not_leak_key() {
        let client = OpenAiCompatible::new("sk-leaky");
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("sk-leaky"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn api_key_is_stored() {
        let client = OpenAiCompatible::new("sk-test-key");
        assert_eq!(client.api_key.expose(), "sk-test-key");
    }
}
