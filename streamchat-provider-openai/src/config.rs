//! API key handling.

use zeroize::Zeroizing;

use crate::error::ConfigError;

/// Environment variable holding the endpoint API key.
pub const API_KEY_ENV: &str = "SCW_API_KEY";

/// An endpoint API key. Cannot be logged or cloned; zeroed on drop.
pub struct ApiKey {
    inner: Zeroizing<String>,
}

impl ApiKey {
    /// Wrap a key. The string is moved, not copied.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            inner: Zeroizing::new(key.into()),
        }
    }

    /// Read the key from [`API_KEY_ENV`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the key through `lookup`, treating a blank value as missing.
    pub fn from_lookup(
        lookup: impl FnOnce(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        match lookup(API_KEY_ENV) {
            Some(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(ConfigError::MissingApiKey(API_KEY_ENV)),
        }
    }

    pub(crate) fn expose(&self) -> &str {
        &self.inner
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}
