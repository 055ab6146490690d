//! Conversation messages and per-request generation parameters.
//!
//! These are the shared lingua franca: the session builds them, clients
//! map them onto their wire format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message (instructions).
    System,
    /// User message.
    User,
    /// Assistant (model) message.
    Assistant,
}

impl Role {
    /// The lowercase wire name of this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message author.
    pub role: Role,
    /// Plain-text (markdown) content.
    pub content: String,
}

impl Message {
    /// Create a message with an explicit role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// The fixed set of models offered by the inference endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Model {
    /// `llama-3.3-70b-instruct`
    #[serde(rename = "llama-3.3-70b-instruct")]
    Llama33_70bInstruct,
    /// `gemma-3-27b-it`
    #[default]
    #[serde(rename = "gemma-3-27b-it")]
    Gemma3_27bIt,
    /// `deepseek-r1-distill-llama-70b`
    #[serde(rename = "deepseek-r1-distill-llama-70b")]
    DeepseekR1DistillLlama70b,
    /// `mistral-small-3.1-24b-instruct-2503`
    #[serde(rename = "mistral-small-3.1-24b-instruct-2503")]
    MistralSmall31_24bInstruct2503,
    /// `mistral-nemo-instruct-2407`
    #[serde(rename = "mistral-nemo-instruct-2407")]
    MistralNemoInstruct2407,
    /// `pixtral-12b-2409`
    #[serde(rename = "pixtral-12b-2409")]
    Pixtral12b2409,
    /// `qwen2.5-coder-32b-instruct`
    #[serde(rename = "qwen2.5-coder-32b-instruct")]
    Qwen25Coder32bInstruct,
}

impl Model {
    /// Every selectable model, in display order.
    pub const ALL: [Model; 7] = [
        Model::Llama33_70bInstruct,
        Model::Gemma3_27bIt,
        Model::DeepseekR1DistillLlama70b,
        Model::MistralSmall31_24bInstruct2503,
        Model::MistralNemoInstruct2407,
        Model::Pixtral12b2409,
        Model::Qwen25Coder32bInstruct,
    ];

    /// The model identifier sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Model::Llama33_70bInstruct => "llama-3.3-70b-instruct",
            Model::Gemma3_27bIt => "gemma-3-27b-it",
            Model::DeepseekR1DistillLlama70b => "deepseek-r1-distill-llama-70b",
            Model::MistralSmall31_24bInstruct2503 => "mistral-small-3.1-24b-instruct-2503",
            Model::MistralNemoInstruct2407 => "mistral-nemo-instruct-2407",
            Model::Pixtral12b2409 => "pixtral-12b-2409",
            Model::Qwen25Coder32bInstruct => "qwen2.5-coder-32b-instruct",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Model::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ParameterError::UnknownModel(s.to_string()))
    }
}

/// Generation parameters supplied by the caller for one request.
///
/// Defaults match the values the chat UI starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestParameters {
    /// Model to generate with.
    pub model: Model,
    /// Maximum tokens to generate. Must be positive.
    pub max_tokens: u32,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f64,
    /// Nucleus sampling mass in `[0, 1]`.
    pub top_p: f64,
    /// Presence penalty in `[0, 1]`.
    pub presence_penalty: f64,
}

impl Default for RequestParameters {
    fn default() -> Self {
        Self {
            model: Model::default(),
            max_tokens: 512,
            temperature: 0.8,
            top_p: 0.7,
            presence_penalty: 0.0,
        }
    }
}

impl RequestParameters {
    /// Default parameters for the given model.
    #[must_use]
    pub fn for_model(model: Model) -> Self {
        Self {
            model,
            ..Self::default()
        }
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.max_tokens == 0 {
            return Err(ParameterError::MaxTokens);
        }
        unit_interval("temperature", self.temperature)?;
        unit_interval("top_p", self.top_p)?;
        unit_interval("presence_penalty", self.presence_penalty)?;
        Ok(())
    }
}

fn unit_interval(name: &'static str, value: f64) -> Result<(), ParameterError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ParameterError::OutOfRange { name, value })
    }
}

/// What a [`CompletionClient`](crate::CompletionClient) is asked to stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Generation parameters.
    pub parameters: RequestParameters,
    /// Messages to send, in order.
    pub messages: Vec<Message>,
}
