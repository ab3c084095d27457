//! Request and response types.

use crate::{Message, Role};
use serde::{Deserialize, Serialize};

/// A request to start a new story.
///
/// Only `premise` is required; the engine rejects a blank premise before
/// contacting any model.
///
/// # Examples
///
/// ```
/// use fabula_core::StoryGenerationRequest;
///
/// let request = StoryGenerationRequest::builder()
///     .premise("A lighthouse keeper finds a door in the sea")
///     .genre("mystery")
///     .constraints(vec!["no magic".to_string()])
///     .build()
///     .unwrap();
///
/// assert_eq!(request.genre().as_deref(), Some("mystery"));
/// assert!(request.style().is_none());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    derive_builder::Builder,
    derive_getters::Getters,
)]
#[builder(setter(into), default)]
pub struct StoryGenerationRequest {
    /// What the story is about
    premise: String,
    /// Optional genre hint
    #[builder(setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    genre: Option<String>,
    /// Optional prose style hint
    #[builder(setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style: Option<String>,
    /// Additional constraints, in order
    #[serde(default)]
    constraints: Vec<String>,
}

impl StoryGenerationRequest {
    /// Creates a new request builder.
    pub fn builder() -> StoryGenerationRequestBuilder {
        StoryGenerationRequestBuilder::default()
    }

    /// Request with a premise and nothing else.
    pub fn new(premise: impl Into<String>) -> Self {
        Self {
            premise: premise.into(),
            ..Self::default()
        }
    }
}

/// A single call to a generative service.
///
/// # Examples
///
/// ```
/// use fabula_core::{GenerateRequest, Message, Role};
///
/// let request = GenerateRequest::builder()
///     .messages(vec![Message { role: Role::User, content: "Hello".to_string() }])
///     .model("gemini-1.5-pro")
///     .temperature(Some(0.8))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.user_prompt(), Some("Hello"));
/// assert_eq!(request.max_tokens, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
pub struct GenerateRequest {
    /// The prompt messages to send
    pub messages: Vec<Message>,
    /// Model identifier to use
    #[builder(setter(into))]
    pub model: String,
    /// Sampling temperature
    #[builder(default)]
    pub temperature: Option<f32>,
    /// Maximum number of tokens to generate
    #[builder(default)]
    pub max_tokens: Option<u32>,
}

impl GenerateRequest {
    /// Creates a new request builder.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }

    /// Text of the system message, if any.
    pub fn system_prompt(&self) -> Option<&str> {
        self.text_for(Role::System)
    }

    /// Text of the user message, if any.
    pub fn user_prompt(&self) -> Option<&str> {
        self.text_for(Role::User)
    }

    fn text_for(&self, role: Role) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == role)
            .map(|m| m.content.as_str())
    }
}

/// Raw text returned by a generative service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The model's output, unvalidated
    pub text: String,
}
