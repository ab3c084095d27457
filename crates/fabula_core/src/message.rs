//! Prompt messages.

use crate::{GenerateRequest, Role};
use serde::{Deserialize, Serialize};

/// A single prompt message.
///
/// # Examples
///
/// ```
/// use fabula_core::{Message, Role};
///
/// let message = Message {
///     role: Role::User,
///     content: "Continue the story".to_string(),
/// };
///
/// assert_eq!(message.role, Role::User);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// The message text
    pub content: String,
}

/// The system/user instruction pair sent for one generation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPair {
    /// Output-shape instructions
    pub system: String,
    /// Request-specific instructions
    pub user: String,
}

impl PromptPair {
    /// Create a prompt pair.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Build a service request that sends this pair to `model`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fabula_core::{PromptPair, Role};
    ///
    /// let request = PromptPair::new("Reply in JSON", "Begin").request_for("gemini-1.5-flash");
    /// assert_eq!(request.model, "gemini-1.5-flash");
    /// assert_eq!(request.messages[0].role, Role::System);
    /// assert_eq!(request.messages[1].content, "Begin");
    /// ```
    pub fn request_for(&self, model: &str) -> GenerateRequest {
        GenerateRequest {
            messages: vec![
                Message {
                    role: Role::System,
                    content: self.system.clone(),
                },
                Message {
                    role: Role::User,
                    content: self.user.clone(),
                },
            ],
            model: model.to_string(),
            temperature: None,
            max_tokens: None,
        }
    }
}
