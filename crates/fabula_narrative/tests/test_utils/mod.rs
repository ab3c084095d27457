//! Test utilities for engine tests.
//!
//! Provides a scripted [`MockDriver`] and canned model payloads.

#![allow(dead_code)]

pub mod mock_driver;

pub use mock_driver::{MockCall, MockDriver, MockResponse};

use fabula_narrative::FabulaConfig;
use fabula_error::ServiceErrorKind;

/// Cheapest model in test configurations.
pub const FLASH: &str = "test-flash";
/// Fallback model in test configurations.
pub const PRO: &str = "test-pro";

/// Two-model configuration with the bundled retry policy.
pub fn two_model_config() -> FabulaConfig {
    let mut config = FabulaConfig::default();
    config.generation.models = vec![FLASH.to_string(), PRO.to_string()];
    config
}

/// Configuration with a single model.
pub fn single_model_config() -> FabulaConfig {
    let mut config = FabulaConfig::default();
    config.generation.models = vec![FLASH.to_string()];
    config
}

/// A valid generation payload, fenced the way models like to return it.
pub fn story_json() -> String {
    r#"```json
{
  "title": "The Keeper",
  "description": "A lighthouse story",
  "setting": "A storm-bound lighthouse",
  "characters": [
    {"name": "Mara", "description": "The last keeper", "role": "protagonist"}
  ],
  "firstNode": {
    "id": "node_1",
    "content": "The lamp has gone out.",
    "choices": [
      {"id": "choice_1", "text": "Climb the stairs", "nextNodeId": "node_2"},
      {"id": "choice_2", "text": "Check the radio", "nextNodeId": "node_3"}
    ],
    "isEnding": false
  }
}
```"#
        .to_string()
}

/// A valid continuation payload.
pub fn node_json(id: &str, is_ending: bool) -> String {
    let choices = if is_ending {
        "[]".to_string()
    } else {
        format!(
            r#"[{{"id": "{id}_a", "text": "Keep going", "nextNodeId": "{id}_next"}}]"#
        )
    };
    format!(
        r#"{{"id": "{id}", "content": "Scene {id}.", "choices": {choices}, "isEnding": {is_ending}}}"#
    )
}

/// Output that is not JSON at all.
pub fn garbage() -> MockResponse {
    MockResponse::Text("I'm sorry, I can't write that story.".to_string())
}

/// HTTP 503 from the service.
pub fn overloaded() -> MockResponse {
    MockResponse::Error(ServiceErrorKind::HttpError {
        status_code: 503,
        message: "The model is overloaded".to_string(),
    })
}

/// HTTP 401 from the service.
pub fn unauthorized() -> MockResponse {
    MockResponse::Error(ServiceErrorKind::HttpError {
        status_code: 401,
        message: "API key not valid".to_string(),
    })
}
