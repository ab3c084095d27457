//! Scripted generative service for testing.

use async_trait::async_trait;
use fabula_core::{GenerateRequest, GenerateResponse};
use fabula_error::{FabulaResult, ServiceError, ServiceErrorKind};
use fabula_interface::StoryDriver;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::time::Instant;

/// A single mock response (success or error).
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this text
    Text(String),
    /// Fail with this error
    Error(ServiceErrorKind),
}

/// One recorded call to [`MockDriver::generate`].
#[derive(Debug, Clone)]
pub struct MockCall {
    /// Model the request named
    pub model: String,
    /// The full request
    pub request: GenerateRequest,
    /// When the call arrived, on the tokio clock
    pub at: Instant,
}

/// Mock driver with a response script per model.
///
/// Each model answers from its own queue. Once a queue has one response left,
/// that response repeats forever. A model with no script fails with a
/// non-transient error.
#[derive(Debug, Default)]
pub struct MockDriver {
    scripts: Mutex<HashMap<String, VecDeque<MockResponse>>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockDriver {
    /// Create a driver with no scripts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the responses for `model`, in order.
    pub fn script(self, model: &str, responses: Vec<MockResponse>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(model.to_string(), responses.into());
        self
    }

    /// Make `model` answer with the same response every time.
    pub fn always(self, model: &str, response: MockResponse) -> Self {
        self.script(model, vec![response])
    }

    /// Make `model` answer with the same text every time.
    pub fn always_text(self, model: &str, text: impl Into<String>) -> Self {
        self.always(model, MockResponse::Text(text.into()))
    }

    /// Get the number of times generate() was called.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Models called, in call order.
    pub fn models_called(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.model.clone())
            .collect()
    }

    /// Every recorded call.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    fn next_response(&self, model: &str) -> MockResponse {
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(model) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap(),
            None => MockResponse::Error(ServiceErrorKind::ApiRequest(format!(
                "no script for model '{}'",
                model
            ))),
        }
    }
}

#[async_trait]
impl StoryDriver for MockDriver {
    async fn generate(&self, req: &GenerateRequest) -> FabulaResult<GenerateResponse> {
        self.calls.lock().unwrap().push(MockCall {
            model: req.model.clone(),
            request: req.clone(),
            at: Instant::now(),
        });

        match self.next_response(&req.model) {
            MockResponse::Text(text) => Ok(GenerateResponse { text }),
            MockResponse::Error(kind) => Err(ServiceError::new(kind).into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
