//! Google Gemini API implementation.
//!
//! [`GeminiClient`] keeps one `gemini-rust` client per model. When a request names a
//! model (via `GenerateRequest.model`), the pool either hands out the existing client
//! for that model or builds a new one on demand. This lets a single driver serve an
//! entire fallback chain.
//!
//! Errors from the service are parsed for an HTTP status code so the invoker can tell
//! transient overloads (500/503) from permanent failures.

use async_trait::async_trait;
use std::collections::HashMap;
use std::env;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, instrument};

use gemini_rust::{Gemini, client::Model};

use fabula_core::{GenerateRequest, GenerateResponse, Role};
use fabula_error::{FabulaResult, ServiceError, ServiceErrorKind};
use fabula_interface::StoryDriver;

use super::GeminiResult;

/// Client for Google Gemini API with per-model client pooling.
///
/// - **Client Pool**: `HashMap<String, Gemini>`, one entry per model id
/// - **Lazy Creation**: clients are created on first request for each model
/// - **Thread-Safe**: uses `Arc<Mutex<HashMap>>` for concurrent access
pub struct GeminiClient {
    /// Cache of model-specific REST API clients
    clients: Arc<Mutex<HashMap<String, Gemini>>>,
    /// API key for creating new clients
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let client_count = self
            .clients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("GeminiClient")
            .field("cached_clients", &client_count)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Convert a model name string to a gemini-rust Model enum variant.
    ///
    /// Unrecognized names become `Model::Custom` with the "models/" prefix the
    /// Gemini API requires.
    ///
    /// - "gemini-2.5-flash" → Model::Gemini25Flash
    /// - "gemini-1.5-pro" → Model::Custom("models/gemini-1.5-pro")
    /// - "models/gemini-1.5-pro" → Model::Custom("models/gemini-1.5-pro") (preserved)
    fn model_name_to_enum(name: &str) -> Model {
        match name {
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            other if other.starts_with("models/") => Model::Custom(other.to_string()),
            other => Model::Custom(format!("models/{}", other)),
        }
    }

    /// Create a new Gemini client.
    ///
    /// Reads the API key from the `GEMINI_API_KEY` environment variable.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use fabula_models::GeminiClient;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = GeminiClient::new()?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(name = "gemini_client_new")]
    pub fn new() -> FabulaResult<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| ServiceError::new(ServiceErrorKind::MissingApiKey))?;
        Self::with_api_key(api_key)
    }

    /// Create a client with an explicit API key.
    ///
    /// A blank key is treated the same as a missing one.
    pub fn with_api_key(api_key: impl Into<String>) -> FabulaResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ServiceError::new(ServiceErrorKind::MissingApiKey).into());
        }

        Ok(Self {
            clients: Arc::new(Mutex::new(HashMap::new())),
            api_key,
        })
    }

    /// Number of model clients built so far.
    pub fn cached_clients(&self) -> usize {
        self.clients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Get or create the client for `model_name`.
    fn client_for(&self, model_name: &str) -> GeminiResult<Gemini> {
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = clients.get(model_name) {
            return Ok(client.clone());
        }

        debug!(model = model_name, "Creating Gemini client");
        let client = Gemini::with_model(&self.api_key, Self::model_name_to_enum(model_name))
            .map_err(|e| {
                ServiceError::new(ServiceErrorKind::ClientCreation {
                    model: model_name.to_string(),
                    message: e.to_string(),
                })
            })?;
        clients.insert(model_name.to_string(), client.clone());
        Ok(client)
    }

    /// Internal generate method that returns service-specific errors.
    #[instrument(
        name = "gemini_generate",
        skip(self, req),
        fields(model = %req.model, temperature = ?req.temperature)
    )]
    async fn generate_internal(&self, req: &GenerateRequest) -> GeminiResult<GenerateResponse> {
        let client = self.client_for(&req.model)?;

        let mut builder = client.generate_content();

        for msg in &req.messages {
            match msg.role {
                // Gemini takes the system prompt separately
                Role::System => builder = builder.with_system_prompt(&msg.content),
                Role::User => builder = builder.with_user_message(&msg.content),
            }
        }

        if let Some(temp) = req.temperature {
            builder = builder.with_temperature(temp);
        }

        if let Some(max_tokens) = req.max_tokens {
            builder = builder.with_max_output_tokens(max_tokens as i32);
        }

        let response = builder.execute().await.map_err(Self::parse_gemini_error)?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(ServiceError::new(ServiceErrorKind::EmptyResponse(
                req.model.clone(),
            )));
        }

        debug!(chars = text.len(), "Received Gemini response");
        Ok(GenerateResponse { text })
    }

    /// Parse gemini-rust errors to extract HTTP status codes.
    ///
    /// Converts generic API error strings into structured errors with HTTP status
    /// codes when available.
    fn parse_gemini_error(err: impl std::fmt::Display) -> ServiceError {
        let err_msg = err.to_string();

        // Example: "bad response from server; code 503; description: ..."
        match Self::extract_status_code(&err_msg) {
            Some(status_code) => ServiceError::new(ServiceErrorKind::HttpError {
                status_code,
                message: err_msg,
            }),
            None => ServiceError::new(ServiceErrorKind::ApiRequest(err_msg)),
        }
    }

    /// Extract HTTP status code from error message string.
    ///
    /// Parses strings like "bad response from server; code 503; description: ..."
    /// and extracts the numeric status code.
    fn extract_status_code(error_msg: &str) -> Option<u16> {
        let code_start = error_msg.find("code ")?;
        let code_str = &error_msg[code_start + 5..];
        let end = code_str
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(code_str.len());
        code_str[..end].parse().ok()
    }
}

#[async_trait]
impl StoryDriver for GeminiClient {
    async fn generate(&self, req: &GenerateRequest) -> FabulaResult<GenerateResponse> {
        self.generate_internal(req).await.map_err(Into::into)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
