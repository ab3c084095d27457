//! Generative service integrations for Fabula.
//!
//! Each provider lives behind its own feature flag and implements
//! [`fabula_interface::StoryDriver`].
//!
//! # Available Providers
//!
//! - **Gemini** (Google) - Enable with `gemini` feature (default)
//!
//! ```no_run
//! # #[cfg(feature = "gemini")]
//! # {
//! use fabula_core::PromptPair;
//! use fabula_interface::StoryDriver;
//! use fabula_models::GeminiClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new()?;
//! let request = PromptPair::new("Reply with JSON", "Begin the story").request_for("gemini-2.5-flash");
//! let response = client.generate(&request).await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiClient, GeminiResult};
