//! Configuration for the story engine.
//!
//! Configuration sources in order of precedence (later sources override earlier):
//! 1. Bundled defaults (`defaults.toml` shipped with the library)
//! 2. User config in home directory (`~/.config/fabula/fabula.toml`)
//! 3. User config in current directory (`./fabula.toml`)
//! 4. An explicit file, when the caller names one
//!
//! # Example
//!
//! ```toml
//! [generation]
//! models = ["gemini-2.5-flash", "gemini-2.5-pro"]
//! temperature = 0.8
//!
//! [retry]
//! max_attempts = 3
//! base_delay_ms = 1000
//! jitter_ms = 1000
//! ```

use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use fabula_error::{ConfigError, FabulaResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration
const DEFAULT_CONFIG: &str = include_str!("../defaults.toml");

/// Model selection and sampling settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GenerationConfig {
    /// Models to try in order, cheapest first
    pub models: Vec<String>,
    /// Sampling temperature passed to every model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Output token cap passed to every model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// Backoff policy for transient service failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Total passes over the model list, including the first
    pub max_attempts: u32,
    /// Delay before the first retry, doubled for each later one
    pub base_delay_ms: u64,
    /// Upper bound of the random delay added to each backoff
    pub jitter_ms: u64,
}

impl RetryConfig {
    /// Base delay as a [`Duration`].
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            jitter_ms: 1000,
        }
    }
}

/// Where the CLI keeps story records.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory of story files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Configured directory, or `<data dir>/fabula/stories`.
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("fabula")
                .join("stories")
        })
    }
}

/// Top-level Fabula configuration.
///
/// # Example
///
/// ```no_run
/// use fabula_narrative::FabulaConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = FabulaConfig::load()?;
/// println!("First model: {}", config.generation.models[0]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FabulaConfig {
    /// Model selection and sampling
    pub generation: GenerationConfig,
    /// Backoff policy
    #[serde(default)]
    pub retry: RetryConfig,
    /// Story store location
    #[serde(default)]
    pub storage: StorageConfig,
}

impl FabulaConfig {
    /// Load configuration from the bundled defaults and the optional user files.
    #[instrument]
    pub fn load() -> FabulaResult<Self> {
        Self::load_from(None)
    }

    /// Load configuration, layering `path` on top when given.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is given but cannot be read, if any source fails
    /// to parse, or if the merged configuration is invalid.
    #[instrument]
    pub fn load_from(path: Option<&Path>) -> FabulaResult<Self> {
        debug!("Loading configuration with precedence: explicit > current dir > home dir > bundled");

        let mut builder = Self::layered();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        Self::finish(builder)
    }

    /// Bundled defaults overridden by a TOML string.
    ///
    /// Ignores the user config files, which makes this the entry point for tests
    /// and embedded configurations.
    ///
    /// # Examples
    ///
    /// ```
    /// use fabula_narrative::FabulaConfig;
    ///
    /// let config = FabulaConfig::from_toml_str("[retry]\nmax_attempts = 5").unwrap();
    /// assert_eq!(config.retry.max_attempts, 5);
    /// assert!(!config.generation.models.is_empty());
    /// ```
    pub fn from_toml_str(overrides: &str) -> FabulaResult<Self> {
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(overrides, FileFormat::Toml));
        Self::finish(builder)
    }

    /// Bundled defaults plus the optional home and working-directory files.
    fn layered() -> ConfigBuilder<DefaultState> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/fabula/fabula.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder.add_source(File::with_name("fabula").required(false))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> FabulaResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Check invariants the engine relies on.
    pub fn validate(&self) -> FabulaResult<()> {
        if self.generation.models.is_empty() {
            return Err(ConfigError::new("generation.models must list at least one model").into());
        }
        if self.generation.models.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigError::new("generation.models contains a blank model name").into());
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::new("retry.max_attempts must be at least 1").into());
        }
        Ok(())
    }
}

impl Default for FabulaConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig {
                models: vec!["gemini-2.5-flash".to_string(), "gemini-2.5-pro".to_string()],
                temperature: Some(0.8),
                max_output_tokens: Some(4096),
            },
            retry: RetryConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}
