//! Configuration management
//!
//! This module handles loading, validation, and overriding of the Haven configuration.
//! Configuration is read from an optional TOML file; every key has a default, so a
//! missing file simply yields the defaults.
//!
//! # Configuration Sections
//!
//! - **server**: Listen host and port, CORS toggle
//! - **log**: Log level
//! - **memory**: Mood and chat timeline capacities
//! - **completion**: Completion service endpoint, model and sampling parameters
//!
//! # Precedence
//!
//! CLI flags > environment variables > config file > built-in defaults.
//! The service credential is only ever read from the environment.
//!
//! # Examples
//!
//! ```no_run
//! use haven_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::load(None)?;
//! config.apply_env()?;
//! println!("Listening on port {}", config.server.port);
//! # Ok(())
//! # }
//! ```

use sdk::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding the listen port
pub const PORT_ENV: &str = "PORT";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,

    /// Timeline capacities
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Completion service settings
    #[serde(default)]
    pub completion: CompletionConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,

    /// Attach a permissive CORS layer
    #[serde(default = "default_true")]
    pub cors: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Timeline capacities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Maximum mood entries kept
    #[serde(default = "default_mood_capacity")]
    pub mood_capacity: usize,

    /// Maximum messages kept per conversation
    #[serde(default = "default_chat_capacity")]
    pub chat_capacity: usize,
}

/// Completion service configuration
///
/// The model and sampling parameters are process-wide and fixed after startup;
/// callers of the HTTP API cannot change them.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Nucleus-sampling threshold
    #[serde(default = "default_top_p")]
    pub top_p: f64,

    /// Maximum output tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// API key, loaded from `api_key_env`. Never written to or read from the file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key_env", &self.api_key_env)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_mood_capacity() -> usize {
    100
}

fn default_chat_capacity() -> usize {
    50
}

fn default_base_url() -> String {
    "https://integrate.api.nvidia.com/v1".to_string()
}

fn default_model() -> String {
    "nvidia/llama-3.1-nemotron-nano-4b-v1.1".to_string()
}

fn default_temperature() -> f64 {
    0.6
}

fn default_top_p() -> f64 {
    0.95
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_api_key_env() -> String {
    "NVIDIA_API_KEY".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: true,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            mood_capacity: default_mood_capacity(),
            chat_capacity: default_chat_capacity(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            api_key_env: default_api_key_env(),
            api_key: None,
        }
    }
}

impl CompletionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL of the chat-completions endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl MemoryConfig {
    pub fn mood_capacity(&self) -> Result<NonZeroUsize, EngineError> {
        NonZeroUsize::new(self.mood_capacity)
            .ok_or_else(|| {
                EngineError::Config("memory.mood_capacity must be at least 1".to_string())
            })
    }

    pub fn chat_capacity(&self) -> Result<NonZeroUsize, EngineError> {
        NonZeroUsize::new(self.chat_capacity)
            .ok_or_else(|| {
                EngineError::Config("memory.chat_capacity must be at least 1".to_string())
            })
    }
}

impl Config {
    /// Load configuration from `path`, or fall back to defaults.
    ///
    /// The CLI resolves `--config` and `$HAVEN_CONFIG` into `path`. A named file
    /// that does not exist is an error; no path at all is not.
    pub fn load(path: Option<&Path>) -> Result<Self, EngineError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => {
                let mut config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            EngineError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Apply `PORT` and the credential variable from the process environment
    pub fn apply_env(&mut self) -> Result<(), EngineError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides from an arbitrary lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(PORT_ENV).filter(|p| !p.trim().is_empty()) {
            self.server.port = port.trim().parse().map_err(|_| {
                EngineError::Config(format!("Invalid {} value '{}'", PORT_ENV, port))
            })?;
        }

        self.completion.api_key = lookup(&self.completion.api_key_env).filter(|k| !k.is_empty());
        Ok(())
    }

    /// Socket address to bind.
    ///
    /// `server.host` may be an IP literal or a hostname; hostnames are resolved
    /// and the first address returned is used.
    pub async fn listen_addr(&self) -> Result<SocketAddr, EngineError> {
        let host = self.server.host.as_str();
        let mut addrs = tokio::net::lookup_host((host, self.server.port))
            .await
            .map_err(|e| {
                EngineError::Config(format!(
                    "Invalid listen address {}:{}: {}",
                    host, self.server.port, e
                ))
            })?;

        addrs.next().ok_or_else(|| {
            EngineError::Config(format!("No address found for listen host {}", host))
        })
    }

    /// Validate field ranges
    pub fn validate(&mut self) -> Result<(), EngineError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        self.log.level = self.log.level.to_ascii_lowercase();
        if !valid_log_levels.contains(&self.log.level.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.log.level,
                valid_log_levels.join(", ")
            )));
        }

        self.memory.mood_capacity()?;
        self.memory.chat_capacity()?;

        let completion = &self.completion;
        if completion.base_url.trim().is_empty() {
            return Err(EngineError::Config(
                "completion.base_url must not be empty".to_string(),
            ));
        }
        if completion.model.trim().is_empty() {
            return Err(EngineError::Config(
                "completion.model must not be empty".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&completion.temperature) {
            return Err(EngineError::Config(
                "completion.temperature must be between 0.0 and 2.0".to_string(),
            ));
        }
        if !(completion.top_p > 0.0 && completion.top_p <= 1.0) {
            return Err(EngineError::Config(
                "completion.top_p must be in (0.0, 1.0]".to_string(),
            ));
        }
        if completion.max_tokens == 0 {
            return Err(EngineError::Config(
                "completion.max_tokens must be at least 1".to_string(),
            ));
        }
        if completion.timeout_secs == 0 {
            return Err(EngineError::Config(
                "completion.timeout_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
