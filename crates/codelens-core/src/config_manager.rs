use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read config: {0}")]
    ReadError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),
}

/// Main configuration for CodeLens
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CodeLensConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion provider settings
    #[serde(default)]
    pub llm: LLMConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body. Submitted code is never truncated, so
    /// anything above this is refused with 413.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    /// Provider: "openai" or "openai-compatible"
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Chat Completions base URL. Required for "openai-compatible"
    /// (e.g. "http://localhost:1234/v1" for LM Studio).
    #[serde(default)]
    pub base_url: Option<String>,

    /// API key. Never written back to disk.
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Name used in error messages returned to the browser
    #[serde(default = "default_provider_name")]
    pub provider_name: String,

    /// Temperature for generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            model: default_model(),
            base_url: None,
            api_key: None,
            provider_name: default_provider_name(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "pretty", "json", "compact"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_max_body_bytes() -> usize {
    32 * 1024 * 1024
}
fn default_llm_provider() -> String {
    "openai".to_string()
}
fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}
fn default_provider_name() -> String {
    "OpenAI".to_string()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> usize {
    2048
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

/// Configuration manager with layered loading
pub struct ConfigManager {
    config: CodeLensConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with the following precedence:
    /// 1. Environment variables (.env file)
    /// 2. Config file (.codelens.toml)
    /// 3. Sensible defaults
    pub fn load() -> Result<Self, ConfigError> {
        info!("Loading CodeLens configuration...");

        Self::load_dotenv();

        let (config, config_path) = Self::load_config_file()?;
        Self::finish(config, config_path)
    }

    /// Load configuration from an explicit file, still honoring `.env` and
    /// environment overrides.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        Self::load_dotenv();

        let config = Self::read_toml_file(path)?;
        Self::finish(config, Some(path.to_path_buf()))
    }

    fn finish(config: CodeLensConfig, config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config = Self::apply_overrides(config, |key| std::env::var(key).ok());

        Self::validate_config(&config)?;

        info!("Configuration loaded successfully");
        if let Some(ref path) = config_path {
            info!("   Config file: {}", path.display());
        } else {
            info!("   Config file: NONE (using defaults)");
        }
        info!("   LLM provider: {}", config.llm.provider);
        info!("   LLM model: {}", config.llm.model);
        if let Some(ref url) = config.llm.base_url {
            info!("   LLM base URL: {}", url);
        }

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Load .env file if it exists
    fn load_dotenv() {
        // Try current directory first
        if Path::new(".env").exists() {
            if let Err(e) = dotenv::from_filename(".env") {
                warn!("Failed to load .env file: {}", e);
            } else {
                info!("Loaded .env file from current directory");
            }
            return;
        }

        // Try home directory
        if let Some(home) = dirs::home_dir() {
            let home_env = home.join(".codelens.env");
            if home_env.exists() {
                if let Err(e) = dotenv::from_path(&home_env) {
                    warn!("Failed to load .codelens.env: {}", e);
                } else {
                    info!("Loaded .codelens.env from home directory");
                }
            }
        }
    }

    /// Find and load config file
    /// Search order:
    /// 1. ./.codelens.toml (current directory)
    /// 2. ~/.codelens/config.toml (user config)
    /// 3. Use defaults
    fn load_config_file() -> Result<(CodeLensConfig, Option<PathBuf>), ConfigError> {
        let local_config = Path::new(".codelens.toml");
        if local_config.exists() {
            let config = Self::read_toml_file(local_config)?;
            return Ok((config, Some(local_config.to_path_buf())));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".codelens").join("config.toml");
            if user_config.exists() {
                let config = Self::read_toml_file(&user_config)?;
                return Ok((config, Some(user_config)));
            }
        }

        info!("No config file found, using defaults");
        Ok((CodeLensConfig::default(), None))
    }

    /// Read TOML config file
    fn read_toml_file(path: &Path) -> Result<CodeLensConfig, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Apply `CODELENS_*` and `OPENAI_API_KEY` overrides read through `lookup`.
    ///
    /// Unparseable numbers and an empty API key are ignored, leaving the
    /// previous value in place.
    pub fn apply_overrides(
        mut config: CodeLensConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> CodeLensConfig {
        // Server
        if let Some(host) = lookup("CODELENS_HOST") {
            config.server.host = host;
        }
        if let Some(port) = lookup("CODELENS_PORT").and_then(|v| v.parse().ok()) {
            config.server.port = port;
        }
        if let Some(bytes) = lookup("CODELENS_MAX_BODY_BYTES").and_then(|v| v.parse().ok()) {
            config.server.max_body_bytes = bytes;
        }

        // LLM configuration
        if let Some(provider) = lookup("CODELENS_LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Some(model) = lookup("CODELENS_MODEL") {
            config.llm.model = model;
        }
        if let Some(url) = lookup("CODELENS_LLM_BASE_URL") {
            config.llm.base_url = Some(url);
        }
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|key| !key.is_empty()) {
            config.llm.api_key = Some(SecretString::from(key));
        }
        if let Some(temperature) = lookup("CODELENS_TEMPERATURE").and_then(|v| v.parse().ok()) {
            config.llm.temperature = temperature;
        }
        if let Some(max_tokens) = lookup("CODELENS_MAX_TOKENS").and_then(|v| v.parse().ok()) {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(secs) = lookup("CODELENS_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            config.llm.timeout_secs = secs;
        }

        // Logging
        if let Some(level) = lookup("CODELENS_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(format) = lookup("CODELENS_LOG_FORMAT") {
            config.logging.format = format;
        }

        config
    }

    /// Validate configuration
    pub fn validate_config(config: &CodeLensConfig) -> Result<(), ConfigError> {
        match config.llm.provider.as_str() {
            "openai" | "openai-compatible" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid LLM provider: {}. Must be one of: openai, openai-compatible",
                    other
                )))
            }
        }

        if !(0.0..=2.0).contains(&config.llm.temperature) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid temperature: {}. Must be between 0.0 and 2.0",
                config.llm.temperature
            )));
        }

        if config.server.max_body_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "max_body_bytes must be greater than zero".to_string(),
            ));
        }

        if config.llm.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "max_tokens must be greater than zero".to_string(),
            ));
        }

        match config.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    other
                )))
            }
        }

        match config.logging.format.as_str() {
            "pretty" | "json" | "compact" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {}. Must be one of: pretty, json, compact",
                    other
                )))
            }
        }

        Ok(())
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &CodeLensConfig {
        &self.config
    }

    /// Mutable access for command-line overrides applied after loading
    pub fn config_mut(&mut self) -> &mut CodeLensConfig {
        &mut self.config
    }

    /// Get the path to the config file that was loaded, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Create a default config file
    pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        let config = CodeLensConfig::default();
        let toml_str =
            toml::to_string_pretty(&config).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::ReadError(e.to_string()))?;
        }

        std::fs::write(path, toml_str).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Ok(())
    }
}
