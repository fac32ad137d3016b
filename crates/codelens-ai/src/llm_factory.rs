use crate::llm_provider::LLMProvider;
use crate::openai_provider::{OpenAIConfig, OpenAIProvider, OPENAI_API_BASE};
use codelens_core::{ConfigError, LLMConfig};
use std::sync::Arc;

/// Factory for creating LLM providers based on configuration
pub struct LLMProviderFactory;

impl LLMProviderFactory {
    /// Create an LLM provider from configuration.
    ///
    /// Credential and endpoint problems surface here, once, instead of on the
    /// first request.
    pub fn create_from_config(config: &LLMConfig) -> Result<Arc<dyn LLMProvider>, ConfigError> {
        let provider_name = config.provider.to_lowercase();

        match provider_name.as_str() {
            "openai" => Self::create_openai_provider(config),
            "openai-compatible" => Self::create_openai_compatible_provider(config),
            _ => Err(ConfigError::ValidationError(format!(
                "Unsupported LLM provider: {}. Available providers: {}",
                provider_name,
                Self::supported_providers().join(", ")
            ))),
        }
    }

    fn create_openai_provider(config: &LLMConfig) -> Result<Arc<dyn LLMProvider>, ConfigError> {
        let openai_config = OpenAIConfig {
            api_key: config.api_key.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| OPENAI_API_BASE.to_string()),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
            provider_name: config.provider_name.clone(),
        };

        Ok(Arc::new(OpenAIProvider::new(openai_config)?))
    }

    fn create_openai_compatible_provider(
        config: &LLMConfig,
    ) -> Result<Arc<dyn LLMProvider>, ConfigError> {
        let base_url = config.base_url.clone().ok_or_else(|| {
            ConfigError::ValidationError(
                "OpenAI-compatible base URL not found. Set 'llm.base_url' in config \
                 or CODELENS_LLM_BASE_URL"
                    .to_string(),
            )
        })?;

        let compat_config = OpenAIConfig {
            api_key: config.api_key.clone(),
            base_url,
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
            provider_name: config.provider_name.clone(),
        };

        Ok(Arc::new(OpenAIProvider::new(compat_config)?))
    }

    /// Get a list of supported providers
    pub fn supported_providers() -> Vec<&'static str> {
        vec!["openai", "openai-compatible"]
    }
}
