use codelens_ai::{CodeAssistant, GenerationConfig, LLMProvider, LLMProviderFactory};
use codelens_core::{CodeLensConfig, ConfigError, ServerConfig};
use std::sync::Arc;

/// Shared handler state. The provider is built once at startup and injected
/// here; handlers never construct clients of their own.
#[derive(Clone)]
pub struct AppState {
    pub assistant: CodeAssistant,
    /// Request body limit applied by the router
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(assistant: CodeAssistant) -> Self {
        Self {
            assistant,
            max_body_bytes: ServerConfig::default().max_body_bytes,
        }
    }

    /// Wire a provider and its sampling parameters into a fresh state
    pub fn with_provider(provider: Arc<dyn LLMProvider>, generation: GenerationConfig) -> Self {
        Self::new(CodeAssistant::new(provider, generation))
    }

    pub fn with_body_limit(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Build the provider named by the config.
    ///
    /// Fails with [`ConfigError::MissingCredential`] when the provider needs
    /// an API key and none is configured.
    pub fn from_config(config: &CodeLensConfig) -> Result<Self, ConfigError> {
        let provider = LLMProviderFactory::create_from_config(&config.llm)?;
        let generation = GenerationConfig {
            temperature: config.llm.temperature,
            max_tokens: Some(config.llm.max_tokens),
            response_format: None,
        };

        Ok(Self::with_provider(provider, generation)
            .with_body_limit(config.server.max_body_bytes))
    }
}
