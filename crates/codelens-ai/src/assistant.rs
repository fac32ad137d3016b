use crate::error::{TransformError, TransformResult};
use crate::explanation::parse_explanation;
use crate::extract::extract_code_block;
use crate::llm_provider::{GenerationConfig, LLMProvider, LLMResponse};
use crate::prompts::{explanation_prompt, rewrite_prompt};
use codelens_core::{AnalysisRequest, ExplanationRequest, ExplanationResult, RewriteResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Runs the rewrite and explanation transforms against an injected provider.
///
/// Each call makes exactly one completion request; nothing is cached or
/// retried.
#[derive(Clone)]
pub struct CodeAssistant {
    provider: Arc<dyn LLMProvider>,
    generation: GenerationConfig,
}

impl CodeAssistant {
    pub fn new(provider: Arc<dyn LLMProvider>, generation: GenerationConfig) -> Self {
        Self {
            provider,
            generation,
        }
    }

    pub fn provider(&self) -> &Arc<dyn LLMProvider> {
        &self.provider
    }

    /// Rewrite code according to the requested analysis mode.
    ///
    /// Only a failed completion request is an error; any reply is accepted.
    pub async fn rewrite(&self, request: &AnalysisRequest) -> TransformResult<RewriteResult> {
        let prompt = rewrite_prompt(request);
        info!(
            language = %request.language,
            mode = %request.mode,
            code_len = request.code.len(),
            "Requesting code rewrite"
        );

        let response = self
            .provider
            .generate_with_config(&prompt, &self.generation)
            .await
            .map_err(TransformError::Oracle)?;
        self.log_usage("rewrite", &response);

        let optimized_code = extract_code_block(&response.content);
        debug!(
            reply_len = response.content.len(),
            code_len = optimized_code.len(),
            "Extracted rewritten code"
        );

        Ok(RewriteResult { optimized_code })
    }

    /// Explain code as a validated four-field record
    pub async fn explain(&self, request: &ExplanationRequest) -> TransformResult<ExplanationResult> {
        let prompt = explanation_prompt(request);
        info!(
            language = %request.language,
            code_len = request.code.len(),
            "Requesting code explanation"
        );

        let response = self
            .provider
            .generate_with_config(&prompt, &self.generation.json_object())
            .await
            .map_err(TransformError::Oracle)?;
        self.log_usage("explain", &response);

        parse_explanation(&response.content, self.provider.provider_name())
    }

    fn log_usage(&self, transform: &'static str, response: &LLMResponse) {
        info!(
            transform,
            provider = self.provider.provider_name(),
            model = %response.model,
            prompt_tokens = ?response.prompt_tokens,
            completion_tokens = ?response.completion_tokens,
            total_tokens = ?response.total_tokens,
            finish_reason = ?response.finish_reason,
            "Completion finished"
        );
        if response.finish_reason.as_deref() == Some("length") {
            warn!(transform, "Completion was cut off at the token limit");
        }
    }
}
