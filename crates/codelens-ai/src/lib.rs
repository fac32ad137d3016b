//! Completion-backed code transforms for CodeLens.
//!
//! Prompts are assembled deterministically in [`prompts`], sent through an
//! [`LLMProvider`], and the reply is normalized by [`extract`] (rewrite path)
//! or [`explanation`] (explain path) before reaching the HTTP layer.

pub mod assistant;
pub mod error;
pub mod explanation;
pub mod extract;
pub mod llm_factory;
pub mod llm_provider;
pub mod openai_provider;
pub mod prompts;

pub use assistant::CodeAssistant;
pub use error::{TransformError, TransformResult};
pub use explanation::{
    parse_explanation, repair_flowchart, RepairOutcome, RepairedFlowchart, FALLBACK_FLOWCHART,
};
pub use extract::extract_code_block;
pub use llm_factory::LLMProviderFactory;
pub use llm_provider::*;
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
