use thiserror::Error;

/// Failures of a transform after input validation has passed
#[derive(Error, Debug)]
pub enum TransformError {
    /// Transport or API failure talking to the completion provider
    #[error("Completion request failed: {0}")]
    Oracle(#[source] anyhow::Error),

    /// The provider answered with no text at all
    #[error("No response from {provider}")]
    EmptyResponse { provider: String },

    /// The reply was not a JSON object
    #[error("Invalid JSON in response from {provider}: {source}")]
    InvalidJson {
        provider: String,
        #[source]
        source: serde_json::Error,
    },

    /// The reply parsed but a required field is missing or empty
    #[error("Invalid response format from {provider}")]
    InvalidFormat {
        provider: String,
        field: &'static str,
    },
}

impl TransformError {
    /// True when the provider replied but the reply broke the contract
    pub fn is_format_error(&self) -> bool {
        !matches!(self, TransformError::Oracle(_))
    }
}

pub type TransformResult<T> = std::result::Result<T, TransformError>;
