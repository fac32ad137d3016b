use thiserror::Error;

/// Rejections raised before any completion request is made.
///
/// The display strings are part of the HTTP contract and are returned to the
/// browser verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No code provided")]
    MissingCode,

    #[error("Code and language are required")]
    MissingCodeOrLanguage,
}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
