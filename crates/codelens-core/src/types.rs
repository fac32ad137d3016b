use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Focus of a rewrite request. Selects the extra instruction appended to the
/// rewrite prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnalysisMode {
    #[default]
    Default,
    Security,
    Performance,
    Readability,
    All,
}

impl AnalysisMode {
    pub const ALL_MODES: [AnalysisMode; 5] = [
        AnalysisMode::Default,
        AnalysisMode::Security,
        AnalysisMode::Performance,
        AnalysisMode::Readability,
        AnalysisMode::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Default => "default",
            AnalysisMode::Security => "security",
            AnalysisMode::Performance => "performance",
            AnalysisMode::Readability => "readability",
            AnalysisMode::All => "all",
        }
    }

    /// Human readable label shown in the mode picker
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisMode::Default => "Default",
            AnalysisMode::Security => "Check Security Flaws",
            AnalysisMode::Performance => "Optimize Performance",
            AnalysisMode::Readability => "Improve Readability",
            AnalysisMode::All => "All of the Above",
        }
    }

    /// Instruction appended to the rewrite prompt as "Additional request"
    pub fn instruction(&self) -> &'static str {
        match self {
            AnalysisMode::Default => "Focus on general improvements and bug fixes.",
            AnalysisMode::Security => {
                "Focus primarily on security vulnerabilities and their fixes."
            }
            AnalysisMode::Performance => {
                "Focus on performance optimizations and efficiency improvements."
            }
            AnalysisMode::Readability => {
                "Focus on improving code readability, documentation, and maintainability."
            }
            AnalysisMode::All => {
                "Provide comprehensive improvements across all aspects: security, performance, readability, and bug fixes."
            }
        }
    }

    /// Resolve the raw `analysisMode` value sent by the browser.
    ///
    /// Absent or unrecognized values degrade to [`AnalysisMode::Default`]
    /// instead of rejecting the request.
    pub fn resolve(raw: Option<&str>) -> Self {
        match raw {
            None => AnalysisMode::Default,
            Some(value) => value.parse().unwrap_or_else(|_| {
                warn!(mode = value, "Unknown analysis mode, using default");
                AnalysisMode::Default
            }),
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(AnalysisMode::Default),
            "security" => Ok(AnalysisMode::Security),
            "performance" => Ok(AnalysisMode::Performance),
            "readability" => Ok(AnalysisMode::Readability),
            "all" => Ok(AnalysisMode::All),
            other => Err(format!("Unknown analysis mode: {}", other)),
        }
    }
}

/// A language the browser UI offers in its picker. The service itself accepts
/// any language identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SupportedLanguage {
    pub value: &'static str,
    pub label: &'static str,
}

pub const SUPPORTED_LANGUAGES: [SupportedLanguage; 6] = [
    SupportedLanguage {
        value: "javascript",
        label: "JavaScript",
    },
    SupportedLanguage {
        value: "python",
        label: "Python",
    },
    SupportedLanguage {
        value: "c",
        label: "C",
    },
    SupportedLanguage {
        value: "java",
        label: "Java",
    },
    SupportedLanguage {
        value: "solidity",
        label: "Solidity (Eth)",
    },
    SupportedLanguage {
        value: "rust",
        label: "Rust (Sol)",
    },
];

/// Input of the code-rewrite transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub code: String,
    /// Fence tag for the embedded code; may be empty
    pub language: String,
    pub mode: AnalysisMode,
}

impl AnalysisRequest {
    pub fn new(
        code: impl Into<String>,
        language: impl Into<String>,
        mode: AnalysisMode,
    ) -> ValidationResult<Self> {
        let code = code.into();
        if code.is_empty() {
            return Err(ValidationError::MissingCode);
        }

        Ok(Self {
            code,
            language: language.into(),
            mode,
        })
    }
}

/// Input of the code-explanation transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationRequest {
    pub code: String,
    pub language: String,
}

impl ExplanationRequest {
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> ValidationResult<Self> {
        let code = code.into();
        let language = language.into();
        if code.is_empty() || language.is_empty() {
            return Err(ValidationError::MissingCodeOrLanguage);
        }

        Ok(Self { code, language })
    }
}

/// Output of the code-rewrite transform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteResult {
    pub optimized_code: String,
}

/// Output of the code-explanation transform.
///
/// Every field is non-empty and `flowchart` is a renderable mermaid
/// `graph TD` description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationResult {
    pub summary: String,
    pub complexity: String,
    pub flowchart: String,
    pub recommendations: Vec<String>,
}
