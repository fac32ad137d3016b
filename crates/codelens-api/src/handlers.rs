use crate::{ApiError, ApiResult, AppState};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use codelens_ai::TransformError;
use codelens_core::{
    AnalysisMode, AnalysisRequest, ExplanationRequest, ExplanationResult, RewriteResult,
    SupportedLanguage, SUPPORTED_LANGUAGES,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

const ANALYZE_FAILED: &str = "Failed to analyze code";
const EXPLAIN_FAILED: &str = "Failed to generate explanation";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub analysis_mode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExplainBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub model: String,
}

#[derive(Serialize)]
pub struct ModeInfo {
    pub value: &'static str,
    pub label: &'static str,
    pub instruction: &'static str,
}

/// POST /analyze
pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeBody>, JsonRejection>,
) -> ApiResult<Json<RewriteResult>> {
    let body = decode_body(body)?
        .ok_or_else(|| ApiError::Internal(ANALYZE_FAILED.to_string()))?;

    let mode = AnalysisMode::resolve(body.analysis_mode.as_deref());
    let request = AnalysisRequest::new(
        body.code.unwrap_or_default(),
        body.language.unwrap_or_default(),
        mode,
    )?;

    let result = state.assistant.rewrite(&request).await.map_err(|e| {
        error!("Code analysis failed: {}", e);
        ApiError::Internal(ANALYZE_FAILED.to_string())
    })?;

    Ok(Json(result))
}

/// POST /explain
pub async fn explain(
    State(state): State<AppState>,
    body: Result<Json<ExplainBody>, JsonRejection>,
) -> ApiResult<Json<ExplanationResult>> {
    // Undecodable JSON carries neither field
    let body = decode_body(body)?.unwrap_or_default();

    let request = ExplanationRequest::new(
        body.code.unwrap_or_default(),
        body.language.unwrap_or_default(),
    )?;

    let result = state.assistant.explain(&request).await.map_err(|e| {
        error!("Code explanation failed: {}", e);
        explain_error(e)
    })?;

    Ok(Json(result))
}

/// Split body rejections. JSON that does not decode is left to the handler;
/// anything else keeps axum's own status and message.
fn decode_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<Option<T>> {
    match body {
        Ok(Json(body)) => Ok(Some(body)),
        Err(rejection @ (JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_))) => {
            warn!("Undecodable JSON body: {}", rejection.body_text());
            Ok(None)
        }
        Err(rejection) => {
            let status = rejection.status();
            warn!(%status, "Rejected request body: {}", rejection.body_text());
            Err(ApiError::Rejected {
                status,
                message: rejection.body_text(),
            })
        }
    }
}

fn explain_error(err: TransformError) -> ApiError {
    if !err.is_format_error() {
        return ApiError::Internal(EXPLAIN_FAILED.to_string());
    }

    match err {
        TransformError::InvalidJson { provider, .. } => {
            ApiError::Internal(format!("Invalid response format from {}", provider))
        }
        other => ApiError::Internal(other.to_string()),
    }
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider = state.assistant.provider();
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider: provider.provider_name().to_string(),
        model: provider.model_name().to_string(),
    })
}

/// GET /modes
pub async fn modes() -> Json<Vec<ModeInfo>> {
    Json(
        AnalysisMode::ALL_MODES
            .iter()
            .map(|mode| ModeInfo {
                value: mode.as_str(),
                label: mode.label(),
                instruction: mode.instruction(),
            })
            .collect(),
    )
}

/// GET /languages
pub async fn languages() -> Json<Vec<SupportedLanguage>> {
    Json(SUPPORTED_LANGUAGES.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_body_uses_camel_case() {
        let body: AnalyzeBody = serde_json::from_str(
            r#"{"code":"x","language":"python","analysisMode":"security"}"#,
        )
        .unwrap();
        assert_eq!(body.analysis_mode.as_deref(), Some("security"));

        let body: AnalyzeBody = serde_json::from_str(r#"{"code":"x"}"#).unwrap();
        assert!(body.language.is_none());
        assert!(body.analysis_mode.is_none());
    }

    #[test]
    fn test_explain_error_messages() {
        let oracle = explain_error(TransformError::Oracle(anyhow::anyhow!("timeout")));
        assert_eq!(oracle.to_string(), EXPLAIN_FAILED);

        let source = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let invalid = explain_error(TransformError::InvalidJson {
            provider: "OpenAI".to_string(),
            source,
        });
        assert_eq!(invalid.to_string(), "Invalid response format from OpenAI");

        let empty = explain_error(TransformError::EmptyResponse {
            provider: "OpenAI".to_string(),
        });
        assert_eq!(empty.to_string(), "No response from OpenAI");
    }
}
