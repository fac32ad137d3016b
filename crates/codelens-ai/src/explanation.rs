//! Validation and repair of explanation replies.
//!
//! The browser renders `flowchart` with mermaid, which fails hard on invalid
//! input, so the flowchart is always repaired into something renderable.
//! Everything else is all-or-nothing: a reply that is not a JSON object, or
//! that lacks one of the four fields, is rejected.

use crate::error::{TransformError, TransformResult};
use codelens_core::ExplanationResult;
use serde_json::{Map, Value};
use tracing::debug;

/// Directive that must open every flowchart
pub const FLOWCHART_DIRECTIVE: &str = "graph TD";

/// Token marking an edge between two nodes
pub const FLOWCHART_EDGE: &str = "-->";

/// Diagram substituted when the reply's flowchart has no edges at all
pub const FALLBACK_FLOWCHART: &str = "graph TD
    A[Code Analysis] --> B[Function Start]
    B --> C[Process Data]
    C --> D[Function End]";

/// Which branch of the repair policy was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairOutcome {
    /// Already started with the directive and had an edge
    Unchanged,
    /// Had edges but no directive; the directive was prepended
    Prefixed,
    /// Had no edges; replaced by [`FALLBACK_FLOWCHART`]
    Replaced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairedFlowchart {
    pub text: String,
    pub outcome: RepairOutcome,
}

/// Make a flowchart renderable.
///
/// Idempotent: repairing the output again returns it unchanged.
pub fn repair_flowchart(raw: &str) -> RepairedFlowchart {
    if !raw.contains(FLOWCHART_EDGE) {
        return RepairedFlowchart {
            text: FALLBACK_FLOWCHART.to_string(),
            outcome: RepairOutcome::Replaced,
        };
    }

    if raw.trim_start().starts_with(FLOWCHART_DIRECTIVE) {
        RepairedFlowchart {
            text: raw.to_string(),
            outcome: RepairOutcome::Unchanged,
        }
    } else {
        RepairedFlowchart {
            text: format!("{}\n{}", FLOWCHART_DIRECTIVE, raw),
            outcome: RepairOutcome::Prefixed,
        }
    }
}

/// Turn a completion into a fully populated [`ExplanationResult`].
///
/// `provider` names the completion service in error messages.
pub fn parse_explanation(completion: &str, provider: &str) -> TransformResult<ExplanationResult> {
    if completion.is_empty() {
        return Err(TransformError::EmptyResponse {
            provider: provider.to_string(),
        });
    }

    let value: Value =
        serde_json::from_str(completion).map_err(|source| TransformError::InvalidJson {
            provider: provider.to_string(),
            source,
        })?;

    let invalid = |field: &'static str| TransformError::InvalidFormat {
        provider: provider.to_string(),
        field,
    };

    let object = value.as_object().ok_or_else(|| invalid("<root>"))?;

    let summary = required_text(object, "summary").ok_or_else(|| invalid("summary"))?;
    let complexity = required_text(object, "complexity").ok_or_else(|| invalid("complexity"))?;
    let flowchart = required_text(object, "flowchart").ok_or_else(|| invalid("flowchart"))?;
    let recommendations =
        required_list(object, "recommendations").ok_or_else(|| invalid("recommendations"))?;

    let repaired = repair_flowchart(&flowchart);
    if repaired.outcome != RepairOutcome::Unchanged {
        debug!(outcome = ?repaired.outcome, "Repaired flowchart from {}", provider);
    }

    Ok(ExplanationResult {
        summary,
        complexity,
        flowchart: repaired.text,
        recommendations,
    })
}

fn required_text(object: &Map<String, Value>, field: &str) -> Option<String> {
    match object.get(field)? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}

fn required_list(object: &Map<String, Value>, field: &str) -> Option<Vec<String>> {
    let items = object.get(field)?.as_array()?;
    if items.is_empty() {
        return None;
    }

    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply(flowchart: &str) -> String {
        json!({
            "summary": "Doubles every element.",
            "complexity": "O(n) time, O(n) space",
            "flowchart": flowchart,
            "recommendations": ["Use map()", "Avoid var"],
        })
        .to_string()
    }

    #[test]
    fn test_prefix_is_added_when_missing() {
        let repaired = repair_flowchart("B[x]-->C[y]");
        assert_eq!(repaired.text, "graph TD\nB[x]-->C[y]");
        assert_eq!(repaired.outcome, RepairOutcome::Prefixed);
    }

    #[test]
    fn test_no_edge_is_replaced_by_fallback() {
        let repaired = repair_flowchart("graph TD\nNothing here");
        assert_eq!(repaired.text, FALLBACK_FLOWCHART);
        assert_eq!(repaired.outcome, RepairOutcome::Replaced);

        let repaired = repair_flowchart("Start and End");
        assert_eq!(repaired.text, FALLBACK_FLOWCHART);
    }

    #[test]
    fn test_valid_flowchart_is_untouched() {
        let valid = "graph TD\nA[Start] --> B[End]";
        let repaired = repair_flowchart(valid);
        assert_eq!(repaired.text, valid);
        assert_eq!(repaired.outcome, RepairOutcome::Unchanged);

        let indented = "  graph TD\n  A --> B";
        assert_eq!(repair_flowchart(indented).text, indented);
    }

    #[test]
    fn test_repair_is_idempotent() {
        for raw in [
            "B[x]-->C[y]",
            "graph TD\nNothing here",
            "graph TD\nA --> B",
            "",
            "flowchart LR\nA --> B",
        ] {
            let once = repair_flowchart(raw).text;
            let twice = repair_flowchart(&once);
            assert_eq!(twice.text, once, "repair of {:?} is not idempotent", raw);
            assert_eq!(twice.outcome, RepairOutcome::Unchanged);
        }
    }

    #[test]
    fn test_fallback_is_itself_valid() {
        assert!(FALLBACK_FLOWCHART.starts_with(FLOWCHART_DIRECTIVE));
        assert!(FALLBACK_FLOWCHART.contains(FLOWCHART_EDGE));
    }

    #[test]
    fn test_well_formed_reply_passes_through() {
        let result = parse_explanation(&reply("graph TD\nA[Start] --> B[End]"), "OpenAI").unwrap();
        assert_eq!(result.summary, "Doubles every element.");
        assert_eq!(result.complexity, "O(n) time, O(n) space");
        assert_eq!(result.flowchart, "graph TD\nA[Start] --> B[End]");
        assert_eq!(result.recommendations, vec!["Use map()", "Avoid var"]);
    }

    #[test]
    fn test_reply_flowchart_is_repaired() {
        let result = parse_explanation(&reply("A[Start] --> B[End]"), "OpenAI").unwrap();
        assert_eq!(result.flowchart, "graph TD\nA[Start] --> B[End]");

        let result = parse_explanation(&reply("graph TD"), "OpenAI").unwrap();
        assert_eq!(result.flowchart, FALLBACK_FLOWCHART);
    }

    #[test]
    fn test_empty_completion() {
        let err = parse_explanation("", "OpenAI").unwrap_err();
        assert_eq!(err.to_string(), "No response from OpenAI");
    }

    #[test]
    fn test_whitespace_completion_is_invalid_json() {
        let err = parse_explanation(" \n\t", "OpenAI").unwrap_err();
        assert!(matches!(err, TransformError::InvalidJson { .. }));
    }

    #[test]
    fn test_non_json_is_fatal() {
        let err = parse_explanation("Sure! Here is the analysis: ...", "OpenAI").unwrap_err();
        assert!(matches!(err, TransformError::InvalidJson { .. }));
        assert!(err.is_format_error());
    }

    #[test]
    fn test_missing_recommendations_is_fatal() {
        let body = json!({
            "summary": "s",
            "complexity": "c",
            "flowchart": "graph TD\nA --> B",
        })
        .to_string();
        let err = parse_explanation(&body, "OpenAI").unwrap_err();
        assert_eq!(err.to_string(), "Invalid response format from OpenAI");
        assert!(matches!(
            err,
            TransformError::InvalidFormat {
                field: "recommendations",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_or_mistyped_fields_are_fatal() {
        let empty_summary = json!({
            "summary": "",
            "complexity": "c",
            "flowchart": "graph TD\nA --> B",
            "recommendations": ["r"],
        });
        let empty_list = json!({
            "summary": "s",
            "complexity": "c",
            "flowchart": "graph TD\nA --> B",
            "recommendations": [],
        });
        let numeric_item = json!({
            "summary": "s",
            "complexity": "c",
            "flowchart": "graph TD\nA --> B",
            "recommendations": ["r", 2],
        });

        for body in [empty_summary, empty_list, numeric_item] {
            let err = parse_explanation(&body.to_string(), "OpenAI").unwrap_err();
            assert!(matches!(err, TransformError::InvalidFormat { .. }));
        }
    }

    #[test]
    fn test_json_array_root_is_rejected() {
        let err = parse_explanation("[1, 2, 3]", "OpenAI").unwrap_err();
        assert!(matches!(err, TransformError::InvalidFormat { .. }));
    }
}
