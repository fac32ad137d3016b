//! Prompt templates for the rewrite and explanation transforms.
//!
//! Both builders are pure: the same request always yields the same prompt,
//! and the submitted code is embedded verbatim.

use codelens_core::{AnalysisRequest, ExplanationRequest};

pub const REWRITE_PROMPT: &str = "You are an AI specialized in debugging and optimizing code. \
Analyze the following code and provide:
1. A corrected/optimized version
2. Identify and fix any bugs
3. Suggest performance improvements
4. Address security concerns
5. Improve code readability and maintainability

Please respond in the following format:
```[language]
[optimized code]
```";

pub const EXPLAIN_PROMPT: &str = r#"Analyze the following code and provide:
1. A brief summary of what the code does
2. Time and space complexity analysis
3. A mermaid.js flowchart showing the code's logic (use graph TD for top-down flow diagrams)
4. A list of specific recommendations for improvement

Format your response as a JSON object with the following structure:
{
  "summary": "Brief explanation of the code's purpose and functionality",
  "complexity": "Detailed complexity analysis",
  "flowchart": "graph TD\nA[Start] --> B[Process]\nB --> C[End]",
  "recommendations": ["recommendation1", "recommendation2", ...]
}

Important: For the flowchart, use valid mermaid.js syntax with graph TD direction. Use simple node names (A, B, C, etc.) and clear labels in square brackets. Connect nodes with arrows (-->)."#;

/// Wrap `code` in a fenced block tagged with `language`
fn fenced(language: &str, code: &str) -> String {
    format!("```{}\n{}\n```", language, code)
}

/// Build the prompt for the code-rewrite transform
pub fn rewrite_prompt(request: &AnalysisRequest) -> String {
    format!(
        "{}\n\nAdditional request: {}\n\nCode:\n{}",
        REWRITE_PROMPT,
        request.mode.instruction(),
        fenced(&request.language, &request.code)
    )
}

/// Build the prompt for the code-explanation transform
pub fn explanation_prompt(request: &ExplanationRequest) -> String {
    format!(
        "{}\nCode in {}:\n{}",
        EXPLAIN_PROMPT,
        request.language,
        fenced(&request.language, &request.code)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use codelens_core::AnalysisMode;

    #[test]
    fn test_rewrite_prompt_embeds_mode_and_code() {
        let request =
            AnalysisRequest::new("def f(x):\n    return x*2", "python", AnalysisMode::Security)
                .unwrap();
        let prompt = rewrite_prompt(&request);

        assert!(prompt.starts_with(REWRITE_PROMPT));
        assert!(prompt.contains(
            "Additional request: Focus primarily on security vulnerabilities and their fixes."
        ));
        assert!(prompt.ends_with("Code:\n```python\ndef f(x):\n    return x*2\n```"));
    }

    #[test]
    fn test_every_mode_has_an_instruction() {
        for mode in AnalysisMode::ALL_MODES {
            let request = AnalysisRequest::new("x", "c", mode).unwrap();
            let prompt = rewrite_prompt(&request);
            assert!(prompt.contains(&format!("Additional request: {}", mode.instruction())));
            assert!(!prompt.contains("undefined"));
        }
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let request = AnalysisRequest::new("let a = 1;", "rust", AnalysisMode::All).unwrap();
        assert_eq!(rewrite_prompt(&request), rewrite_prompt(&request));

        let request = ExplanationRequest::new("let a = 1;", "rust").unwrap();
        assert_eq!(explanation_prompt(&request), explanation_prompt(&request));
    }

    #[test]
    fn test_large_input_is_not_truncated() {
        let code = "x = 1\n".repeat(20_000);
        let request = ExplanationRequest::new(code.clone(), "python").unwrap();
        let prompt = explanation_prompt(&request);
        assert!(prompt.contains(&code));
        assert!(prompt.contains("Code in python:\n```python\n"));
    }

    #[test]
    fn test_explanation_prompt_names_all_fields() {
        let request = ExplanationRequest::new("fn main() {}", "rust").unwrap();
        let prompt = explanation_prompt(&request);
        for field in ["\"summary\"", "\"complexity\"", "\"flowchart\"", "\"recommendations\""] {
            assert!(prompt.contains(field), "missing {}", field);
        }
        assert!(prompt.contains("graph TD"));
    }
}
