use once_cell::sync::Lazy;
use regex::Regex;

/// Opening fence with an optional language tag, the body, then the closing
/// fence on its own line. Lazy so the first block wins.
static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```[^\s`]*[ \t]*\r?\n((?s:.*?))\r?\n[ \t]*```")
        .expect("fenced block pattern is valid")
});

/// Recover code from a free-text completion.
///
/// Returns the trimmed body of the first fenced block. Without a fenced block
/// the whole completion is returned, trimmed. Never fails.
pub fn extract_code_block(completion: &str) -> String {
    match FENCED_BLOCK.captures(completion) {
        Some(captures) => captures
            .get(1)
            .map_or("", |body| body.as_str())
            .trim()
            .to_string(),
        None => completion.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_block() {
        let reply = "Here you go:\n```python\ndef f(x):\n    return x * 2\n```\nThat fixes it.";
        assert_eq!(extract_code_block(reply), "def f(x):\n    return x * 2");
    }

    #[test]
    fn test_untagged_block() {
        let reply = "```\n  let a = 1;  \n```";
        assert_eq!(extract_code_block(reply), "let a = 1;");
    }

    #[test]
    fn test_first_block_wins() {
        let reply = "```js\nfirst()\n```\ntext\n```js\nsecond()\n```";
        assert_eq!(extract_code_block(reply), "first()");
    }

    #[test]
    fn test_symbolic_language_tags() {
        assert_eq!(extract_code_block("```c++\nint x;\n```"), "int x;");
        assert_eq!(extract_code_block("```c#\nvar x = 1;\n```"), "var x = 1;");
    }

    #[test]
    fn test_crlf_line_endings() {
        let reply = "```rust\r\nfn main() {}\r\n```\r\n";
        assert_eq!(extract_code_block(reply), "fn main() {}");
    }

    #[test]
    fn test_no_block_falls_back_to_trimmed_text() {
        assert_eq!(extract_code_block("  just some code  \n"), "just some code");
    }

    #[test]
    fn test_unterminated_block_falls_back() {
        let reply = "```python\nprint(1)";
        assert_eq!(extract_code_block(reply), reply);
    }

    #[test]
    fn test_empty_completion() {
        assert_eq!(extract_code_block(""), "");
        assert_eq!(extract_code_block("   \n"), "");
    }
}
