//! Content-quality checks for convention documents.
//!
//! A small fixed rule set over the raw text: emptiness, heading structure,
//! size budget, and fence balance. Pure text in, issues out — callers decide
//! what to do with the findings.

use crate::config::ValidationConfig;
use crate::models::{Issue, Severity};

/// Approximate chars-per-token ratio used for the size budget.
const CHARS_PER_TOKEN: usize = 4;

/// Check a document's raw text against the fixed rule set.
pub fn check(text: &str, config: &ValidationConfig) -> Vec<Issue> {
    let mut issues = Vec::new();

    if text.trim().is_empty() {
        issues.push(Issue {
            severity: Severity::Error,
            line: None,
            message: "document is empty".to_string(),
        });
        return issues;
    }

    let estimated_tokens = text.chars().count() / CHARS_PER_TOKEN;
    if estimated_tokens > config.max_tokens {
        issues.push(Issue {
            severity: Severity::Warning,
            line: None,
            message: format!(
                "document is ~{} tokens, over the {}-token budget",
                estimated_tokens, config.max_tokens
            ),
        });
    }

    let mut in_fence = false;
    let mut fence_opened_at = 0usize;
    let mut prev_heading_level: Option<usize> = None;
    let mut saw_heading = false;

    for (i, line) in text.lines().enumerate() {
        let lineno = i + 1;
        let trimmed = line.trim_start();

        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            if in_fence {
                fence_opened_at = lineno;
            }
            continue;
        }
        if in_fence {
            continue;
        }

        if let Some(level) = heading_level(trimmed) {
            saw_heading = true;
            if let Some(prev) = prev_heading_level {
                if level > prev + 1 {
                    issues.push(Issue {
                        severity: Severity::Warning,
                        line: Some(lineno),
                        message: format!(
                            "heading level jumps from {} to {}",
                            prev, level
                        ),
                    });
                }
            }
            prev_heading_level = Some(level);
        }
    }

    if in_fence {
        issues.push(Issue {
            severity: Severity::Error,
            line: Some(fence_opened_at),
            message: "unclosed code fence".to_string(),
        });
    }

    if !saw_heading {
        issues.push(Issue {
            severity: Severity::Warning,
            line: None,
            message: "no markdown heading found".to_string(),
        });
    }

    issues
}

fn heading_level(line: &str) -> Option<usize> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    match line.as_bytes().get(hashes) {
        None => Some(hashes),
        Some(b) if b.is_ascii_whitespace() => Some(hashes),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ValidationConfig {
        ValidationConfig::default()
    }

    fn has_message(issues: &[Issue], fragment: &str) -> bool {
        issues.iter().any(|i| i.message.contains(fragment))
    }

    #[test]
    fn test_clean_document_passes() {
        let doc = "# Title\n\nSome conventions.\n\n## Details\n\nMore text.";
        assert!(check(doc, &config()).is_empty());
    }

    #[test]
    fn test_empty_document_is_an_error() {
        let issues = check("   \n\n", &config());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(has_message(&issues, "empty"));
    }

    #[test]
    fn test_missing_heading_warns() {
        let issues = check("just prose, no structure", &config());
        assert!(has_message(&issues, "no markdown heading"));
    }

    #[test]
    fn test_token_budget_warns() {
        let cfg = ValidationConfig { max_tokens: 10 };
        let doc = format!("# T\n\n{}", "x".repeat(200));
        let issues = check(&doc, &cfg);
        assert!(has_message(&issues, "token budget"));
    }

    #[test]
    fn test_heading_jump_warns_with_line() {
        let doc = "# T\n\n### Deep\n\nbody";
        let issues = check(doc, &config());
        assert!(has_message(&issues, "jumps from 1 to 3"));
        assert_eq!(issues[0].line, Some(3));
    }

    #[test]
    fn test_headings_inside_fences_are_ignored() {
        let doc = "# T\n\n```sh\n#### not a heading\n```\n\n## Next";
        assert!(check(doc, &config()).is_empty());
    }

    #[test]
    fn test_unclosed_fence_is_an_error() {
        let doc = "# T\n\n```sh\necho hi";
        let issues = check(doc, &config());
        assert!(has_message(&issues, "unclosed code fence"));
        assert_eq!(issues[0].line, Some(3));
        assert_eq!(issues[0].severity, Severity::Error);
    }
}
