//! Core data models used throughout Guidepost.
//!
//! These types represent the discovered convention documents, the index
//! snapshot built by a scan, the resolved contexts returned for a target
//! path, and the edit operations applied to a document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One discovered convention document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Project-relative, forward-slash path of the document. Unique key.
    pub path: String,
    /// Identifier of the containing directory; the project root is `"root"`.
    pub scope: String,
    /// Directory depth of the containing folder (0 at root).
    pub level: usize,
    /// Glob coverage patterns derived from the containing directory.
    pub patterns: Vec<String>,
    /// Cached raw body; `None` means "read lazily from disk".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// SHA-256 hex of `content` when cached, for staleness checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

/// Immutable snapshot of all convention documents under a project root.
///
/// Created fresh by a scan and never mutated in place. After any document
/// edit the caller rebuilds the index (or knowingly accepts staleness).
#[derive(Debug, Clone, Serialize)]
pub struct Index {
    pub project_root: PathBuf,
    /// Sorted ascending by `level`, then by `path`.
    pub entries: Vec<Entry>,
    pub built_at: DateTime<Utc>,
}

/// How a resolved entry relates to the target path.
///
/// The derived ordering is the tie-break order used when distances are
/// equal: `Direct` before `Parent` before `Root`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relevance {
    Direct,
    Parent,
    Root,
}

/// One resolved document for a target path.
#[derive(Debug, Clone, Serialize)]
pub struct Context {
    pub path: String,
    pub content: String,
    pub relevance: Relevance,
    /// Directory levels between the target and the entry.
    pub distance: usize,
}

/// One requested document mutation.
///
/// A closed sum over the five operation kinds, so each kind carries exactly
/// the fields it needs. The serde tag matches the wire spelling used by
/// `gp edit --ops` files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EditOperation {
    /// Add a blank separator line then `content` at the end of the document.
    Append { content: String },
    /// Add `content` then a blank separator line at the start.
    Prepend { content: String },
    /// Exact substring replacement across the whole document.
    Replace {
        search_text: String,
        content: String,
    },
    /// Insert `content` at the end of the named heading's scope.
    InsertAfter { section: String, content: String },
    /// Insert `content` immediately before the named heading's line.
    InsertBefore { section: String, content: String },
}

impl EditOperation {
    /// The wire name of this operation kind.
    pub fn kind(&self) -> &'static str {
        match self {
            EditOperation::Append { .. } => "append",
            EditOperation::Prepend { .. } => "prepend",
            EditOperation::Replace { .. } => "replace",
            EditOperation::InsertAfter { .. } => "insert-after",
            EditOperation::InsertBefore { .. } => "insert-before",
        }
    }

    /// The section heading this operation targets, if any.
    pub fn section(&self) -> Option<&str> {
        match self {
            EditOperation::InsertAfter { section, .. }
            | EditOperation::InsertBefore { section, .. } => Some(section),
            _ => None,
        }
    }
}

/// Per-operation change summary for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct EditChange {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub lines_added: usize,
    pub lines_removed: usize,
}

/// Which operation in a batch failed, and why.
#[derive(Debug, Clone, Serialize)]
pub struct EditFailure {
    /// Zero-based index of the failing operation.
    pub operation: usize,
    pub message: String,
}

/// Outcome of applying a batch of [`EditOperation`]s.
///
/// Either the whole batch applied (`success`, `document` holds the updated
/// text) or nothing did (`error` names the failing operation; the input text
/// was never touched).
#[derive(Debug, Clone, Serialize)]
pub struct EditResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    pub changes: Vec<EditChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<EditFailure>,
}

/// Detected project metadata, consumed by scaffolding.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectInfo {
    pub name: String,
    pub language: Option<String>,
    pub framework: Option<String>,
    pub package_manager: Option<String>,
}

/// Severity of a content-quality issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// One content-quality finding for a document.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevance_tie_break_order() {
        assert!(Relevance::Direct < Relevance::Parent);
        assert!(Relevance::Parent < Relevance::Root);
    }

    #[test]
    fn test_edit_operation_wire_format() {
        let op: EditOperation = serde_json::from_str(
            r###"{"kind":"insert-after","section":"## Usage","content":"new line"}"###,
        )
        .unwrap();
        assert_eq!(op.kind(), "insert-after");
        assert_eq!(op.section(), Some("## Usage"));

        let op: EditOperation =
            serde_json::from_str(r#"{"kind":"replace","search_text":"old","content":"new"}"#)
                .unwrap();
        assert_eq!(op.kind(), "replace");
        assert_eq!(op.section(), None);
    }
}
