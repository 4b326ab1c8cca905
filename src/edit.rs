//! Structured document mutation.
//!
//! Applies a batch of [`EditOperation`]s to a document's text using
//! heading-scope-aware line splicing. The batch is all-or-nothing: the
//! operations run in order against an in-memory copy
//! (`Pending → Applying(i) → Committed | Aborted(i)`), and a failure at any
//! point discards that copy and reports the failing operation — the input
//! text is never touched, and no partial-commit state exists.
//!
//! Writing the result back to storage is the caller's responsibility, and
//! only makes sense on success.

use crate::models::{EditChange, EditFailure, EditOperation, EditResult};

/// Apply `operations` to `text`, in order, all-or-nothing.
pub fn apply(text: &str, operations: &[EditOperation]) -> EditResult {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    let mut changes = Vec::with_capacity(operations.len());

    for (i, op) in operations.iter().enumerate() {
        match apply_one(&mut lines, op) {
            Ok(change) => changes.push(change),
            Err(message) => {
                return EditResult {
                    success: false,
                    document: None,
                    changes: Vec::new(),
                    error: Some(EditFailure {
                        operation: i,
                        message,
                    }),
                };
            }
        }
    }

    EditResult {
        success: true,
        document: Some(lines.join("\n")),
        changes,
        error: None,
    }
}

fn apply_one(lines: &mut Vec<String>, op: &EditOperation) -> Result<EditChange, String> {
    let (added, removed) = match op {
        EditOperation::Append { content } => {
            lines.push(String::new());
            let new_lines = split_lines(content);
            let count = new_lines.len();
            lines.extend(new_lines);
            (count + 1, 0)
        }
        EditOperation::Prepend { content } => {
            let mut new_lines = split_lines(content);
            new_lines.push(String::new());
            let count = new_lines.len();
            lines.splice(0..0, new_lines);
            (count, 0)
        }
        EditOperation::Replace {
            search_text,
            content,
        } => {
            if search_text.is_empty() {
                return Err("replace requires a non-empty search_text".to_string());
            }
            let joined = lines.join("\n");
            if !joined.contains(search_text.as_str()) {
                return Err(format!("text not found: {}", search_text));
            }
            let old_count = lines.len();
            let replaced = joined.replace(search_text.as_str(), content);
            *lines = replaced.split('\n').map(str::to_string).collect();
            let new_count = lines.len();
            (
                new_count.saturating_sub(old_count),
                old_count.saturating_sub(new_count),
            )
        }
        EditOperation::InsertAfter { section, content } => {
            let heading_idx = find_section(lines, section)?;
            let insert_at = section_end(lines, heading_idx);
            let new_lines = split_lines(content);
            let count = new_lines.len();
            lines.splice(insert_at..insert_at, new_lines);
            (count, 0)
        }
        EditOperation::InsertBefore { section, content } => {
            let heading_idx = find_section(lines, section)?;
            let new_lines = split_lines(content);
            let count = new_lines.len();
            lines.splice(heading_idx..heading_idx, new_lines);
            (count, 0)
        }
    };

    Ok(EditChange {
        kind: op.kind().to_string(),
        section: op.section().map(str::to_string),
        lines_added: added,
        lines_removed: removed,
    })
}

/// Index of the first line whose trimmed text equals `section` exactly.
fn find_section(lines: &[String], section: &str) -> Result<usize, String> {
    if section.trim().is_empty() {
        return Err("operation requires a section heading".to_string());
    }
    lines
        .iter()
        .position(|line| line.trim() == section)
        .ok_or_else(|| format!("section not found: {}", section))
}

/// End of the heading's scope: the first subsequent heading line whose level
/// is less than or equal to the target's, or end of document.
fn section_end(lines: &[String], heading_idx: usize) -> usize {
    let target_level = leading_hashes(lines[heading_idx].trim());
    for (offset, line) in lines[heading_idx + 1..].iter().enumerate() {
        if let Some(level) = heading_level(line.trim()) {
            if level <= target_level {
                return heading_idx + 1 + offset;
            }
        }
    }
    lines.len()
}

fn leading_hashes(s: &str) -> usize {
    s.chars().take_while(|c| *c == '#').count()
}

/// Markdown heading level of a line: one to six `#` characters followed by
/// whitespace (or nothing). Anything else is not a heading.
fn heading_level(line: &str) -> Option<usize> {
    let hashes = leading_hashes(line);
    if hashes == 0 || hashes > 6 {
        return None;
    }
    match line.as_bytes().get(hashes) {
        None => Some(hashes),
        Some(b) if b.is_ascii_whitespace() => Some(hashes),
        Some(_) => None,
    }
}

fn split_lines(content: &str) -> Vec<String> {
    content.split('\n').map(str::to_string).collect()
}
