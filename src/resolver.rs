//! Context resolution: which convention documents apply to a path.
//!
//! Given an [`Index`] and a target path (file or directory, existing or
//! not), returns the entries whose scope covers the target, ordered by
//! specificity: ascending directory distance, ties broken
//! direct-before-parent-before-root.
//!
//! The primary match test is plain ancestor arithmetic on normalized
//! directories; the entry's glob coverage patterns are a fallback for
//! matches the lineage test cannot express.

use globset::Glob;
use std::collections::BTreeMap;

use crate::models::{Context, Entry, Index, Relevance};
use crate::paths;

/// Sentinel body used when a document cannot be read at resolve time.
pub const CONTENT_UNAVAILABLE: &str = "(content unavailable)";

/// Resolve the ordered list of applicable contexts for one target path.
///
/// The target may name a file or a directory; a final segment with a
/// file-type-looking suffix is resolved against its parent directory, so
/// context is available even for files that do not exist yet. Root entries
/// always match and are dropped only when `include_root` is false.
pub fn resolve_for(index: &Index, target: &str, include_root: bool) -> Vec<Context> {
    let target_norm = paths::normalize(target);
    let target_dir = paths::directory_of(&target_norm);

    let mut contexts: Vec<Context> = Vec::new();

    for entry in &index.entries {
        let is_root_entry = entry.level == 0;
        if is_root_entry && !include_root {
            continue;
        }

        let entry_dir = paths::directory_of(&entry.path);
        let matches = is_root_entry
            || paths::is_within(&target_dir, &entry_dir)
            || patterns_match(entry, &target_norm);
        if !matches {
            continue;
        }

        let relevance = if entry_dir.is_empty() {
            Relevance::Root
        } else if entry_dir == target_dir {
            Relevance::Direct
        } else {
            Relevance::Parent
        };

        contexts.push(Context {
            path: entry.path.clone(),
            content: resolve_content(index, entry),
            relevance,
            distance: paths::distance_between(&target_dir, &entry_dir),
        });
    }

    contexts.sort_by(|a, b| {
        a.distance
            .cmp(&b.distance)
            .then_with(|| a.relevance.cmp(&b.relevance))
    });
    contexts
}

/// Batched resolution: independent per-path, keyed by the input path.
pub fn resolve_for_many(index: &Index, targets: &[String]) -> BTreeMap<String, Vec<Context>> {
    targets
        .iter()
        .map(|t| (t.clone(), resolve_for(index, t, true)))
        .collect()
}

/// Glob fallback over the entry's coverage patterns.
fn patterns_match(entry: &Entry, target: &str) -> bool {
    entry.patterns.iter().any(|p| {
        Glob::new(p)
            .map(|g| g.compile_matcher().is_match(target))
            .unwrap_or(false)
    })
}

/// Cached body if the scan was eager, otherwise a fresh read. A read
/// failure degrades to a sentinel so the remaining contexts still resolve.
fn resolve_content(index: &Index, entry: &Entry) -> String {
    if let Some(body) = &entry.content {
        return body.clone();
    }
    std::fs::read_to_string(index.project_root.join(&entry.path))
        .unwrap_or_else(|_| CONTENT_UNAVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner;
    use chrono::Utc;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn entry(path: &str, content: Option<&str>) -> Entry {
        let dir = paths::directory_of(path);
        Entry {
            path: path.to_string(),
            scope: scanner::scope_for(&dir),
            level: paths::segment_count(&dir),
            patterns: scanner::coverage_patterns(&dir),
            content: content.map(|c| c.to_string()),
            fingerprint: None,
        }
    }

    fn index_of(root: &Path, entries: Vec<Entry>) -> Index {
        Index {
            project_root: root.to_path_buf(),
            entries,
            built_at: Utc::now(),
        }
    }

    fn in_memory_index(entries: Vec<Entry>) -> Index {
        index_of(Path::new("/nonexistent"), entries)
    }

    #[test]
    fn test_frontend_scenario() {
        let index = in_memory_index(vec![
            entry("AI_README.md", Some("root doc")),
            entry("apps/frontend/AI_README.md", Some("frontend doc")),
        ]);

        let contexts = resolve_for(&index, "apps/frontend/src/components/atoms/Button.tsx", true);
        assert_eq!(contexts.len(), 2);

        assert_eq!(contexts[0].path, "apps/frontend/AI_README.md");
        assert_eq!(contexts[0].relevance, Relevance::Parent);
        assert_eq!(contexts[0].distance, 3);

        assert_eq!(contexts[1].path, "AI_README.md");
        assert_eq!(contexts[1].relevance, Relevance::Root);
        assert_eq!(contexts[1].distance, 5);

        let without_root =
            resolve_for(&index, "apps/frontend/src/components/atoms/Button.tsx", false);
        assert_eq!(without_root.len(), 1);
        assert_eq!(without_root[0].path, "apps/frontend/AI_README.md");
    }

    #[test]
    fn test_direct_relevance_in_own_directory() {
        let index = in_memory_index(vec![
            entry("AI_README.md", Some("root doc")),
            entry("apps/frontend/AI_README.md", Some("frontend doc")),
        ]);

        let contexts = resolve_for(&index, "apps/frontend/main.ts", true);
        assert_eq!(contexts[0].relevance, Relevance::Direct);
        assert_eq!(contexts[0].distance, 0);
        assert_eq!(contexts[1].relevance, Relevance::Root);
        assert_eq!(contexts[1].distance, 2);
    }

    #[test]
    fn test_directory_target_without_suffix() {
        let index = in_memory_index(vec![entry("apps/frontend/AI_README.md", Some("doc"))]);

        // No file-type suffix: the path itself is the directory.
        let contexts = resolve_for(&index, "apps/frontend", true);
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].relevance, Relevance::Direct);
        assert_eq!(contexts[0].distance, 0);
    }

    #[test]
    fn test_unrelated_subtree_only_matches_root() {
        let index = in_memory_index(vec![
            entry("AI_README.md", Some("root doc")),
            entry("apps/frontend/AI_README.md", Some("frontend doc")),
        ]);

        let contexts = resolve_for(&index, "services/api/handler.go", true);
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].relevance, Relevance::Root);
        assert_eq!(contexts[0].distance, 2);
    }

    #[test]
    fn test_ancestor_completeness() {
        let index = in_memory_index(vec![
            entry("AI_README.md", Some("root")),
            entry("apps/AI_README.md", Some("apps")),
            entry("apps/frontend/AI_README.md", Some("frontend")),
            entry("apps/frontend/src/AI_README.md", Some("src")),
        ]);

        let contexts = resolve_for(&index, "apps/frontend/src/deep/mod.rs", true);
        let found: Vec<&str> = contexts.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(
            found,
            vec![
                "apps/frontend/src/AI_README.md",
                "apps/frontend/AI_README.md",
                "apps/AI_README.md",
                "AI_README.md",
            ]
        );
    }

    #[test]
    fn test_distance_monotonicity() {
        let index = in_memory_index(vec![
            entry("AI_README.md", Some("root")),
            entry("apps/AI_README.md", Some("apps")),
        ]);

        let near = resolve_for(&index, "apps/a.ts", true);
        let far = resolve_for(&index, "apps/x/y/a.ts", true);
        for (n, f) in near.iter().zip(far.iter()) {
            assert_eq!(n.path, f.path);
            assert!(f.distance >= n.distance);
        }
    }

    #[test]
    fn test_sorted_by_distance_nondecreasing() {
        let index = in_memory_index(vec![
            entry("AI_README.md", Some("root")),
            entry("apps/AI_README.md", Some("apps")),
            entry("apps/frontend/AI_README.md", Some("frontend")),
        ]);

        let contexts = resolve_for(&index, "apps/frontend/src/a.ts", true);
        let distances: Vec<usize> = contexts.iter().map(|c| c.distance).collect();
        let mut sorted = distances.clone();
        sorted.sort_unstable();
        assert_eq!(distances, sorted);
    }

    #[test]
    fn test_pattern_fallback_matches_divergent_directory() {
        // A handcrafted pattern claims a sibling subtree the lineage test
        // cannot reach; the divergent-distance formula covers it.
        let mut e = entry("apps/frontend/AI_README.md", Some("frontend"));
        e.patterns.push("apps/shared/**/*".to_string());
        let index = in_memory_index(vec![e]);

        let contexts = resolve_for(&index, "apps/shared/util/fmt.ts", true);
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].relevance, Relevance::Parent);
        // up from apps/shared/util to apps, down to apps/frontend
        assert_eq!(contexts[0].distance, 3);
    }

    #[test]
    fn test_lazy_content_read_from_disk() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("AI_README.md"), "read me lazily").unwrap();
        let index = index_of(tmp.path(), vec![entry("AI_README.md", None)]);

        let contexts = resolve_for(&index, "src/lib.rs", true);
        assert_eq!(contexts[0].content, "read me lazily");
    }

    #[test]
    fn test_missing_document_degrades_to_sentinel() {
        let index = in_memory_index(vec![entry("AI_README.md", None)]);
        let contexts = resolve_for(&index, "src/lib.rs", true);
        assert_eq!(contexts[0].content, CONTENT_UNAVAILABLE);
    }

    #[test]
    fn test_resolve_for_many_is_independent_per_path() {
        let index = in_memory_index(vec![
            entry("AI_README.md", Some("root")),
            entry("apps/frontend/AI_README.md", Some("frontend")),
        ]);

        let targets = vec![
            "apps/frontend/a.ts".to_string(),
            "services/api/b.go".to_string(),
        ];
        let resolved = resolve_for_many(&index, &targets);

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved["apps/frontend/a.ts"].len(), 2);
        assert_eq!(resolved["services/api/b.go"].len(), 1);
    }

    #[test]
    fn test_empty_index_resolves_to_empty() {
        let index = in_memory_index(vec![]);
        assert!(resolve_for(&index, "src/lib.rs", true).is_empty());
    }
}
