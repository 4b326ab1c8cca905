//! Convention-document discovery.
//!
//! Walks a project root looking for files matching the configured convention
//! filename and builds an [`Index`] snapshot: one [`Entry`] per document,
//! with scope, depth level, and coverage patterns derived from its containing
//! directory. A scan never fails on a single unreadable document — that
//! entry is kept with its content absent.

use anyhow::{bail, Result};
use chrono::Utc;
use globset::{Glob, GlobSet, GlobSetBuilder};
use sha2::{Digest, Sha256};
use std::path::Path;
use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::models::{Entry, Index};
use crate::paths;

/// Scan `root` for convention documents and build an index snapshot.
///
/// Errors only when `root` itself does not exist. Re-scanning is the only
/// refresh mechanism — the returned [`Index`] is never updated in place.
pub fn scan(root: &Path, options: &ScanConfig) -> Result<Index> {
    if !root.exists() {
        bail!("Project root does not exist: {}", root.display());
    }

    let exclude_set = build_globset(&options.exclude_globs)?;

    let mut entries = Vec::new();

    let walker = WalkDir::new(root).follow_links(options.follow_symlinks);
    for entry in walker {
        // A subtree we cannot descend into is skipped, not fatal.
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy() != options.filename.as_str() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = paths::normalize(&relative.to_string_lossy());

        if exclude_set.is_match(&rel_str) {
            continue;
        }

        let dir = paths::directory_of(&rel_str);
        let content = if options.eager_content {
            // Unreadable file degrades to "present, content absent".
            std::fs::read_to_string(path).ok()
        } else {
            None
        };
        let fingerprint = content.as_deref().map(fingerprint);

        entries.push(Entry {
            path: rel_str,
            scope: scope_for(&dir),
            level: paths::segment_count(&dir),
            patterns: coverage_patterns(&dir),
            content,
            fingerprint,
        });
    }

    // Root first, then deterministic within each level.
    entries.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.path.cmp(&b.path)));

    Ok(Index {
        project_root: root.canonicalize().unwrap_or_else(|_| root.to_path_buf()),
        entries,
        built_at: Utc::now(),
    })
}

/// Human-readable scope identifier for a normalized directory.
pub fn scope_for(dir: &str) -> String {
    if dir.is_empty() {
        "root".to_string()
    } else {
        dir.to_string()
    }
}

/// Coverage patterns for a normalized directory.
///
/// Root claims the whole tree. A non-root directory claims its subtree and
/// its immediate children as two separate patterns so direct-vs-descendant
/// matching stays explicit. Re-derivation from the same directory is
/// idempotent; patterns are never set independently of the entry path.
pub fn coverage_patterns(dir: &str) -> Vec<String> {
    if dir.is_empty() {
        vec!["**/*".to_string()]
    } else {
        vec![format!("{}/**/*", dir), format!("{}/*", dir)]
    }
}

fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
