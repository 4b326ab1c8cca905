//! Project metadata detection.
//!
//! Cheap marker-file heuristics producing a [`ProjectInfo`] record: which
//! language, framework, and package manager a directory appears to use.
//! Consumed by scaffolding; the discovery/resolution core never depends on
//! this module. Every probe degrades to `None` on a missing or unreadable
//! file.

use std::path::Path;

use crate::models::ProjectInfo;

/// Detect project metadata for a directory.
pub fn detect(root: &Path) -> ProjectInfo {
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string());

    let mut info = ProjectInfo {
        name,
        ..ProjectInfo::default()
    };

    if root.join("Cargo.toml").exists() {
        info.language = Some("rust".to_string());
        info.package_manager = Some("cargo".to_string());
    } else if root.join("package.json").exists() {
        info.language = Some(if root.join("tsconfig.json").exists() {
            "typescript".to_string()
        } else {
            "javascript".to_string()
        });
        info.package_manager = Some(node_package_manager(root));
        info.framework = node_framework(root);
    } else if root.join("pyproject.toml").exists() || root.join("requirements.txt").exists() {
        info.language = Some("python".to_string());
        info.package_manager = Some(python_package_manager(root));
    } else if root.join("go.mod").exists() {
        info.language = Some("go".to_string());
        info.package_manager = Some("go modules".to_string());
    } else if root.join("pom.xml").exists() {
        info.language = Some("java".to_string());
        info.package_manager = Some("maven".to_string());
    } else if root.join("build.gradle").exists() || root.join("build.gradle.kts").exists() {
        info.language = Some("java".to_string());
        info.package_manager = Some("gradle".to_string());
    }

    info
}

fn node_package_manager(root: &Path) -> String {
    if root.join("pnpm-lock.yaml").exists() {
        "pnpm".to_string()
    } else if root.join("yarn.lock").exists() {
        "yarn".to_string()
    } else {
        "npm".to_string()
    }
}

fn python_package_manager(root: &Path) -> String {
    if root.join("poetry.lock").exists() {
        "poetry".to_string()
    } else if root.join("uv.lock").exists() {
        "uv".to_string()
    } else {
        "pip".to_string()
    }
}

/// Sniff a frontend/backend framework from package.json dependency names.
fn node_framework(root: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(root.join("package.json")).ok()?;
    let parsed: serde_json::Value = serde_json::from_str(&raw).ok()?;

    let mut names = Vec::new();
    for key in ["dependencies", "devDependencies"] {
        if let Some(deps) = parsed.get(key).and_then(|d| d.as_object()) {
            names.extend(deps.keys().cloned());
        }
    }

    for candidate in ["next", "react", "vue", "svelte", "express"] {
        if names.iter().any(|n| n == candidate) {
            return Some(candidate.to_string());
        }
    }
    None
}
