//! Starter convention-document scaffolding.
//!
//! `gp init` writes a template document seeded from detected project
//! metadata, refusing to clobber an existing one unless forced.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::models::ProjectInfo;

/// Write a starter convention document into `dir`.
///
/// Fails if the file already exists and `force` is false. Returns the path
/// of the written file.
pub fn write_starter(
    dir: &Path,
    filename: &str,
    info: &ProjectInfo,
    force: bool,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join(filename);
    if path.exists() && !force {
        bail!(
            "Convention document already exists: {} (use --force to overwrite)",
            path.display()
        );
    }

    let mut stack_lines = String::new();
    if let Some(language) = &info.language {
        stack_lines.push_str(&format!("- Language: {}\n", language));
    }
    if let Some(framework) = &info.framework {
        stack_lines.push_str(&format!("- Framework: {}\n", framework));
    }
    if let Some(pm) = &info.package_manager {
        stack_lines.push_str(&format!("- Package manager: {}\n", pm));
    }
    if stack_lines.is_empty() {
        stack_lines.push_str("- Stack: undetected, fill in by hand\n");
    }

    let template = format!(
        r#"# {name} conventions

Guidance for AI coding tools working in this directory and below.

## Project

{stack}
## Conventions

- Keep changes small and focused.
- Match the existing module layout and naming.

## Commands

- Build:
- Test:
- Lint:
"#,
        name = info.name,
        stack = stack_lines,
    );

    std::fs::write(&path, template)?;
    Ok(path)
}
