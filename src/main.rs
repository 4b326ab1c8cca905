//! # Guidepost CLI (`gp`)
//!
//! The `gp` binary is the primary interface for Guidepost. It provides
//! commands for indexing a project's convention documents, resolving which
//! documents apply to a path, editing documents structurally, validating
//! their content, and scaffolding new ones.
//!
//! ## Usage
//!
//! ```bash
//! gp --config ./guidepost.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `gp scan` | Index every convention document under a root |
//! | `gp resolve <path>...` | List the documents that apply to each path |
//! | `gp edit <file>` | Apply structural edit operations to a document |
//! | `gp validate <file>...` | Run content-quality checks |
//! | `gp init` | Scaffold a starter convention document |
//! | `gp project` | Print detected project metadata |

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use guidepost::config::{self, Config};
use guidepost::models::{EditOperation, Severity};
use guidepost::{edit, project, resolver, scaffold, scanner, validate};

/// Guidepost — a hierarchical convention-document harness for AI coding
/// tools.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file; built-in defaults apply when the file does not exist.
#[derive(Parser)]
#[command(
    name = "gp",
    about = "Guidepost — a hierarchical convention-document harness for AI coding tools",
    version,
    long_about = "Guidepost maintains small AI_README.md convention documents attached to \
    directories in a source tree, resolves which documents apply to any file or directory \
    path, and applies structure-preserving edits to them."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./guidepost.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Index every convention document under a root.
    ///
    /// Walks the tree, skips excluded directories, and prints one line per
    /// discovered document with its scope and depth level. The index is a
    /// snapshot — re-run after editing documents.
    Scan {
        /// Project root to scan.
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Read document bodies into the index (and fingerprint them).
        #[arg(long)]
        eager: bool,

        /// Emit the full index as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Resolve the documents that apply to one or more paths.
    ///
    /// Paths may name files or directories, existing or not. Output is
    /// ordered by specificity: nearest scope first, project root last.
    Resolve {
        /// Target path(s), relative to the project root.
        #[arg(required = true)]
        paths: Vec<String>,

        /// Project root to scan.
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Leave out the project-root document (single-path form only).
        #[arg(long)]
        no_root: bool,

        /// Print only paths, relevance, and distance — no bodies.
        #[arg(long)]
        names_only: bool,

        /// Emit resolved contexts as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Apply structural edit operations to a convention document.
    ///
    /// Operations come from a JSON file (`--ops`) or a single inline flag.
    /// The batch is all-or-nothing: the file is rewritten only when every
    /// operation succeeds.
    Edit {
        /// The document to edit.
        file: PathBuf,

        /// JSON file with an array of edit operations.
        #[arg(long)]
        ops: Option<PathBuf>,

        /// Append content to the end of the document.
        #[arg(long)]
        append: Option<String>,

        /// Prepend content to the start of the document.
        #[arg(long)]
        prepend: Option<String>,

        /// Replace this exact text (requires --with).
        #[arg(long)]
        replace: Option<String>,

        /// Replacement text for --replace.
        #[arg(long = "with")]
        replace_with: Option<String>,

        /// Insert content at the end of this heading's section (requires --content).
        #[arg(long)]
        insert_after: Option<String>,

        /// Insert content immediately before this heading (requires --content).
        #[arg(long)]
        insert_before: Option<String>,

        /// Content for --insert-after / --insert-before.
        #[arg(long)]
        content: Option<String>,

        /// Show the change summary without writing the file.
        #[arg(long)]
        dry_run: bool,
    },

    /// Run content-quality checks on documents.
    ///
    /// Prints one line per finding; exits nonzero when any error-severity
    /// issue is found.
    Validate {
        /// Documents to check.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Emit findings as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Scaffold a starter convention document.
    ///
    /// Detects the project's stack and writes a template document into the
    /// target directory. Refuses to overwrite an existing one.
    Init {
        /// Directory to place the document in.
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Overwrite an existing document.
        #[arg(long)]
        force: bool,
    },

    /// Print detected project metadata.
    Project {
        /// Directory to inspect.
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Emit metadata as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = if cli.config.exists() {
        config::load_config(&cli.config)?
    } else {
        Config::minimal()
    };

    match cli.command {
        Commands::Scan { root, eager, json } => run_scan(&cfg, &root, eager, json),
        Commands::Resolve {
            paths,
            root,
            no_root,
            names_only,
            json,
        } => run_resolve(&cfg, &root, &paths, no_root, names_only, json),
        Commands::Edit {
            file,
            ops,
            append,
            prepend,
            replace,
            replace_with,
            insert_after,
            insert_before,
            content,
            dry_run,
        } => {
            let operations = gather_operations(
                ops,
                append,
                prepend,
                replace,
                replace_with,
                insert_after,
                insert_before,
                content,
            )?;
            run_edit(&file, &operations, dry_run)
        }
        Commands::Validate { files, json } => run_validate(&cfg, &files, json),
        Commands::Init { dir, force } => run_init(&cfg, &dir, force),
        Commands::Project { dir, json } => run_project(&dir, json),
    }
}

fn run_scan(cfg: &Config, root: &Path, eager: bool, json: bool) -> Result<()> {
    let mut options = cfg.scan.clone();
    if eager {
        options.eager_content = true;
    }

    let index = scanner::scan(root, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&index)?);
        return Ok(());
    }

    println!("{:<28} {:<6} {:<7} PATH", "SCOPE", "LEVEL", "CACHED");
    for entry in &index.entries {
        println!(
            "{:<28} {:<6} {:<7} {}",
            entry.scope,
            entry.level,
            if entry.content.is_some() { "yes" } else { "no" },
            entry.path
        );
    }
    println!();
    println!(
        "indexed {} documents under {} at {}",
        index.entries.len(),
        index.project_root.display(),
        index.built_at.format("%Y-%m-%dT%H:%M:%SZ")
    );

    Ok(())
}

fn run_resolve(
    cfg: &Config,
    root: &Path,
    paths: &[String],
    no_root: bool,
    names_only: bool,
    json: bool,
) -> Result<()> {
    if no_root && paths.len() > 1 {
        bail!("--no-root applies to single-path resolution only");
    }

    let index = scanner::scan(root, &cfg.scan)?;

    if paths.len() == 1 {
        let contexts = resolver::resolve_for(&index, &paths[0], !no_root);
        if json {
            println!("{}", serde_json::to_string_pretty(&contexts)?);
            return Ok(());
        }
        print_contexts(&paths[0], &contexts, names_only);
        return Ok(());
    }

    let resolved = resolver::resolve_for_many(&index, paths);
    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }
    for (path, contexts) in &resolved {
        print_contexts(path, contexts, names_only);
        println!();
    }

    Ok(())
}

fn print_contexts(target: &str, contexts: &[guidepost::models::Context], names_only: bool) {
    if contexts.is_empty() {
        println!("{}: no applicable documents", target);
        return;
    }

    if names_only {
        println!("{}:", target);
        for ctx in contexts {
            println!(
                "  {:<44} {:<8} distance {}",
                ctx.path,
                format!("{:?}", ctx.relevance).to_lowercase(),
                ctx.distance
            );
        }
        return;
    }

    for ctx in contexts {
        println!(
            "--- {} ({}, distance {}) ---",
            ctx.path,
            format!("{:?}", ctx.relevance).to_lowercase(),
            ctx.distance
        );
        println!("{}", ctx.content);
        println!();
    }
}

#[allow(clippy::too_many_arguments)]
fn gather_operations(
    ops: Option<PathBuf>,
    append: Option<String>,
    prepend: Option<String>,
    replace: Option<String>,
    replace_with: Option<String>,
    insert_after: Option<String>,
    insert_before: Option<String>,
    content: Option<String>,
) -> Result<Vec<EditOperation>> {
    let inline_flags = [
        append.is_some(),
        prepend.is_some(),
        replace.is_some(),
        insert_after.is_some(),
        insert_before.is_some(),
    ]
    .iter()
    .filter(|set| **set)
    .count();

    if let Some(ops_path) = ops {
        if inline_flags > 0 {
            bail!("--ops cannot be combined with inline operation flags");
        }
        let raw = std::fs::read_to_string(&ops_path)?;
        let operations: Vec<EditOperation> = serde_json::from_str(&raw)?;
        if operations.is_empty() {
            bail!("operations file is empty: {}", ops_path.display());
        }
        return Ok(operations);
    }

    if inline_flags != 1 {
        bail!("provide --ops FILE or exactly one of --append, --prepend, --replace, --insert-after, --insert-before");
    }

    if let Some(text) = append {
        return Ok(vec![EditOperation::Append { content: text }]);
    }
    if let Some(text) = prepend {
        return Ok(vec![EditOperation::Prepend { content: text }]);
    }
    if let Some(search_text) = replace {
        let Some(content) = replace_with else {
            bail!("--replace requires --with");
        };
        return Ok(vec![EditOperation::Replace {
            search_text,
            content,
        }]);
    }
    if let Some(section) = insert_after {
        let Some(content) = content else {
            bail!("--insert-after requires --content");
        };
        return Ok(vec![EditOperation::InsertAfter { section, content }]);
    }
    let section = insert_before.expect("one inline flag is set");
    let Some(content) = content else {
        bail!("--insert-before requires --content");
    };
    Ok(vec![EditOperation::InsertBefore { section, content }])
}

fn run_edit(file: &Path, operations: &[EditOperation], dry_run: bool) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file.display(), e))?;

    let result = edit::apply(&text, operations);

    if !result.success {
        let failure = result.error.expect("failed result carries an error");
        eprintln!(
            "Error: operation {} ({}) failed: {}",
            failure.operation,
            operations[failure.operation].kind(),
            failure.message
        );
        std::process::exit(1);
    }

    for change in &result.changes {
        match &change.section {
            Some(section) => println!(
                "{:<14} {:<24} +{} -{}",
                change.kind, section, change.lines_added, change.lines_removed
            ),
            None => println!(
                "{:<14} {:<24} +{} -{}",
                change.kind, "-", change.lines_added, change.lines_removed
            ),
        }
    }

    let document = result.document.expect("successful result carries the text");
    if dry_run {
        println!("dry-run: {} not written", file.display());
        return Ok(());
    }

    std::fs::write(file, document)?;
    println!("updated {}", file.display());
    Ok(())
}

fn run_validate(cfg: &Config, files: &[PathBuf], json: bool) -> Result<()> {
    let mut error_count = 0usize;
    let mut report = Vec::new();

    for file in files {
        let text = std::fs::read_to_string(file)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file.display(), e))?;
        let issues = validate::check(&text, &cfg.validation);

        error_count += issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count();

        if json {
            report.push(serde_json::json!({
                "file": file.display().to_string(),
                "issues": issues,
            }));
            continue;
        }

        if issues.is_empty() {
            println!("{}: ok", file.display());
            continue;
        }
        for issue in &issues {
            let location = match issue.line {
                Some(line) => format!("{}:{}", file.display(), line),
                None => file.display().to_string(),
            };
            println!(
                "{:<36} {:<8} {}",
                location,
                format!("{:?}", issue.severity).to_lowercase(),
                issue.message
            );
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if error_count > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn run_init(cfg: &Config, dir: &Path, force: bool) -> Result<()> {
    let info = project::detect(dir);
    let path = scaffold::write_starter(dir, &cfg.scan.filename, &info, force)?;
    println!("Created {}", path.display());
    Ok(())
}

fn run_project(dir: &Path, json: bool) -> Result<()> {
    let info = project::detect(dir);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("name:            {}", info.name);
    println!(
        "language:        {}",
        info.language.as_deref().unwrap_or("(unknown)")
    );
    println!(
        "framework:       {}",
        info.framework.as_deref().unwrap_or("(none)")
    );
    println!(
        "package manager: {}",
        info.package_manager.as_deref().unwrap_or("(unknown)")
    );
    Ok(())
}
