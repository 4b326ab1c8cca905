use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScanConfig {
    /// Filename of the convention documents to index.
    #[serde(default = "default_filename")]
    pub filename: String,
    /// Glob patterns excluded from the walk.
    #[serde(default = "default_exclude_globs")]
    pub exclude_globs: Vec<String>,
    /// Read document bodies into the index at scan time.
    #[serde(default)]
    pub eager_content: bool,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            filename: default_filename(),
            exclude_globs: default_exclude_globs(),
            eager_content: false,
            follow_symlinks: false,
        }
    }
}

fn default_filename() -> String {
    "AI_README.md".to_string()
}

fn default_exclude_globs() -> Vec<String> {
    vec![
        "**/.git/**".to_string(),
        "**/node_modules/**".to_string(),
        "**/target/**".to_string(),
        "**/dist/**".to_string(),
        "**/build/**".to_string(),
        "**/vendor/**".to_string(),
        "**/.venv/**".to_string(),
    ]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ValidationConfig {
    /// Soft budget for document size, in estimated tokens.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_max_tokens() -> usize {
    1500
}

impl Config {
    /// A config with built-in defaults, for when no config file exists.
    pub fn minimal() -> Self {
        Self::default()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate scan options
    if config.scan.filename.trim().is_empty() {
        anyhow::bail!("scan.filename must not be empty");
    }
    if config.scan.filename.contains('/') || config.scan.filename.contains('\\') {
        anyhow::bail!(
            "scan.filename must be a bare filename, got '{}'",
            config.scan.filename
        );
    }
    for pattern in &config.scan.exclude_globs {
        globset::Glob::new(pattern)
            .with_context(|| format!("Invalid exclude glob: '{}'", pattern))?;
    }

    // Validate validation limits
    if config.validation.max_tokens == 0 {
        anyhow::bail!("validation.max_tokens must be > 0");
    }

    Ok(config)
}
