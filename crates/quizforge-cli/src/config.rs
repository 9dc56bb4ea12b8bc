//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level quizforge configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizforgeConfig {
    /// Directory backing the draft store.
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,
    /// Where `export` writes files unless `--output-dir` is given.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("./.quizforge")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizforge-export")
}

impl Default for QuizforgeConfig {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            output_dir: default_output_dir(),
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `quizforge.toml` in the current directory
/// 2. `~/.config/quizforge/config.toml`
///
/// `QUIZFORGE_STORE_DIR` overrides `store_dir` wherever it came from.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizforgeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizforge.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizforgeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizforgeConfig::default(),
    };

    if let Ok(dir) = std::env::var("QUIZFORGE_STORE_DIR") {
        if !dir.is_empty() {
            config.store_dir = PathBuf::from(dir);
        }
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizforge"))
}
