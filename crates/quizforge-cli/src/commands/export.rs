//! The `quizforge export` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizforge_core::editor::load;
use quizforge_core::error::ExportError;
use quizforge_core::export::write_export;

use crate::config::load_config_from;

pub fn execute(
    input: PathBuf,
    output_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let output_dir = output_dir.unwrap_or(config.output_dir);

    let doc = load(&super::read_quiz(&input)?);

    match write_export(&doc, &output_dir) {
        Ok(path) => {
            println!("Exported {}", path.display());
            Ok(())
        }
        Err(ExportError::Invalid(violations)) => {
            eprintln!("Cannot export, please fix the following:");
            for v in &violations {
                eprintln!("  - {v}");
            }
            anyhow::bail!("{} validation issue(s) found", violations.len())
        }
        Err(e) => Err(e).context("export failed"),
    }
}
