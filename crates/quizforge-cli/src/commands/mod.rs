pub mod draft;
pub mod export;
pub mod grade;
pub mod init;
pub mod list;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use quizforge_core::model::QuizDocument;

/// Read a quiz file, naming it in any error.
pub(crate) fn read_quiz(path: &Path) -> Result<QuizDocument> {
    quizforge_core::export::import_file(path)
        .with_context(|| format!("failed to load quiz: {}", path.display()))
}
