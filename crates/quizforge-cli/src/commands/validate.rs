//! The `quizforge validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizforge_core::validate::{lint_document, validate_document};

pub fn execute(input: PathBuf) -> Result<()> {
    let doc = super::read_quiz(&input)?;

    let questions: usize = doc.assessments.iter().map(|a| a.questions.len()).sum();
    println!(
        "Quiz: {} ({} assessments, {} questions)",
        if doc.title.is_empty() { &doc.app_id } else { &doc.title },
        doc.assessments.len(),
        questions
    );

    let violations = validate_document(&doc);
    for v in &violations {
        println!("  ERROR: {v}");
    }

    let warnings = lint_document(&doc);
    for w in &warnings {
        let prefix = w
            .location
            .as_ref()
            .map(|loc| format!("  [{loc}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if !warnings.is_empty() {
        println!("\n{} warning(s) found.", warnings.len());
    }

    if !violations.is_empty() {
        anyhow::bail!(
            "{} validation issue(s) found; {} cannot be exported",
            violations.len(),
            input.display()
        );
    }

    println!("Quiz is valid and ready to export.");
    Ok(())
}
