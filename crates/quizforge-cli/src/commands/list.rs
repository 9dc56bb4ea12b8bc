//! The `quizforge list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

pub fn execute(input: PathBuf) -> Result<()> {
    let doc = super::read_quiz(&input)?;

    println!("{} v{} ({})", doc.app_id, doc.version, doc.title);

    if doc.assessments.is_empty() {
        println!("No assessments defined.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Assessment",
        "Question",
        "Type",
        "Max points",
        "Rules",
        "Options",
    ]);

    for a in &doc.assessments {
        if a.questions.is_empty() {
            table.add_row(vec![
                Cell::new(&a.id),
                Cell::new("(none)"),
                Cell::new(""),
                Cell::new(""),
                Cell::new(""),
                Cell::new(""),
            ]);
        }
        for q in &a.questions {
            table.add_row(vec![
                Cell::new(&a.id),
                Cell::new(&q.id),
                Cell::new(q.kind),
                Cell::new(q.max_points),
                Cell::new(q.rubric.len()),
                Cell::new(
                    q.options
                        .as_ref()
                        .map(|o| o.len().to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ]);
        }
    }

    println!("{table}");
    Ok(())
}
