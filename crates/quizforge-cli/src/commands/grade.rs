//! The `quizforge grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use quizforge_core::editor::load;
use quizforge_core::evaluator::{evaluate, Evaluation};

pub fn execute(
    input: PathBuf,
    assessment: String,
    question: String,
    answer: String,
    format: String,
) -> Result<()> {
    let doc = load(&super::read_quiz(&input)?);
    let q = doc
        .find_question(&assessment, &question)
        .with_context(|| format!("question '{question}' not found in assessment '{assessment}'"))?;

    let evaluation = evaluate(q, &answer)
        .with_context(|| format!("cannot grade question '{question}'"))?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&evaluation)?),
        "text" => print_evaluation(&question, &evaluation),
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}

fn print_evaluation(question: &str, evaluation: &Evaluation) {
    let mut table = Table::new();
    table.set_header(vec!["Question", "Score", "Keyword matches"]);
    table.add_row(vec![
        Cell::new(question),
        Cell::new(format!(
            "{} / {}",
            evaluation.earned_points, evaluation.possible_points
        )),
        Cell::new(
            evaluation
                .keyword_stats
                .map(|k| format!("{} / {}", k.hits, k.total))
                .unwrap_or_else(|| "-".to_string()),
        ),
    ]);
    println!("{table}");

    for detail in &evaluation.per_rule_details {
        println!("  {detail}");
    }
}
