//! The `quizforge draft` subcommands.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizforge_core::editor::{assemble, load, EditorDocument};
use quizforge_core::export::to_json_pretty;
use quizforge_core::store::{clear_draft, persist_draft, restore_draft, CollapseStates, DirStore};

use crate::config::load_config_from;

fn open_store(config_path: Option<PathBuf>) -> Result<DirStore> {
    let config = load_config_from(config_path.as_deref())?;
    Ok(DirStore::new(config.store_dir))
}

pub fn save(input: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let mut store = open_store(config_path)?;
    let doc = load(&super::read_quiz(&input)?);

    if !persist_draft(&mut store, &doc) {
        anyhow::bail!("could not save draft to {}", store.root().display());
    }

    // View state for ids that no longer exist is dropped.
    let mut states = CollapseStates::load(&store);
    states.retain_known(&doc);
    if !states.save(&mut store) {
        tracing::debug!("draft saved without view state");
    }

    println!("Saved draft to {}", store.root().display());
    Ok(())
}

pub fn restore(output: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let store = open_store(config_path)?;
    let doc = match restore_draft(&store) {
        Some(doc) => doc,
        None => {
            tracing::info!("no saved draft, using the starter quiz");
            EditorDocument::starter()
        }
    };
    let json = to_json_pretty(&assemble(&doc))?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Restored draft to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn clear(config_path: Option<PathBuf>) -> Result<()> {
    let mut store = open_store(config_path)?;
    if !clear_draft(&mut store) {
        anyhow::bail!("could not clear draft in {}", store.root().display());
    }
    println!("Draft cleared.");
    Ok(())
}
