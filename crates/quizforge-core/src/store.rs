//! Key-value persistence for drafts and presentation state.
//!
//! Persisting is best-effort: failures are logged and reported as `false`
//! rather than returned as errors, so a broken store never interrupts
//! editing.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::editor::{assemble, load, EditorDocument};
use crate::error::StoreError;
use crate::export::parse_document;

/// Key holding the serialized working document.
pub const DRAFT_KEY: &str = "quizforge_draft";

/// Key holding the collapsed/expanded map.
pub const COLLAPSE_KEY: &str = "quizforge_collapse_states";

/// A string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Volatile in-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store keeping one `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(path, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Save the assembled document as the current draft.
///
/// Returns `false` (after logging) when the store rejects the write.
pub fn persist_draft<S: KeyValueStore + ?Sized>(store: &mut S, doc: &EditorDocument) -> bool {
    let result = serde_json::to_string(&assemble(doc))
        .map_err(StoreError::from)
        .and_then(|json| store.set(DRAFT_KEY, &json));
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("autosave failed: {e}");
            false
        }
    }
}

/// Load the saved draft, if there is a readable one.
pub fn restore_draft<S: KeyValueStore + ?Sized>(store: &S) -> Option<EditorDocument> {
    let raw = match store.get(DRAFT_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("could not read draft: {e}");
            return None;
        }
    };
    match parse_document(&raw) {
        Ok(doc) => Some(load(&doc)),
        Err(e) => {
            tracing::warn!("could not load draft, starting fresh: {e}");
            None
        }
    }
}

/// The saved draft, or the starter document when there is none.
pub fn restore_or_starter<S: KeyValueStore + ?Sized>(store: &S) -> EditorDocument {
    restore_draft(store).unwrap_or_else(EditorDocument::starter)
}

/// Forget the draft and the presentation state.
pub fn clear_draft<S: KeyValueStore + ?Sized>(store: &mut S) -> bool {
    let mut ok = true;
    for key in [DRAFT_KEY, COLLAPSE_KEY] {
        if let Err(e) = store.remove(key) {
            tracing::warn!("could not clear {key}: {e}");
            ok = false;
        }
    }
    ok
}

/// Collapsed/expanded flags keyed by `A:<assessment id>` and
/// `Q:<question id>`. Presentation only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollapseStates {
    states: BTreeMap<String, bool>,
}

fn assessment_key(id: &str) -> String {
    format!("A:{}", id.trim())
}

fn question_key(id: &str) -> String {
    format!("Q:{}", id.trim())
}

impl CollapseStates {
    /// Record an assessment's state. Blank ids are not tracked.
    pub fn set_assessment(&mut self, id: &str, collapsed: bool) {
        if !id.trim().is_empty() {
            self.states.insert(assessment_key(id), collapsed);
        }
    }

    pub fn set_question(&mut self, id: &str, collapsed: bool) {
        if !id.trim().is_empty() {
            self.states.insert(question_key(id), collapsed);
        }
    }

    pub fn assessment(&self, id: &str) -> Option<bool> {
        self.states.get(&assessment_key(id)).copied()
    }

    pub fn question(&self, id: &str) -> Option<bool> {
        self.states.get(&question_key(id)).copied()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Drop entries for ids no longer present in `doc`.
    pub fn retain_known(&mut self, doc: &EditorDocument) {
        let mut known = HashSet::new();
        for a in &doc.assessments {
            known.insert(assessment_key(&a.id));
            for q in &a.questions {
                known.insert(question_key(&q.id));
            }
        }
        self.states.retain(|key, _| known.contains(key));
    }

    /// Best-effort save; returns `false` after logging on failure.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> bool {
        let result = serde_json::to_string(self)
            .map_err(StoreError::from)
            .and_then(|json| store.set(COLLAPSE_KEY, &json));
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("could not save collapse states: {e}");
                false
            }
        }
    }

    /// Load saved states; anything unreadable yields an empty map.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match store.get(COLLAPSE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("ignoring unreadable collapse states: {e}");
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("could not read collapse states: {e}");
                Self::default()
            }
        }
    }
}
