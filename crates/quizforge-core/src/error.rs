//! Error types for quizforge-core.
//!
//! None of these are fatal to an editing session: the worst outcome of any
//! of them is an aborted operation or an unsaved draft.

use thiserror::Error;

use crate::validate::Violation;

/// Reasons a sample answer cannot be scored at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// The trimmed sample is empty.
    #[error("please provide a sample answer first")]
    EmptySample,

    /// A multiple-choice question has no option marked correct.
    #[error("no correct option selected for this multiple-choice question")]
    NoCorrectOption,

    /// The option marked correct has no text.
    #[error("correct option has no text")]
    EmptyCorrectOption,

    /// A short/long question has no rubric rules.
    #[error("no rubric rules defined for this question")]
    NoRubricRules,
}

/// Errors raised by editing commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// An index addressed an element that does not exist.
    #[error("{kind} index {index} out of range (len {len})")]
    OutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },
}

impl EditError {
    pub(crate) fn check(kind: &'static str, index: usize, len: usize) -> Result<(), EditError> {
        if index < len {
            Ok(())
        } else {
            Err(EditError::OutOfRange { kind, index, len })
        }
    }
}

/// Errors from a key-value store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying storage could not be read or written.
    #[error("storage unavailable: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be (de)serialized.
    #[error("stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The key cannot be used by this backend.
    #[error("invalid store key: {0}")]
    InvalidKey(String),
}

/// Errors raised while importing a quiz document.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The input is not valid JSON or does not fit the document schema.
    #[error("invalid JSON file: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The input parsed, but its top level is not an object.
    #[error("JSON does not look like a quiz data object")]
    NotAnObject,

    /// The import file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while exporting a quiz document.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The document failed export validation.
    #[error("document has {} validation issue(s)", .0.len())]
    Invalid(Vec<Violation>),

    /// Serialization failed.
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The export file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
