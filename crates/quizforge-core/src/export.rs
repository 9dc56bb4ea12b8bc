//! JSON import and export of quiz documents.

use std::path::{Path, PathBuf};

use crate::editor::{assemble, EditorDocument};
use crate::error::{ExportError, ImportError};
use crate::model::QuizDocument;
use crate::validate::validate_document;

/// A validated, serialized document ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    /// `<APP_ID>_v<VERSION>.json`.
    pub filename: String,
    /// Pretty-printed JSON.
    pub json: String,
    pub document: QuizDocument,
}

/// Parse a quiz document loosely: missing fields take their defaults, but the
/// input must be a JSON object.
pub fn parse_document(json: &str) -> Result<QuizDocument, ImportError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(ImportError::NotAnObject);
    }
    Ok(serde_json::from_value(value)?)
}

/// Read and parse a quiz document from disk.
pub fn import_file(path: &Path) -> Result<QuizDocument, ImportError> {
    let content = std::fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_document(&content)
}

/// Canonical pretty-printed JSON for a document.
pub fn to_json_pretty(doc: &QuizDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}

/// File name an export of `doc` is saved under.
pub fn export_filename(doc: &QuizDocument) -> String {
    let stem = if doc.app_id.is_empty() {
        "quiz"
    } else {
        doc.app_id.as_str()
    };
    format!("{stem}_v{}.json", doc.version)
}

/// Assemble, validate and serialize the editable document.
pub fn export(doc: &EditorDocument) -> Result<Export, ExportError> {
    let document = assemble(doc);
    let violations = validate_document(&document);
    if !violations.is_empty() {
        return Err(ExportError::Invalid(violations));
    }
    Ok(Export {
        filename: export_filename(&document),
        json: to_json_pretty(&document)?,
        document,
    })
}

/// Export into `dir`, overwriting any previous file of the same name.
pub fn write_export(doc: &EditorDocument, dir: &Path) -> Result<PathBuf, ExportError> {
    let export = export(doc)?;
    let path = dir.join(&export.filename);
    let write = |path: &Path| -> std::io::Result<()> {
        std::fs::create_dir_all(dir)?;
        std::fs::write(path, &export.json)
    };
    write(&path).map_err(|source| ExportError::Write {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), "exported quiz document");
    Ok(path)
}
