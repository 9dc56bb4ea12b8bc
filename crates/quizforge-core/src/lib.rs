//! Quiz document model, rubric evaluation and export.
//!
//! This crate defines the canonical quiz document, the editable form it is
//! authored in, and the rubric engine that scores free-text answers.

pub mod commands;
pub mod editor;
pub mod error;
pub mod evaluator;
pub mod export;
pub mod model;
pub mod rubric;
pub mod store;
pub mod validate;
