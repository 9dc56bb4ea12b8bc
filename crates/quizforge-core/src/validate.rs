//! Export validation.
//!
//! [`validate_document`] collects every reason a document cannot be
//! exported. [`lint_document`] reports softer issues that never block an
//! export.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Assessment, Question, QuizDocument};
use crate::rubric::{compile, describe_error};

/// A reason the document cannot be exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub message: String,
}

impl Violation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A non-blocking issue found while linting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    /// Assessment / question label, when the warning is local to one.
    pub location: Option<String>,
    pub message: String,
}

fn assessment_label(a: &Assessment, index: usize) -> String {
    [&a.title, &a.id]
        .into_iter()
        .find(|s| !s.is_empty())
        .cloned()
        .unwrap_or_else(|| format!("Assessment {}", index + 1))
}

fn question_label(assessment: &str, q: &Question, index: usize) -> String {
    let q_label = if q.id.is_empty() {
        format!("Question {}", index + 1)
    } else {
        q.id.clone()
    };
    format!("{assessment} / {q_label}")
}

/// Check that `doc` is well-formed enough to export.
///
/// All violations are accumulated; an empty list means the document is
/// valid.
pub fn validate_document(doc: &QuizDocument) -> Vec<Violation> {
    let mut violations = Vec::new();

    if doc.app_id.is_empty() {
        violations.push(Violation::new("APP_ID is empty."));
    }
    if doc.version.is_empty() {
        violations.push(Violation::new("VERSION is empty."));
    }
    if doc.assessments.is_empty() {
        violations.push(Violation::new("No assessments defined."));
    }

    for (ai, assessment) in doc.assessments.iter().enumerate() {
        let a_label = assessment_label(assessment, ai);
        if assessment.id.is_empty() {
            violations.push(Violation::new(format!("{a_label}: Assessment ID is empty.")));
        }
        if assessment.questions.is_empty() {
            violations.push(Violation::new(format!("{a_label}: has no questions.")));
        }

        for (qi, q) in assessment.questions.iter().enumerate() {
            let q_label = question_label(&a_label, q, qi);
            if q.id.is_empty() {
                violations.push(Violation::new(format!("{q_label}: Question ID is empty.")));
            }
            if q.kind.is_mc() {
                if q.options.as_ref().map_or(true, |o| o.is_empty()) {
                    violations.push(Violation::new(format!(
                        "{q_label}: MC question has no options."
                    )));
                }
                match q.rubric.len() {
                    1 => {}
                    0 => violations.push(Violation::new(format!(
                        "{q_label}: MC question has no correct answer selected."
                    ))),
                    n => violations.push(Violation::new(format!(
                        "{q_label}: MC question must have exactly one rubric rule (found {n})."
                    ))),
                }
            } else if q.rubric.is_empty() {
                violations.push(Violation::new(format!("{q_label}: has no rubric rules.")));
            }
        }
    }

    violations
}

/// Report issues that do not block export: duplicate ids, an impossible
/// deadline and rubric patterns that will never compile.
pub fn lint_document(doc: &QuizDocument) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Any leap year accepts 29 February.
    if NaiveDate::from_ymd_opt(2024, doc.deadline.month, doc.deadline.day).is_none() {
        warnings.push(ValidationWarning {
            location: None,
            message: format!(
                "deadline day {} / month {} is not a calendar date",
                doc.deadline.day, doc.deadline.month
            ),
        });
    }

    let mut seen_assessments = HashSet::new();
    for (ai, assessment) in doc.assessments.iter().enumerate() {
        let a_label = assessment_label(assessment, ai);
        if !assessment.id.is_empty() && !seen_assessments.insert(assessment.id.as_str()) {
            warnings.push(ValidationWarning {
                location: Some(a_label.clone()),
                message: format!("duplicate assessment ID: {}", assessment.id),
            });
        }

        let mut seen_questions = HashSet::new();
        for (qi, q) in assessment.questions.iter().enumerate() {
            let q_label = question_label(&a_label, q, qi);
            if !q.id.is_empty() && !seen_questions.insert(q.id.as_str()) {
                warnings.push(ValidationWarning {
                    location: Some(q_label.clone()),
                    message: format!("duplicate question ID: {}", q.id),
                });
            }
            for (ri, rule) in q.rubric.iter().enumerate() {
                if let Err(e) = compile(&rule.check, &rule.flags) {
                    warnings.push(ValidationWarning {
                        location: Some(q_label.clone()),
                        message: format!("rule {} pattern is invalid: {}", ri + 1, describe_error(&e)),
                    });
                }
            }
        }
    }

    warnings
}
