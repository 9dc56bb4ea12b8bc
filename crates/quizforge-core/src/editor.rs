//! Editable document representation and assembly.
//!
//! The editor keeps what an author actually typed: raw credit text, option
//! rows with a "correct" marker, and rubric rows that hold a keyword list
//! and/or an advanced pattern. [`assemble`] maps this onto the canonical
//! [`QuizDocument`]; [`load`] goes the other way. Assembling a loaded
//! document reproduces the same canonical structure.

use crate::model::{
    Assessment, Deadline, Question, QuestionType, QuizDocument, RubricRule, StandardType,
    Teacher, DEFAULT_FLAGS, DEFAULT_IMAGE,
};
use crate::rubric::{escape_literal, keyword_alternation, sanitize_flags};

/// The document being edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorDocument {
    pub app_id: String,
    pub version: String,
    pub title: String,
    pub subtitle: String,
    pub deadline: Deadline,
    pub teachers: Vec<Teacher>,
    pub assessments: Vec<EditorAssessment>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorAssessment {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub us_number: String,
    pub us_version: String,
    /// Credits as typed; blank or non-numeric text exports as `null`.
    pub credits: String,
    pub standard_type: StandardType,
    pub questions: Vec<EditorQuestion>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorQuestion {
    pub id: String,
    pub text: String,
    pub image: String,
    pub hint: String,
    pub kind: QuestionType,
    pub max_points: u32,
    /// Multiple-choice rows. At most one is marked correct.
    pub options: Vec<OptionRow>,
    /// Rubric rows used by short and long questions.
    pub rules: Vec<RuleRow>,
}

/// One multiple-choice option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionRow {
    pub text: String,
    pub correct: bool,
}

/// One authored rubric rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRow {
    pub points: u32,
    /// Comma-separated keywords; the rule matches if any appears.
    pub keywords: String,
    /// Advanced pattern, used unescaped. Takes precedence over keywords.
    pub pattern: String,
    pub flags: String,
}

impl Default for RuleRow {
    fn default() -> Self {
        Self {
            points: 1,
            keywords: String::new(),
            pattern: String::new(),
            flags: DEFAULT_FLAGS.to_string(),
        }
    }
}

impl RuleRow {
    /// The pattern that drives scoring: the advanced pattern when present,
    /// otherwise the escaped keyword alternation.
    pub fn primary_pattern(&self) -> Option<String> {
        let pattern = self.pattern.trim();
        if !pattern.is_empty() {
            return Some(pattern.to_string());
        }
        keyword_alternation(self.keywords.trim())
    }

    pub fn has_custom_pattern(&self) -> bool {
        !self.pattern.trim().is_empty()
    }

    /// Assemble into a canonical rule, if the row defines any pattern.
    pub fn to_rule(&self) -> Option<RubricRule> {
        self.primary_pattern().map(|check| RubricRule {
            points: self.points.max(1),
            check,
            flags: sanitize_flags(&self.flags),
        })
    }
}

impl Default for EditorQuestion {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorQuestion {
    /// A fresh question: multiple choice, one empty option and one default
    /// rubric row.
    pub fn new() -> Self {
        Self {
            id: String::new(),
            text: String::new(),
            image: DEFAULT_IMAGE.to_string(),
            hint: String::new(),
            kind: QuestionType::Mc,
            max_points: 1,
            options: vec![OptionRow::default()],
            rules: vec![RuleRow::default()],
        }
    }

    /// The option marked correct, if any.
    pub fn correct_option(&self) -> Option<&OptionRow> {
        self.options.iter().find(|o| o.correct)
    }

    pub fn max_points(&self) -> u32 {
        self.max_points.max(1)
    }

    /// Rubric as exported. For multiple choice the single rule is rebuilt
    /// from the current correct option every time.
    pub fn rubric(&self) -> Vec<RubricRule> {
        if self.kind.is_mc() {
            self.correct_option()
                .map(|o| o.text.trim())
                .filter(|t| !t.is_empty())
                .map(|text| RubricRule {
                    points: self.max_points(),
                    check: escape_literal(text),
                    flags: DEFAULT_FLAGS.to_string(),
                })
                .into_iter()
                .collect()
        } else {
            self.rules.iter().filter_map(RuleRow::to_rule).collect()
        }
    }

    fn assemble(&self) -> Question {
        let image = self.image.trim();
        let options: Option<Vec<String>> = self.kind.is_mc().then(|| {
            self.options
                .iter()
                .map(|o| o.text.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        });

        Question {
            id: self.id.trim().to_string(),
            text: self.text.clone(),
            image: if image.is_empty() {
                DEFAULT_IMAGE.to_string()
            } else {
                image.to_string()
            },
            hint: self.hint.trim().to_string(),
            kind: self.kind,
            max_points: self.max_points(),
            rubric: self.rubric(),
            options,
        }
    }

    fn load(q: &Question) -> Self {
        let image = if q.image.trim().is_empty() {
            DEFAULT_IMAGE.to_string()
        } else {
            q.image.clone()
        };

        let (options, rules) = if q.kind.is_mc() {
            let texts = q.options.as_deref().unwrap_or_default();
            let correct = q
                .rubric
                .first()
                .and_then(|r| recover_correct_option(texts, &r.check));
            let options: Vec<OptionRow> = texts
                .iter()
                .enumerate()
                .map(|(i, text)| OptionRow {
                    text: text.clone(),
                    correct: Some(i) == correct,
                })
                .collect();
            (options, Vec::new())
        } else {
            let rules: Vec<RuleRow> = q
                .rubric
                .iter()
                .map(|r| RuleRow {
                    points: r.points.max(1),
                    keywords: String::new(),
                    pattern: r.check.clone(),
                    flags: r.flags.clone(),
                })
                .collect();
            (Vec::new(), rules)
        };

        Self {
            id: q.id.clone(),
            text: q.text.clone(),
            image,
            hint: q.hint.clone(),
            kind: q.kind,
            max_points: q.max_points.max(1),
            options,
            rules,
        }
    }
}

/// Best-effort recovery of which option a stored multiple-choice check was
/// built from: an exact escaped match first, then the first option whose
/// text appears (case-insensitively) inside the check.
fn recover_correct_option(options: &[String], check: &str) -> Option<usize> {
    if check.is_empty() {
        return None;
    }
    if let Some(i) = options
        .iter()
        .position(|o| !o.trim().is_empty() && escape_literal(o.trim()) == check)
    {
        return Some(i);
    }
    let check = check.to_lowercase();
    options
        .iter()
        .position(|o| !o.trim().is_empty() && check.contains(&o.trim().to_lowercase()))
}

impl EditorAssessment {
    fn assemble(&self) -> Assessment {
        Assessment {
            id: self.id.trim().to_string(),
            title: self.title.trim().to_string(),
            subtitle: self.subtitle.trim().to_string(),
            us_number: self.us_number.trim().to_string(),
            us_version: self.us_version.trim().to_string(),
            credits: parse_credits(&self.credits),
            standard_type: self.standard_type,
            questions: self.questions.iter().map(EditorQuestion::assemble).collect(),
        }
    }

    fn load(a: &Assessment) -> Self {
        Self {
            id: a.id.clone(),
            title: a.title.clone(),
            subtitle: a.subtitle.clone(),
            us_number: a.us_number.clone(),
            us_version: a.us_version.clone(),
            credits: a.credits.map(|c| c.to_string()).unwrap_or_default(),
            standard_type: a.standard_type,
            questions: a.questions.iter().map(EditorQuestion::load).collect(),
        }
    }
}

fn parse_credits(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|c| *c > 0)
}

impl EditorDocument {
    /// The document a fresh session starts with when no draft exists.
    pub fn starter() -> Self {
        Self {
            app_id: "QUIZ".to_string(),
            version: "1".to_string(),
            title: "New Quiz".to_string(),
            subtitle: String::new(),
            deadline: Deadline {
                label: "Submission deadline".to_string(),
                ..Deadline::default()
            },
            teachers: Vec::new(),
            assessments: vec![EditorAssessment::default()],
        }
    }

    /// Locate a question by assessment and question id.
    pub fn find_question(&self, assessment_id: &str, question_id: &str) -> Option<&EditorQuestion> {
        self.assessments
            .iter()
            .filter(|a| a.id.trim() == assessment_id)
            .flat_map(|a| a.questions.iter())
            .find(|q| q.id.trim() == question_id)
    }
}

/// Map the editable document onto its canonical exportable form.
pub fn assemble(doc: &EditorDocument) -> QuizDocument {
    QuizDocument {
        app_id: doc.app_id.trim().to_string(),
        version: doc.version.trim().to_string(),
        title: doc.title.trim().to_string(),
        subtitle: doc.subtitle.trim().to_string(),
        deadline: Deadline {
            day: doc.deadline.day.max(1),
            month: doc.deadline.month.max(1),
            label: doc.deadline.label.trim().to_string(),
        },
        teachers: doc
            .teachers
            .iter()
            .map(|t| Teacher {
                id: t.id.trim().to_string(),
                name: t.name.trim().to_string(),
                email: t.email.trim().to_string(),
            })
            .collect(),
        assessments: doc
            .assessments
            .iter()
            .map(EditorAssessment::assemble)
            .collect(),
    }
}

/// Rebuild editable state from a canonical document, applying defaults for
/// anything missing.
pub fn load(doc: &QuizDocument) -> EditorDocument {
    EditorDocument {
        app_id: doc.app_id.clone(),
        version: doc.version.clone(),
        title: doc.title.clone(),
        subtitle: doc.subtitle.clone(),
        deadline: Deadline {
            day: doc.deadline.day.max(1),
            month: doc.deadline.month.max(1),
            label: doc.deadline.label.clone(),
        },
        teachers: doc.teachers.clone(),
        assessments: doc.assessments.iter().map(EditorAssessment::load).collect(),
    }
}

impl From<&Question> for EditorQuestion {
    fn from(q: &Question) -> Self {
        EditorQuestion::load(q)
    }
}
