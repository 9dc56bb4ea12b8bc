//! Editing commands.
//!
//! Every change to an [`EditorDocument`] goes through a [`Command`], which
//! keeps the document independent of whatever surface renders it. Items are
//! addressed by position; reordering is an explicit move to an index.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::editor::{EditorAssessment, EditorDocument, EditorQuestion, OptionRow, RuleRow};
use crate::error::EditError;
use crate::model::{QuestionType, StandardType, Teacher};

/// Longest id produced by [`suggest_question_id`].
const SUGGESTED_ID_LEN: usize = 40;

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentField {
    AppId(String),
    Version(String),
    Title(String),
    Subtitle(String),
    DeadlineDay(u32),
    DeadlineMonth(u32),
    DeadlineLabel(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TeacherField {
    Id(String),
    Name(String),
    Email(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssessmentField {
    Id(String),
    Title(String),
    Subtitle(String),
    UsNumber(String),
    UsVersion(String),
    Credits(String),
    StandardType(StandardType),
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuestionField {
    Id(String),
    Text(String),
    Image(String),
    Hint(String),
    Kind(QuestionType),
    MaxPoints(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuleField {
    Points(u32),
    Keywords(String),
    Pattern(String),
    Flags(String),
}

/// A discrete edit. `assessment`, `question`, `option` and `rule` are
/// indices into the respective lists.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetDocumentField(DocumentField),

    AddTeacher(Teacher),
    RemoveTeacher { teacher: usize },
    SetTeacherField { teacher: usize, field: TeacherField },

    AddAssessment,
    DuplicateAssessment { assessment: usize },
    RemoveAssessment { assessment: usize },
    MoveAssessment { from: usize, to: usize },
    SetAssessmentField { assessment: usize, field: AssessmentField },

    AddQuestion { assessment: usize },
    DuplicateQuestion { assessment: usize, question: usize },
    RemoveQuestion { assessment: usize, question: usize },
    MoveQuestion { assessment: usize, from: usize, to: usize },
    SetQuestionField { assessment: usize, question: usize, field: QuestionField },
    /// Fill an empty question id from the question text.
    SuggestQuestionId { assessment: usize, question: usize },

    AddOption { assessment: usize, question: usize, text: String },
    RemoveOption { assessment: usize, question: usize, option: usize },
    MoveOption { assessment: usize, question: usize, from: usize, to: usize },
    SetOptionText { assessment: usize, question: usize, option: usize, text: String },
    /// Mark one option correct and clear the others.
    SetCorrectOption { assessment: usize, question: usize, option: usize },

    AddRule { assessment: usize, question: usize },
    RemoveRule { assessment: usize, question: usize, rule: usize },
    MoveRule { assessment: usize, question: usize, from: usize, to: usize },
    SetRuleField { assessment: usize, question: usize, rule: usize, field: RuleField },
}

/// Remove the element at `from` and reinsert it at `to`.
pub fn move_item<T>(items: &mut Vec<T>, kind: &'static str, from: usize, to: usize) -> Result<(), EditError> {
    EditError::check(kind, from, items.len())?;
    EditError::check(kind, to, items.len())?;
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

fn remove_item<T>(items: &mut Vec<T>, kind: &'static str, index: usize) -> Result<T, EditError> {
    EditError::check(kind, index, items.len())?;
    Ok(items.remove(index))
}

fn item_mut<'a, T>(items: &'a mut [T], kind: &'static str, index: usize) -> Result<&'a mut T, EditError> {
    let len = items.len();
    items
        .get_mut(index)
        .ok_or(EditError::OutOfRange { kind, index, len })
}

/// Derive an id from question text: lowercase, runs of anything other than
/// `a-z0-9` collapsed to `_`, trimmed of `_`, at most 40 characters.
pub fn suggest_question_id(text: &str) -> Option<String> {
    let mut slug = String::new();
    let mut pending_sep = false;
    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }
    let slug: String = slug.chars().take(SUGGESTED_ID_LEN).collect();
    (!slug.is_empty()).then_some(slug)
}

fn copy_id(id: &str) -> String {
    format!("{id}_copy")
}

impl EditorDocument {
    fn assessment_mut(&mut self, index: usize) -> Result<&mut EditorAssessment, EditError> {
        item_mut(&mut self.assessments, "assessment", index)
    }

    fn question_mut(&mut self, assessment: usize, question: usize) -> Result<&mut EditorQuestion, EditError> {
        let a = self.assessment_mut(assessment)?;
        item_mut(&mut a.questions, "question", question)
    }

    /// Apply one command and return the updated document.
    pub fn apply(&mut self, command: Command) -> Result<&Self, EditError> {
        tracing::debug!(?command, "applying edit");
        match command {
            Command::SetDocumentField(field) => match field {
                DocumentField::AppId(v) => self.app_id = v,
                DocumentField::Version(v) => self.version = v,
                DocumentField::Title(v) => self.title = v,
                DocumentField::Subtitle(v) => self.subtitle = v,
                DocumentField::DeadlineDay(v) => self.deadline.day = v,
                DocumentField::DeadlineMonth(v) => self.deadline.month = v,
                DocumentField::DeadlineLabel(v) => self.deadline.label = v,
            },

            Command::AddTeacher(teacher) => self.teachers.push(teacher),
            Command::RemoveTeacher { teacher } => {
                remove_item(&mut self.teachers, "teacher", teacher)?;
            }
            Command::SetTeacherField { teacher, field } => {
                let t = item_mut(&mut self.teachers, "teacher", teacher)?;
                match field {
                    TeacherField::Id(v) => t.id = v,
                    TeacherField::Name(v) => t.name = v,
                    TeacherField::Email(v) => t.email = v,
                }
            }

            Command::AddAssessment => self.assessments.push(EditorAssessment::default()),
            Command::DuplicateAssessment { assessment } => {
                let mut copy = self.assessment_mut(assessment)?.clone();
                copy.id = copy_id(&copy.id);
                self.assessments.insert(assessment + 1, copy);
            }
            Command::RemoveAssessment { assessment } => {
                remove_item(&mut self.assessments, "assessment", assessment)?;
            }
            Command::MoveAssessment { from, to } => {
                move_item(&mut self.assessments, "assessment", from, to)?;
            }
            Command::SetAssessmentField { assessment, field } => {
                let a = self.assessment_mut(assessment)?;
                match field {
                    AssessmentField::Id(v) => a.id = v,
                    AssessmentField::Title(v) => a.title = v,
                    AssessmentField::Subtitle(v) => a.subtitle = v,
                    AssessmentField::UsNumber(v) => a.us_number = v,
                    AssessmentField::UsVersion(v) => a.us_version = v,
                    AssessmentField::Credits(v) => a.credits = v,
                    AssessmentField::StandardType(v) => a.standard_type = v,
                }
            }

            Command::AddQuestion { assessment } => {
                self.assessment_mut(assessment)?
                    .questions
                    .push(EditorQuestion::new());
            }
            Command::DuplicateQuestion {
                assessment,
                question,
            } => {
                let a = self.assessment_mut(assessment)?;
                let mut copy = item_mut(&mut a.questions, "question", question)?.clone();
                copy.id = copy_id(&copy.id);
                a.questions.insert(question + 1, copy);
            }
            Command::RemoveQuestion {
                assessment,
                question,
            } => {
                let a = self.assessment_mut(assessment)?;
                remove_item(&mut a.questions, "question", question)?;
            }
            Command::MoveQuestion {
                assessment,
                from,
                to,
            } => {
                let a = self.assessment_mut(assessment)?;
                move_item(&mut a.questions, "question", from, to)?;
            }
            Command::SetQuestionField {
                assessment,
                question,
                field,
            } => {
                let q = self.question_mut(assessment, question)?;
                match field {
                    QuestionField::Id(v) => q.id = v,
                    QuestionField::Text(v) => q.text = v,
                    QuestionField::Image(v) => q.image = v,
                    QuestionField::Hint(v) => q.hint = v,
                    QuestionField::Kind(v) => q.kind = v,
                    QuestionField::MaxPoints(v) => q.max_points = v,
                }
            }
            Command::SuggestQuestionId {
                assessment,
                question,
            } => {
                let q = self.question_mut(assessment, question)?;
                if q.id.trim().is_empty() {
                    q.id = suggest_question_id(&q.text).unwrap_or_else(|| {
                        format!("q{}", chrono::Utc::now().timestamp_millis())
                    });
                }
            }

            Command::AddOption {
                assessment,
                question,
                text,
            } => {
                self.question_mut(assessment, question)?
                    .options
                    .push(OptionRow {
                        text,
                        correct: false,
                    });
            }
            Command::RemoveOption {
                assessment,
                question,
                option,
            } => {
                let q = self.question_mut(assessment, question)?;
                remove_item(&mut q.options, "option", option)?;
            }
            Command::MoveOption {
                assessment,
                question,
                from,
                to,
            } => {
                let q = self.question_mut(assessment, question)?;
                move_item(&mut q.options, "option", from, to)?;
            }
            Command::SetOptionText {
                assessment,
                question,
                option,
                text,
            } => {
                let q = self.question_mut(assessment, question)?;
                item_mut(&mut q.options, "option", option)?.text = text;
            }
            Command::SetCorrectOption {
                assessment,
                question,
                option,
            } => {
                let q = self.question_mut(assessment, question)?;
                EditError::check("option", option, q.options.len())?;
                for (i, row) in q.options.iter_mut().enumerate() {
                    row.correct = i == option;
                }
            }

            Command::AddRule {
                assessment,
                question,
            } => {
                self.question_mut(assessment, question)?
                    .rules
                    .push(RuleRow::default());
            }
            Command::RemoveRule {
                assessment,
                question,
                rule,
            } => {
                let q = self.question_mut(assessment, question)?;
                remove_item(&mut q.rules, "rule", rule)?;
            }
            Command::MoveRule {
                assessment,
                question,
                from,
                to,
            } => {
                let q = self.question_mut(assessment, question)?;
                move_item(&mut q.rules, "rule", from, to)?;
            }
            Command::SetRuleField {
                assessment,
                question,
                rule,
                field,
            } => {
                let q = self.question_mut(assessment, question)?;
                let r = item_mut(&mut q.rules, "rule", rule)?;
                match field {
                    RuleField::Points(v) => r.points = v,
                    RuleField::Keywords(v) => r.keywords = v,
                    RuleField::Pattern(v) => r.pattern = v,
                    RuleField::Flags(v) => r.flags = v,
                }
            }
        }
        Ok(self)
    }

    /// Shuffle a question's options in place (Fisher–Yates). The correct
    /// marker travels with its option.
    pub fn shuffle_options<R: Rng + ?Sized>(
        &mut self,
        assessment: usize,
        question: usize,
        rng: &mut R,
    ) -> Result<&Self, EditError> {
        let q = self.question_mut(assessment, question)?;
        q.options.shuffle(rng);
        Ok(self)
    }
}
