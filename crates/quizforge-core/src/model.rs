//! Canonical quiz document types.
//!
//! These are the exportable structures consumed by the quiz front end. Field
//! order and wire names are fixed so that the serialized JSON is stable.
//! Imports stay loose: missing or `null` data is filled in rather than
//! rejected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Image filename used when a question has no picture.
pub const DEFAULT_IMAGE: &str = "blank.jpg";

/// Flags given to rules that do not specify any.
pub const DEFAULT_FLAGS: &str = "i";

/// The complete exported quiz definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizDocument {
    /// Application identifier, also the export filename stem.
    #[serde(rename = "APP_ID", default, deserialize_with = "lenient::string")]
    pub app_id: String,
    /// Release version of the quiz.
    #[serde(rename = "VERSION", default, deserialize_with = "lenient::string")]
    pub version: String,
    #[serde(rename = "APP_TITLE", default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(rename = "APP_SUBTITLE", default, deserialize_with = "lenient::string")]
    pub subtitle: String,
    /// Submission deadline shown to students.
    #[serde(rename = "DEADLINE", default, deserialize_with = "lenient::or_default")]
    pub deadline: Deadline,
    #[serde(rename = "TEACHERS", default, deserialize_with = "lenient::or_default")]
    pub teachers: Vec<Teacher>,
    #[serde(rename = "ASSESSMENTS", default, deserialize_with = "lenient::or_default")]
    pub assessments: Vec<Assessment>,
}

/// Day and month of the submission deadline (the year is implied).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    #[serde(default = "default_one", deserialize_with = "lenient::positive_or_one")]
    pub day: u32,
    #[serde(default = "default_one", deserialize_with = "lenient::positive_or_one")]
    pub month: u32,
    #[serde(default, deserialize_with = "lenient::string")]
    pub label: String,
}

impl Default for Deadline {
    fn default() -> Self {
        Self {
            day: 1,
            month: 1,
            label: String::new(),
        }
    }
}

/// A teacher students can submit to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
}

/// One assessment: a unit standard and its questions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub us_number: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub us_version: String,
    /// Credit value; `None` when left blank.
    #[serde(default, deserialize_with = "lenient::positive")]
    pub credits: Option<u32>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub standard_type: StandardType,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub questions: Vec<Question>,
}

/// Whether an assessment is internally or externally assessed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum StandardType {
    #[default]
    #[serde(rename = "")]
    Unspecified,
    #[serde(rename = "internal")]
    Internal,
    #[serde(rename = "external")]
    External,
}

impl From<String> for StandardType {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "internal" => StandardType::Internal,
            "external" => StandardType::External,
            _ => StandardType::Unspecified,
        }
    }
}

impl fmt::Display for StandardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StandardType::Unspecified => write!(f, ""),
            StandardType::Internal => write!(f, "internal"),
            StandardType::External => write!(f, "external"),
        }
    }
}

/// A single question in an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    /// Question text; may contain line breaks.
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: String,
    #[serde(default = "default_image", deserialize_with = "lenient::image")]
    pub image: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub hint: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::or_default")]
    pub kind: QuestionType,
    #[serde(default = "default_one", deserialize_with = "lenient::positive_or_one")]
    pub max_points: u32,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub rubric: Vec<RubricRule>,
    /// Answer options, present only for multiple-choice questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl Default for Question {
    fn default() -> Self {
        Self {
            id: String::new(),
            text: String::new(),
            image: default_image(),
            hint: String::new(),
            kind: QuestionType::default(),
            max_points: 1,
            rubric: Vec::new(),
            options: None,
        }
    }
}

/// How a question is answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum QuestionType {
    /// Multiple choice, graded against the correct option's text.
    #[default]
    Mc,
    /// Short free-text answer graded by rubric rules.
    Short,
    /// Long free-text answer graded by rubric rules.
    Long,
}

impl QuestionType {
    pub fn is_mc(self) -> bool {
        self == QuestionType::Mc
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Mc => write!(f, "mc"),
            QuestionType::Short => write!(f, "short"),
            QuestionType::Long => write!(f, "long"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mc" => Ok(QuestionType::Mc),
            "short" => Ok(QuestionType::Short),
            "long" => Ok(QuestionType::Long),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

// Unknown types fall back to the editor's first choice.
impl From<String> for QuestionType {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

/// A scored pattern-match condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricRule {
    #[serde(default = "default_one", deserialize_with = "lenient::positive_or_one")]
    pub points: u32,
    /// Pattern tested against the answer.
    #[serde(default, deserialize_with = "lenient::string")]
    pub check: String,
    /// Matching-mode flags, see [`crate::rubric::sanitize_flags`].
    #[serde(default = "default_flags", deserialize_with = "lenient::flags")]
    pub flags: String,
}

fn default_one() -> u32 {
    1
}

fn default_image() -> String {
    DEFAULT_IMAGE.to_string()
}

fn default_flags() -> String {
    DEFAULT_FLAGS.to_string()
}

/// Field deserializers that coerce rather than reject. `null` takes the
/// field's default; counts accept numeric strings and fall back below 1.
mod lenient {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(D::Error::custom(format!("expected a string, found {other}"))),
        }
    }

    pub fn image<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        let image = string(d)?;
        Ok(if image.trim().is_empty() {
            super::default_image()
        } else {
            image
        })
    }

    pub fn flags<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(super::default_flags()),
            Value::String(s) => Ok(s),
            other => Err(D::Error::custom(format!("expected flags, found {other}"))),
        }
    }

    /// A positive count, or `None` for anything blank, zero, negative or
    /// non-numeric. Values past `u32::MAX` saturate.
    pub fn positive<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        let n = match Value::deserialize(d)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => leading_integer(&s),
            _ => None,
        };
        Ok(n.filter(|n| *n > 0)
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX)))
    }

    pub fn positive_or_one<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        Ok(positive(d)?.unwrap_or(1))
    }

    /// Integer prefix of `s` after leading whitespace: `" 12pt"` is 12.
    fn leading_integer(s: &str) -> Option<i64> {
        let s = s.trim_start();
        let digits_from = usize::from(s.starts_with(['-', '+']));
        let end = s[digits_from..]
            .find(|c: char| !c.is_ascii_digit())
            .map_or(s.len(), |i| i + digits_from);
        if end == digits_from {
            return None;
        }
        match s[..end].parse::<i64>() {
            Ok(n) => Some(n),
            // Too many digits for i64: keep the sign, saturate later.
            Err(_) => Some(if s.starts_with('-') { i64::MIN } else { i64::MAX }),
        }
    }
}
