//! Rubric evaluator.
//!
//! Scores a free-text sample answer against a question's grading setup and
//! explains the result rule by rule. Evaluation is a pure function of its
//! inputs.

use serde::{Deserialize, Serialize};

use crate::editor::{EditorQuestion, RuleRow};
use crate::error::EvaluationError;
use crate::model::{Question, DEFAULT_FLAGS};
use crate::rubric::{compile, describe_error, escape_literal, keyword_alternation, split_keywords};

/// Result of scoring one sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub earned_points: u32,
    pub possible_points: u32,
    /// One explanatory line per rule (one line in total for multiple choice).
    pub per_rule_details: Vec<String>,
    /// Keyword hit counts across all rules, for information only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_stats: Option<KeywordStats>,
}

/// How many individual keywords were found, out of how many.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordStats {
    pub hits: u32,
    pub total: u32,
}

impl KeywordStats {
    fn add(&mut self, other: KeywordStats) {
        self.hits = self.hits.saturating_add(other.hits);
        self.total = self.total.saturating_add(other.total);
    }
}

impl Evaluation {
    /// Human-readable report, one detail per line.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Score for this sample: {} / {}.",
            self.earned_points, self.possible_points
        );
        if let Some(stats) = &self.keyword_stats {
            out.push_str(&format!(
                "\nTotal keyword matches (for info only): {} / {} across all rules.",
                stats.hits, stats.total
            ));
        }
        for line in &self.per_rule_details {
            out.push('\n');
            out.push_str(line);
        }
        out
    }
}

/// Score `sample` against an editable question.
pub fn evaluate(question: &EditorQuestion, sample: &str) -> Result<Evaluation, EvaluationError> {
    let sample = sample.trim();
    if sample.is_empty() {
        return Err(EvaluationError::EmptySample);
    }

    let evaluation = if question.kind.is_mc() {
        evaluate_mc(question, sample)?
    } else {
        evaluate_rules(&question.rules, sample)?
    };

    tracing::debug!(
        question = %question.id,
        earned = evaluation.earned_points,
        possible = evaluation.possible_points,
        "evaluated sample"
    );
    Ok(evaluation)
}

/// Score `sample` against an exported question.
pub fn evaluate_question(question: &Question, sample: &str) -> Result<Evaluation, EvaluationError> {
    evaluate(&EditorQuestion::from(question), sample)
}

fn evaluate_mc(question: &EditorQuestion, sample: &str) -> Result<Evaluation, EvaluationError> {
    let correct = question
        .correct_option()
        .ok_or(EvaluationError::NoCorrectOption)?;
    let text = correct.text.trim();
    if text.is_empty() {
        return Err(EvaluationError::EmptyCorrectOption);
    }

    let max = question.max_points();
    let (earned, detail) = match compile(&escape_literal(text), DEFAULT_FLAGS) {
        Ok(re) if re.is_match(sample) => (max, format!("Matched correct option text: \"{text}\".")),
        Ok(_) => (
            0,
            format!("Did not find the correct option text. Sample must contain: \"{text}\"."),
        ),
        Err(e) => (
            0,
            format!(
                "Error in generated pattern for the correct option: {}.",
                describe_error(&e)
            ),
        ),
    };

    Ok(Evaluation {
        earned_points: earned,
        possible_points: max,
        per_rule_details: vec![detail],
        keyword_stats: None,
    })
}

fn evaluate_rules(rules: &[RuleRow], sample: &str) -> Result<Evaluation, EvaluationError> {
    if rules.is_empty() {
        return Err(EvaluationError::NoRubricRules);
    }

    let mut earned: u32 = 0;
    let mut possible: u32 = 0;
    let mut details = Vec::with_capacity(rules.len());
    let mut stats = KeywordStats::default();

    for (idx, rule) in rules.iter().enumerate() {
        let n = idx + 1;
        let points = rule.points.max(1);
        let keywords = rule.keywords.trim();

        let (mut detail, scored) = if rule.has_custom_pattern() {
            match compile(rule.pattern.trim(), &rule.flags) {
                Ok(re) if re.is_match(sample) => (
                    format!("Rule {n}: advanced pattern matched (+{points})."),
                    Some(true),
                ),
                Ok(_) => (
                    format!("Rule {n}: advanced pattern did not match."),
                    Some(false),
                ),
                Err(e) => (
                    format!("Rule {n}: invalid advanced pattern ({}).", describe_error(&e)),
                    None,
                ),
            }
        } else if let Some(pattern) = keyword_alternation(keywords) {
            let parts = split_keywords(keywords).join(", ");
            match compile(&pattern, &rule.flags) {
                Ok(re) if re.is_match(sample) => (
                    format!("Rule {n}: matched at least one of [{parts}] (+{points})."),
                    Some(true),
                ),
                Ok(_) => (
                    format!("Rule {n}: none of [{parts}] were found."),
                    Some(false),
                ),
                Err(e) => (
                    format!(
                        "Rule {n}: invalid pattern generated from keywords ({}).",
                        describe_error(&e)
                    ),
                    None,
                ),
            }
        } else if !keywords.is_empty() {
            (format!("Rule {n}: no keywords defined."), None)
        } else {
            (format!("Rule {n}: skipped (no keywords or pattern)."), None)
        };

        if let Some(matched) = scored {
            possible = possible.saturating_add(points);
            if matched {
                earned = earned.saturating_add(points);
            }
        }

        let hits = count_keyword_hits(keywords, &rule.flags, sample);
        if hits.total > 0 {
            detail.push_str(&format!(" Keywords matched {}/{}.", hits.hits, hits.total));
            stats.add(hits);
        }

        details.push(detail);
    }

    Ok(Evaluation {
        earned_points: earned,
        possible_points: possible,
        per_rule_details: details,
        keyword_stats: (stats.total > 0).then_some(stats),
    })
}

/// Count keywords that individually appear in `sample`.
///
/// Empty `flags` count case-insensitively, unlike scoring.
pub fn count_keyword_hits(keywords: &str, flags: &str, sample: &str) -> KeywordStats {
    let flags = if flags.is_empty() { DEFAULT_FLAGS } else { flags };
    let parts = split_keywords(keywords);
    let hits = parts
        .iter()
        .filter(|p| {
            compile(&escape_literal(p), flags)
                .map(|re| re.is_match(sample))
                .unwrap_or(false)
        })
        .count();
    KeywordStats {
        hits: u32::try_from(hits).unwrap_or(u32::MAX),
        total: u32::try_from(parts.len()).unwrap_or(u32::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::OptionRow;
    use crate::model::{QuestionType, RubricRule};

    fn mc(options: &[(&str, bool)], max_points: u32) -> EditorQuestion {
        EditorQuestion {
            kind: QuestionType::Mc,
            max_points,
            options: options
                .iter()
                .map(|(text, correct)| OptionRow {
                    text: text.to_string(),
                    correct: *correct,
                })
                .collect(),
            ..EditorQuestion::new()
        }
    }

    fn short(rules: Vec<RuleRow>) -> EditorQuestion {
        EditorQuestion {
            kind: QuestionType::Short,
            rules,
            ..EditorQuestion::new()
        }
    }

    fn keywords(points: u32, list: &str) -> RuleRow {
        RuleRow {
            points,
            keywords: list.into(),
            ..RuleRow::default()
        }
    }

    fn pattern(points: u32, pattern: &str, flags: &str) -> RuleRow {
        RuleRow {
            points,
            pattern: pattern.into(),
            flags: flags.into(),
            ..RuleRow::default()
        }
    }

    #[test]
    fn empty_sample_needs_input() {
        let q = short(vec![keywords(1, "a")]);
        assert_eq!(evaluate(&q, "   \n"), Err(EvaluationError::EmptySample));
    }

    #[test]
    fn mc_full_points_in_any_case() {
        let q = mc(&[("Safety glasses", true), ("Gloves", false)], 3);
        let e = evaluate(&q, "I would put on SAFETY GLASSES first").unwrap();
        assert_eq!((e.earned_points, e.possible_points), (3, 3));
        assert!(e.per_rule_details[0].contains("Matched"));
    }

    #[test]
    fn mc_wrong_option_scores_zero() {
        let q = mc(&[("Safety glasses", true), ("Gloves", false)], 2);
        let e = evaluate(&q, "I would wear gloves").unwrap();
        assert_eq!((e.earned_points, e.possible_points), (0, 2));
        assert_eq!(e.per_rule_details.len(), 1);
        assert!(e.per_rule_details[0].contains("Safety glasses"));
    }

    #[test]
    fn mc_metacharacters_match_literally() {
        let q = mc(&[("3.5 m (min)", true)], 1);
        assert_eq!(evaluate(&q, "about 3.5 m (min)").unwrap().earned_points, 1);
        assert_eq!(evaluate(&q, "about 3x5 m min").unwrap().earned_points, 0);
    }

    #[test]
    fn mc_without_correct_option_fails() {
        let q = mc(&[("A", false), ("B", false)], 1);
        assert_eq!(evaluate(&q, "A"), Err(EvaluationError::NoCorrectOption));

        let q = mc(&[("  ", true)], 1);
        assert_eq!(evaluate(&q, "A"), Err(EvaluationError::EmptyCorrectOption));
    }

    #[test]
    fn keyword_rule_example() {
        let q = short(vec![keywords(2, "eye injury, blindness")]);
        let e = evaluate(&q, "He suffered an eye injury.").unwrap();
        assert_eq!((e.earned_points, e.possible_points), (2, 2));
        assert_eq!(e.keyword_stats, Some(KeywordStats { hits: 1, total: 2 }));
        assert!(e.per_rule_details[0].contains("Keywords matched 1/2"));
    }

    #[test]
    fn keyword_rule_matches_any_part() {
        let q = short(vec![keywords(1, "alpha, beta, gamma")]);
        for (sample, expected) in [
            ("only GAMMA here", 1),
            ("Beta", 1),
            ("alphabet soup", 1),
            ("delta", 0),
        ] {
            assert_eq!(evaluate(&q, sample).unwrap().earned_points, expected, "{sample}");
        }

        let case_sensitive = short(vec![RuleRow {
            flags: String::new(),
            ..keywords(1, "alpha")
        }]);
        assert_eq!(evaluate(&case_sensitive, "ALPHA").unwrap().earned_points, 0);
    }

    #[test]
    fn empty_flags_still_count_keywords_case_insensitively() {
        let q = short(vec![RuleRow {
            flags: String::new(),
            ..keywords(1, "alpha, beta")
        }]);
        let e = evaluate(&q, "ALPHA").unwrap();
        assert_eq!(e.earned_points, 0);
        assert_eq!(e.keyword_stats, Some(KeywordStats { hits: 1, total: 2 }));
        assert_eq!(
            count_keyword_hits("alpha", "", "ALPHA"),
            KeywordStats { hits: 1, total: 1 }
        );
    }

    #[test]
    fn huge_points_saturate_instead_of_overflowing() {
        let q = short(vec![keywords(u32::MAX, "a"), keywords(2, "a"), keywords(3, "zzz")]);
        let e = evaluate(&q, "a").unwrap();
        assert_eq!(e.earned_points, u32::MAX);
        assert_eq!(e.possible_points, u32::MAX);
        assert!(e.earned_points <= e.possible_points);
    }

    #[test]
    fn totals_sum_over_rules() {
        let q = short(vec![
            keywords(2, "hazard"),
            pattern(3, r"\brisk\b", "i"),
            keywords(4, "control"),
        ]);
        let e = evaluate(&q, "The hazard is a real RISK.").unwrap();
        assert_eq!(e.earned_points, 5);
        assert_eq!(e.possible_points, 9);
        assert!(e.earned_points <= e.possible_points);
        assert_eq!(e.per_rule_details.len(), 3);
    }

    #[test]
    fn invalid_pattern_does_not_stop_other_rules() {
        let q = short(vec![pattern(5, "(unclosed", "i"), keywords(2, "dust")]);
        let e = evaluate(&q, "dust everywhere").unwrap();
        assert_eq!((e.earned_points, e.possible_points), (2, 2));
        assert!(e.per_rule_details[0].contains("invalid advanced pattern"));
        assert!(e.per_rule_details[1].contains("+2"));
    }

    #[test]
    fn custom_pattern_drives_scoring_over_keywords() {
        let rule = RuleRow {
            points: 2,
            keywords: "noise, hearing".into(),
            pattern: "ear ?muffs".into(),
            flags: "i".into(),
        };
        let q = short(vec![rule]);

        let e = evaluate(&q, "Loud noise can damage hearing").unwrap();
        assert_eq!((e.earned_points, e.possible_points), (0, 2));
        assert_eq!(e.keyword_stats, Some(KeywordStats { hits: 2, total: 2 }));

        let e = evaluate(&q, "Wear earmuffs").unwrap();
        assert_eq!(e.earned_points, 2);
        assert_eq!(e.keyword_stats, Some(KeywordStats { hits: 0, total: 2 }));
    }

    #[test]
    fn empty_rules_are_reported_not_scored() {
        let q = short(vec![RuleRow::default(), keywords(3, " , ,")]);
        let e = evaluate(&q, "anything").unwrap();
        assert_eq!((e.earned_points, e.possible_points), (0, 0));
        assert!(e.per_rule_details[0].contains("skipped"));
        assert!(e.per_rule_details[1].contains("no keywords"));
        assert_eq!(e.keyword_stats, None);
    }

    #[test]
    fn no_rules_fails() {
        let q = short(vec![]);
        assert_eq!(evaluate(&q, "x"), Err(EvaluationError::NoRubricRules));
    }

    #[test]
    fn deterministic_output() {
        let q = short(vec![keywords(1, "a, b"), pattern(2, "c.d", "s")]);
        let first = evaluate(&q, "a c\nd").unwrap();
        for _ in 0..10 {
            assert_eq!(evaluate(&q, "a c\nd").unwrap(), first);
        }
        assert_eq!(first.earned_points, 3);
    }

    #[test]
    fn exported_question_is_gradable() {
        let q = Question {
            kind: QuestionType::Long,
            rubric: vec![RubricRule {
                points: 2,
                check: "(?:guard|shield)".into(),
                flags: "i".into(),
            }],
            ..Question::default()
        };
        let e = evaluate_question(&q, "Keep the GUARD in place").unwrap();
        assert_eq!((e.earned_points, e.possible_points), (2, 2));
    }

    #[test]
    fn summary_lists_score_stats_and_details() {
        let q = short(vec![keywords(2, "eye injury, blindness")]);
        let summary = evaluate(&q, "blindness").unwrap().summary();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines[0], "Score for this sample: 2 / 2.");
        assert!(lines[1].contains("1 / 2 across all rules"));
        assert!(lines[2].starts_with("Rule 1:"));
    }
}
