//! Pattern building blocks for rubric rules.
//!
//! Flags follow the JavaScript convention used by the quiz front end
//! (`g i m s u y`) and are translated onto [`regex::RegexBuilder`] options
//! here. Literal text is escaped with the same metacharacter set the front
//! end uses, so exported patterns stay portable.

use regex::{Regex, RegexBuilder};

/// Recognized flag characters, in canonical output order.
pub const RECOGNIZED_FLAGS: &str = "gimsuy";

/// Characters escaped when turning literal text into a pattern.
const METACHARACTERS: &[char] = &[
    '.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];

/// Restrict `flags` to the recognized set, deduplicated and in canonical
/// order. Unknown characters are dropped.
pub fn sanitize_flags(flags: &str) -> String {
    RECOGNIZED_FLAGS
        .chars()
        .filter(|f| flags.contains(*f))
        .collect()
}

/// Escape regex metacharacters so `text` matches literally.
pub fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if METACHARACTERS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Split a comma-separated keyword list into trimmed, non-empty parts.
pub fn split_keywords(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build the escaped alternation `(?:a|b|c)` for a keyword list.
///
/// Returns `None` when the list has no usable keywords.
pub fn keyword_alternation(list: &str) -> Option<String> {
    let parts = split_keywords(list);
    if parts.is_empty() {
        return None;
    }
    let escaped: Vec<String> = parts.iter().map(|p| escape_literal(p)).collect();
    Some(format!("(?:{})", escaped.join("|")))
}

/// Compile `pattern` with JavaScript-style `flags`.
///
/// `y` (sticky) anchors the match at the start of the input; `g` has no
/// effect on a single test and `u` is always on.
pub fn compile(pattern: &str, flags: &str) -> Result<Regex, regex::Error> {
    let flags = sanitize_flags(flags);
    let build = |source: &str| {
        RegexBuilder::new(source)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .dot_matches_new_line(flags.contains('s'))
            .unicode(true)
            .build()
    };

    let regex = build(pattern)?;
    if flags.contains('y') {
        build(&format!(r"\A(?:{pattern})"))
    } else {
        Ok(regex)
    }
}

/// Short, single-line description of a pattern compilation error.
pub fn describe_error(err: &regex::Error) -> String {
    match err {
        regex::Error::Syntax(msg) => msg
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .map(|l| l.trim().trim_start_matches("error: ").to_string())
            .unwrap_or_else(|| msg.clone()),
        regex::Error::CompiledTooBig(limit) => {
            format!("pattern exceeds the compiled size limit of {limit} bytes")
        }
        other => other.to_string(),
    }
}
