//! Near-duplicate suppression for question stems.
//!
//! Two questions are duplicates when their normalized keys are identical.
//! The key ignores Unicode presentation forms, case, multiple-choice
//! lead-ins, quote styles, punctuation and whitespace runs.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::model::Question;

/// Lead-in phrases stripped from the start of a stem (applied repeatedly).
static LEAD_IN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:wie lautet die korrekte antwort\?|welche aussage ist richtig[?:]|welche antwort ist richtig[?:]|was trifft zu\?|bitte wählen sie[^:]*:|bitte wählen sie)\s*",
    )
    .expect("valid lead-in pattern")
});

/// Normalize arbitrary question text into its identity key.
pub fn normalize_text(text: &str) -> String {
    let mut s: String = text.nfkc().collect::<String>().to_lowercase();
    s = s.trim().to_string();

    loop {
        let stripped = LEAD_IN.replace(&s, "").trim_start().to_string();
        if stripped == s {
            break;
        }
        s = stripped;
    }

    let mapped: String = s
        .chars()
        .map(collapse_quote)
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collapse_quote(c: char) -> char {
    match c {
        '„' | '“' | '”' | '‟' | '«' | '»' | '″' => '"',
        '‚' | '‘' | '’' | '‛' | '‹' | '›' | '`' | '´' | '′' => '\'',
        other => other,
    }
}

/// Identity key of a question, computed from its display text.
pub fn question_key(question: &Question) -> String {
    normalize_text(question.display_text())
}

/// Keep the first question per identity key, preserving order.
pub fn unique_by_question<'a, I>(pool: I) -> Vec<&'a Question>
where
    I: IntoIterator<Item = &'a Question>,
{
    let mut seen = HashSet::new();
    pool.into_iter()
        .filter(|q| seen.insert(question_key(q)))
        .collect()
}
