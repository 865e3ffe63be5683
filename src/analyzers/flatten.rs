//! Wide-to-long normalization of raw rows.

use crate::analyzers::schema::{
    ATTEMPTS_SUFFIX, SCORE_PERCENT_SUFFIX, SCORE_SUFFIX, column_name,
};
use crate::analyzers::types::{Observation, QuizIndexSet, RawRow};

/// Parses the leading floating-point literal of `raw`.
///
/// Leading whitespace is skipped and anything after the literal is ignored,
/// so `"85%"` reads as `85.0`. Returns `None` when no literal is present or
/// the value is not finite.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // exponent only counts when followed by at least one digit
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Looks up an identity column by its canonical name, then its lowercase
/// alias, then any case-insensitive match. Empty values fall through.
fn identity_field(row: &RawRow, canonical: &str) -> String {
    let lower = canonical.to_ascii_lowercase();

    [canonical, lower.as_str()]
        .iter()
        .filter_map(|key| row.get(*key))
        .find(|v| !v.is_empty())
        .or_else(|| {
            row.iter()
                .filter(|(k, v)| k.eq_ignore_ascii_case(canonical) && !v.is_empty())
                .map(|(_, v)| v)
                .min()
        })
        .cloned()
        .unwrap_or_default()
}

/// Concatenation used as the identity for every per-student aggregation.
pub fn student_key(name: &str, email: &str) -> String {
    format!("{name}-{email}")
}

fn score_cell(row: &RawRow, quiz: u32) -> Option<&String> {
    row.get(&column_name(quiz, SCORE_PERCENT_SUFFIX))
        .or_else(|| row.get(&column_name(quiz, SCORE_SUFFIX)))
}

/// Emits one [`Observation`] per (row, quiz) pair, rows in input order and
/// quizzes ascending within each row.
pub fn flatten_rows(rows: &[RawRow], quizzes: &QuizIndexSet) -> Vec<Observation> {
    let mut out = Vec::with_capacity(rows.len() * quizzes.len());

    for row in rows {
        let name = identity_field(row, "Name");
        let email = identity_field(row, "Email");
        let key = student_key(&name, &email);

        for quiz in quizzes.iter() {
            let score = score_cell(row, quiz).and_then(|v| parse_numeric(v));
            let attempts = row
                .get(&column_name(quiz, ATTEMPTS_SUFFIX))
                .and_then(|v| parse_numeric(v));

            out.push(Observation {
                student_key: key.clone(),
                name: name.clone(),
                email: email.clone(),
                quiz,
                score,
                attempts,
            });
        }
    }

    out
}
