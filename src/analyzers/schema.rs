//! Quiz index discovery from column names.

use crate::analyzers::types::QuizIndexSet;

pub(crate) const SCORE_PERCENT_SUFFIX: &str = "Score (in %)";
pub(crate) const SCORE_SUFFIX: &str = "Score";
pub(crate) const ATTEMPTS_SUFFIX: &str = "Total attempts";

static RECOGNIZED_SUFFIXES: &[&str] = &[SCORE_PERCENT_SUFFIX, SCORE_SUFFIX, ATTEMPTS_SUFFIX];

/// Builds the column name for quiz `quiz` with the given suffix.
pub(crate) fn column_name(quiz: u32, suffix: &str) -> String {
    format!("Quiz{quiz}_{suffix}")
}

/// Returns the quiz index encoded in `column`, if it follows the
/// `Quiz<digits>_<suffix>` convention with a recognized suffix.
pub fn quiz_index(column: &str) -> Option<u32> {
    let rest = column.strip_prefix("Quiz")?;
    let (digits, suffix) = rest.split_once('_')?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    if !RECOGNIZED_SUFFIXES.contains(&suffix) {
        return None;
    }

    digits.parse().ok()
}

/// Scans a header and returns every quiz index it mentions.
pub fn detect_quizzes<I, S>(columns: I) -> QuizIndexSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    QuizIndexSet::new(columns.into_iter().filter_map(|c| quiz_index(c.as_ref())))
}
