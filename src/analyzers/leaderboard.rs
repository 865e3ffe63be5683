//! Per-quiz efficiency leaderboard.

use crate::analyzers::grade::PERFECT_SCORE;
use crate::analyzers::types::{LeaderboardEntry, Observation, QuizIndexSet, QuizLeaderboard};
use std::cmp::Ordering;

/// Attempts beyond this no longer reduce a perfect scorer's bonus.
const BONUS_ATTEMPT_CAP: f64 = 10.0;

/// Ranking metric for one submission.
///
/// A perfect score earns `100 + (10 - min(attempts, 10))`, which always sits
/// in `[100, 110)` and ranks above any imperfect `score / attempts`.
pub fn efficiency_score(score: f64, attempts: f64) -> f64 {
    if score == PERFECT_SCORE {
        PERFECT_SCORE + (BONUS_ATTEMPT_CAP - attempts.min(BONUS_ATTEMPT_CAP))
    } else {
        score / attempts
    }
}

fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.efficiency_score
        .partial_cmp(&a.efficiency_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
        .then_with(|| a.attempts.partial_cmp(&b.attempts).unwrap_or(Ordering::Equal))
}

/// Top `top_n` scored submissions for `quiz`, best first.
///
/// Remaining ties keep observation order.
pub fn rank_quiz(observations: &[Observation], quiz: u32, top_n: usize) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = observations
        .iter()
        .filter(|o| o.quiz == quiz && o.is_submission())
        .filter_map(|o| {
            let score = o.score?;
            let attempts = o.attempts?;
            Some(LeaderboardEntry {
                name: o.name.clone(),
                email: o.email.clone(),
                score,
                attempts,
                efficiency_score: efficiency_score(score, attempts),
            })
        })
        .collect();

    // sort_by is stable
    entries.sort_by(compare_entries);
    entries.truncate(top_n);
    entries
}

/// One leaderboard per quiz index.
pub fn rank_all_quizzes(
    observations: &[Observation],
    quizzes: &QuizIndexSet,
    top_n: usize,
) -> Vec<QuizLeaderboard> {
    quizzes
        .iter()
        .map(|quiz| QuizLeaderboard {
            quiz,
            entries: rank_quiz(observations, quiz, top_n),
        })
        .collect()
}
