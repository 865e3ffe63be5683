use crate::analyzers::champions::build_profiles;
use crate::analyzers::grade::{PASS_THRESHOLD, PERFECT_SCORE, distribution};
use crate::analyzers::types::{Observation, QuizIndexSet, SectionBadges, SectionOverview};
use crate::analyzers::utility::{safe_mean, safe_ratio};

/// Section-wide statistics over every submission.
///
/// `participants` is the number of raw rows, which stays meaningful even
/// when no quiz columns were detected.
pub fn section_overview(
    observations: &[Observation],
    quizzes: &QuizIndexSet,
    participants: usize,
    multi_quiz_master_threshold: usize,
) -> SectionOverview {
    let submissions: Vec<&Observation> = observations.iter().filter(|o| o.is_submission()).collect();
    let scores: Vec<f64> = submissions.iter().filter_map(|o| o.score).collect();
    let expected_submissions = participants * quizzes.len();

    SectionOverview {
        total_quizzes: quizzes.len(),
        participants,
        submissions: submissions.len(),
        expected_submissions,
        completion_rate: safe_ratio(submissions.len(), expected_submissions),
        mean_score: safe_mean(scores.iter().copied()),
        pass_rate: safe_ratio(
            scores.iter().filter(|&&s| s >= PASS_THRESHOLD).count(),
            scores.len(),
        ),
        mean_attempts: safe_mean(submissions.iter().filter_map(|o| o.attempts)),
        distribution: distribution(&scores),
        badges: section_badges(observations, quizzes, &scores, multi_quiz_master_threshold),
    }
}

fn section_badges(
    observations: &[Observation],
    quizzes: &QuizIndexSet,
    scores: &[f64],
    multi_quiz_master_threshold: usize,
) -> SectionBadges {
    let profiles = build_profiles(observations);

    SectionBadges {
        perfect_submissions: scores.iter().filter(|&&s| s == PERFECT_SCORE).count(),
        multi_quiz_masters: profiles
            .iter()
            .filter(|p| p.perfect_count >= multi_quiz_master_threshold)
            .count(),
        section_champions: profiles
            .iter()
            .filter(|p| p.is_section_champion(quizzes))
            .count(),
        one_shot_winners: observations
            .iter()
            .filter(|o| o.attempts == Some(1.0) && o.score == Some(PERFECT_SCORE))
            .count(),
        need_support: profiles
            .iter()
            .filter(|p| !p.scores.is_empty() && p.perfect_count == 0)
            .count(),
    }
}
