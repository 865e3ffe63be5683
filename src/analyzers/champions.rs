//! Section-wide champion leaderboard.

use crate::analyzers::grade::PERFECT_SCORE;
use crate::analyzers::types::{ChampionEntry, Observation, QuizIndexSet};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Per-student totals across every quiz, built from submissions only.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentProfile {
    pub student_key: String,
    pub name: String,
    pub email: String,
    /// Quizzes with a scored submission.
    pub completed_quizzes: BTreeSet<u32>,
    pub perfect_count: usize,
    pub total_attempts: f64,
    /// Scores of every scored submission, in observation order.
    pub scores: Vec<f64>,
}

impl StudentProfile {
    fn new(obs: &Observation) -> Self {
        Self {
            student_key: obs.student_key.clone(),
            name: obs.name.clone(),
            email: obs.email.clone(),
            completed_quizzes: BTreeSet::new(),
            perfect_count: 0,
            total_attempts: 0.0,
            scores: Vec::new(),
        }
    }

    pub fn completed_count(&self) -> usize {
        self.completed_quizzes.len()
    }

    /// Perfect score recorded on every quiz in the section.
    pub fn is_section_champion(&self, quizzes: &QuizIndexSet) -> bool {
        self.perfect_count == quizzes.len() && self.completed_count() == quizzes.len()
    }
}

/// Builds one profile per student key that has at least one submission, in
/// order of first appearance.
pub fn build_profiles(observations: &[Observation]) -> Vec<StudentProfile> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut profiles: Vec<StudentProfile> = Vec::new();

    for obs in observations.iter().filter(|o| o.is_submission()) {
        let idx = *index.entry(obs.student_key.as_str()).or_insert_with(|| {
            profiles.push(StudentProfile::new(obs));
            profiles.len() - 1
        });
        let profile = &mut profiles[idx];

        if let Some(score) = obs.score {
            profile.completed_quizzes.insert(obs.quiz);
            profile.scores.push(score);
            if score == PERFECT_SCORE {
                profile.perfect_count += 1;
            }
        }
        profile.total_attempts += obs.attempts.unwrap_or_default();
    }

    profiles
}

fn compare_champions(a: &ChampionEntry, b: &ChampionEntry) -> Ordering {
    let fewer_attempts = |a: &ChampionEntry, b: &ChampionEntry| {
        a.total_attempts
            .partial_cmp(&b.total_attempts)
            .unwrap_or(Ordering::Equal)
    };

    match (a.is_section_champion, b.is_section_champion) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => fewer_attempts(a, b),
        (false, false) => b
            .perfect_count
            .cmp(&a.perfect_count)
            .then_with(|| b.completed_count.cmp(&a.completed_count))
            .then_with(|| fewer_attempts(a, b)),
    }
}

/// Every profiled student, ranked champions first.
pub fn rank_profiles(profiles: &[StudentProfile], quizzes: &QuizIndexSet) -> Vec<ChampionEntry> {
    let mut entries: Vec<ChampionEntry> = profiles
        .iter()
        .map(|p| ChampionEntry {
            name: p.name.clone(),
            email: p.email.clone(),
            is_section_champion: p.is_section_champion(quizzes),
            perfect_count: p.perfect_count,
            total_quizzes: quizzes.len(),
            total_attempts: p.total_attempts,
            completed_count: p.completed_count(),
        })
        .collect();

    entries.sort_by(compare_champions);
    entries
}

/// Top `top_n` students across the whole section.
pub fn rank_champions(
    observations: &[Observation],
    quizzes: &QuizIndexSet,
    top_n: usize,
) -> Vec<ChampionEntry> {
    let mut ranked = rank_profiles(&build_profiles(observations), quizzes);
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(name: &str, quiz: u32, score: Option<f64>, attempts: Option<f64>) -> Observation {
        Observation {
            student_key: format!("{name}-{name}@x"),
            name: name.to_string(),
            email: format!("{name}@x"),
            quiz,
            score,
            attempts,
        }
    }

    fn names(entries: &[ChampionEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_single_perfect_student_is_champion() {
        let data = vec![
            obs("A", 1, Some(100.0), Some(1.0)),
            obs("A", 2, Some(100.0), Some(2.0)),
        ];
        let quizzes = QuizIndexSet::new([1, 2]);
        let ranked = rank_champions(&data, &quizzes, 3);

        assert_eq!(ranked.len(), 1);
        let a = &ranked[0];
        assert!(a.is_section_champion);
        assert_eq!(a.perfect_count, 2);
        assert_eq!(a.completed_count, 2);
        assert_eq!(a.total_attempts, 3.0);
        assert_eq!(a.total_quizzes, 2);
    }

    #[test]
    fn test_missing_submission_blocks_champion() {
        let data = vec![
            obs("A", 1, Some(100.0), Some(1.0)),
            obs("A", 2, Some(100.0), Some(0.0)),
        ];
        let ranked = rank_champions(&data, &QuizIndexSet::new([1, 2]), 3);

        assert!(!ranked[0].is_section_champion);
        assert_eq!(ranked[0].perfect_count, 1);
        assert_eq!(ranked[0].completed_count, 1);
    }

    #[test]
    fn test_students_without_submissions_are_omitted() {
        let data = vec![
            obs("ghost", 1, Some(100.0), None),
            obs("ghost", 2, None, Some(0.0)),
            obs("real", 1, Some(10.0), Some(1.0)),
            obs("real", 2, None, None),
        ];
        let ranked = rank_champions(&data, &QuizIndexSet::new([1, 2]), 3);
        assert_eq!(names(&ranked), vec!["real"]);
    }

    #[test]
    fn test_unscored_submission_still_counts_attempts() {
        let data = vec![obs("A", 1, None, Some(4.0)), obs("A", 2, Some(50.0), Some(1.0))];
        let profiles = build_profiles(&data);

        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].total_attempts, 5.0);
        assert_eq!(profiles[0].completed_count(), 1);
        assert_eq!(profiles[0].scores, vec![50.0]);
    }

    #[test]
    fn test_tiered_ordering() {
        let quizzes = QuizIndexSet::new([1, 2]);
        let data = vec![
            // non-champion, 1 perfect, 2 completed, 2 attempts
            obs("n1", 1, Some(100.0), Some(1.0)),
            obs("n1", 2, Some(50.0), Some(1.0)),
            // champion with 5 attempts
            obs("c5", 1, Some(100.0), Some(2.0)),
            obs("c5", 2, Some(100.0), Some(3.0)),
            // non-champion, 1 perfect, 1 completed
            obs("n2", 1, Some(100.0), Some(1.0)),
            obs("n2", 2, None, None),
            // champion with 2 attempts
            obs("c2", 1, Some(100.0), Some(1.0)),
            obs("c2", 2, Some(100.0), Some(1.0)),
            // non-champion, 1 perfect, 2 completed, 9 attempts
            obs("n3", 1, Some(100.0), Some(4.0)),
            obs("n3", 2, Some(20.0), Some(5.0)),
            // non-champion, 0 perfect
            obs("n4", 1, Some(90.0), Some(1.0)),
            obs("n4", 2, Some(90.0), Some(1.0)),
        ];
        let ranked = rank_champions(&data, &quizzes, 10);
        assert_eq!(names(&ranked), vec!["c2", "c5", "n1", "n3", "n2", "n4"]);

        let top = rank_champions(&data, &quizzes, 3);
        assert_eq!(names(&top), vec!["c2", "c5", "n1"]);
    }

    #[test]
    fn test_identical_profiles_keep_first_appearance() {
        let data = vec![obs("b", 1, Some(60.0), Some(2.0)), obs("a", 1, Some(60.0), Some(2.0))];
        let ranked = rank_champions(&data, &QuizIndexSet::new([1]), 3);
        assert_eq!(names(&ranked), vec!["b", "a"]);
    }

    #[test]
    fn test_ranking_leaves_input_untouched() {
        let data = vec![
            obs("b", 1, Some(60.0), Some(2.0)),
            obs("a", 1, Some(100.0), Some(1.0)),
            obs("a", 2, Some(100.0), Some(1.0)),
            obs("c", 2, None, Some(0.0)),
        ];
        let before = data.clone();

        let ranked = rank_champions(&data, &QuizIndexSet::new([1, 2]), 3);

        assert_eq!(names(&ranked), vec!["a", "b"]);
        assert_eq!(data, before);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(rank_champions(&[], &QuizIndexSet::new([1]), 3).is_empty());
        assert!(rank_champions(&[], &QuizIndexSet::default(), 3).is_empty());
    }
}
