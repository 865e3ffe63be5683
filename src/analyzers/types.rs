//! Data types shared by the analysis pipeline.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One participant's row as handed over by the ingestion layer: column name to raw text.
pub type RawRow = HashMap<String, String>;

/// Ascending, deduplicated set of quiz indices discovered from the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizIndexSet(Vec<u32>);

impl QuizIndexSet {
    pub fn new(indices: impl IntoIterator<Item = u32>) -> Self {
        let mut indices: Vec<u32> = indices.into_iter().collect();
        indices.sort_unstable();
        indices.dedup();
        Self(indices)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, quiz: u32) -> bool {
        self.0.binary_search(&quiz).is_ok()
    }
}

/// A single (student, quiz) record produced by the row flattener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub student_key: String,
    pub name: String,
    pub email: String,
    pub quiz: u32,
    pub score: Option<f64>,
    pub attempts: Option<f64>,
}

impl Observation {
    /// An observation counts as a submission once at least one attempt was recorded.
    pub fn is_submission(&self) -> bool {
        matches!(self.attempts, Some(a) if a > 0.0)
    }
}

/// Per-quiz summary over submissions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAggregate {
    pub quiz: u32,
    pub submission_count: usize,
    pub mean_score: Option<f64>,
    pub mean_attempts: Option<f64>,
    /// Submission scores in observation order.
    pub scores: Vec<f64>,
}

/// Counts per grade bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeDistribution {
    pub excellent: usize,
    pub good: usize,
    pub average: usize,
    pub fail: usize,
}

/// Pass/fail split at the pass threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassFailSplit {
    pub passed: usize,
    pub failed: usize,
}

/// A ten-point score bucket, e.g. `70..=79`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBucket {
    pub lower: i64,
    pub upper: i64,
    pub count: usize,
}

/// Mean score of the submissions sharing one attempt count.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptGroup {
    pub attempts: f64,
    pub count: usize,
    pub mean_score: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizBadges {
    pub perfect_scorers: usize,
    pub ace_on_first_shot: usize,
    pub complete_misses: usize,
    pub progress_halted: usize,
}

/// Detailed statistics for a single quiz.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStatistics {
    pub quiz: u32,
    pub submission_count: usize,
    pub scored_count: usize,
    pub completion_rate: Option<f64>,
    pub mean_score: Option<f64>,
    pub mean_attempts: Option<f64>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub score_range: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub std_dev: f64,
    pub distribution: GradeDistribution,
    pub pass_fail: PassFailSplit,
    pub pass_rate: Option<f64>,
    pub excellence_rate: Option<f64>,
    pub fail_rate: Option<f64>,
    pub most_common_bucket: Option<ScoreBucket>,
    pub min_attempts: Option<f64>,
    pub max_attempts: Option<f64>,
    pub persistent_learners: usize,
    pub attempt_groups: Vec<AttemptGroup>,
    pub badges: QuizBadges,
}

/// One row of the per-quiz efficiency leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub name: String,
    pub email: String,
    pub score: f64,
    pub attempts: f64,
    pub efficiency_score: f64,
}

/// Leaderboard for one quiz, as embedded in the section report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizLeaderboard {
    pub quiz: u32,
    pub entries: Vec<LeaderboardEntry>,
}

/// One row of the section champion leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionEntry {
    pub name: String,
    pub email: String,
    pub is_section_champion: bool,
    pub perfect_count: usize,
    pub total_quizzes: usize,
    pub total_attempts: f64,
    pub completed_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionBadges {
    pub perfect_submissions: usize,
    pub multi_quiz_masters: usize,
    pub section_champions: usize,
    pub one_shot_winners: usize,
    pub need_support: usize,
}

/// Section-wide statistics across every quiz.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionOverview {
    pub total_quizzes: usize,
    pub participants: usize,
    pub submissions: usize,
    pub expected_submissions: usize,
    pub completion_rate: Option<f64>,
    pub mean_score: Option<f64>,
    pub pass_rate: Option<f64>,
    pub mean_attempts: Option<f64>,
    pub distribution: GradeDistribution,
    pub badges: SectionBadges,
}

/// Everything the dashboard needs, computed from one dataset load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionReport {
    pub quizzes: QuizIndexSet,
    pub participants: usize,
    pub overview: SectionOverview,
    pub aggregates: Vec<QuizAggregate>,
    pub statistics: Vec<QuizStatistics>,
    pub leaderboards: Vec<QuizLeaderboard>,
    pub champions: Vec<ChampionEntry>,
}
