use crate::analyzers::aggregate::aggregate_quizzes;
use crate::analyzers::cache::{StatsCache, fingerprint};
use crate::analyzers::champions::rank_champions;
use crate::analyzers::flatten::flatten_rows;
use crate::analyzers::leaderboard::rank_all_quizzes;
use crate::analyzers::schema::detect_quizzes;
use crate::analyzers::section::section_overview;
use crate::analyzers::types::{Observation, QuizIndexSet, RawRow, SectionReport};
use crate::config::AnalyzerConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

/// A loaded dataset: detected quizzes plus the flattened observations.
///
/// Immutable once built; reload to pick up new rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    quizzes: QuizIndexSet,
    observations: Vec<Observation>,
    participants: usize,
    fingerprint: u64,
}

impl Dataset {
    /// Detects quizzes from the union of every row's columns and flattens
    /// every row.
    ///
    /// Short CSV records lack their trailing columns, so no single row is
    /// trusted to carry the full header.
    #[tracing::instrument(skip_all, fields(rows = rows.len()))]
    pub fn load(rows: &[RawRow]) -> Self {
        let quizzes = detect_quizzes(rows.iter().flat_map(|row| row.keys()));

        if quizzes.is_empty() {
            warn!("No quiz columns detected");
        } else {
            debug!(quizzes = ?quizzes.as_slice(), "Quiz columns detected");
        }

        let observations = flatten_rows(rows, &quizzes);
        info!(
            participants = rows.len(),
            quizzes = quizzes.len(),
            observations = observations.len(),
            "Dataset loaded"
        );

        Self {
            fingerprint: fingerprint(&observations),
            quizzes,
            observations,
            participants: rows.len(),
        }
    }

    pub fn quizzes(&self) -> &QuizIndexSet {
        &self.quizzes
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn participants(&self) -> usize {
        self.participants
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

/// Computes every section-level output for `dataset`.
#[tracing::instrument(skip_all, fields(quizzes = dataset.quizzes().len()))]
pub fn build_report(
    dataset: &Dataset,
    config: &AnalyzerConfig,
    cache: &mut StatsCache,
) -> SectionReport {
    let observations = dataset.observations();
    let quizzes = dataset.quizzes();

    let statistics = quizzes
        .iter()
        .map(|quiz| cache.quiz_statistics(dataset, quiz).clone())
        .collect();

    SectionReport {
        quizzes: quizzes.clone(),
        participants: dataset.participants(),
        overview: section_overview(
            observations,
            quizzes,
            dataset.participants(),
            config.multi_quiz_master_threshold,
        ),
        aggregates: aggregate_quizzes(observations, quizzes),
        statistics,
        leaderboards: rank_all_quizzes(observations, quizzes, config.leaderboard_size),
        champions: rank_champions(observations, quizzes, config.champion_board_size),
    }
}

/// On-disk envelope for a [`SectionReport`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFile {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub report: SectionReport,
}

impl ReportFile {
    pub fn new(source: &str, report: SectionReport) -> Self {
        Self {
            schema_version: 1,
            generated_at: Utc::now(),
            source: source.to_string(),
            report,
        }
    }
}
