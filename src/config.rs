use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the JSON config file.
pub const CONFIG_ENV_VAR: &str = "QUIZ_INSIGHTS_CONFIG";

/// Tunables for the analysis pipeline.
///
/// Stored as a plain JSON object on disk; every key is optional:
/// ```json
/// {
///   "leaderboard_size": 5,
///   "champion_board_size": 3,
///   "persistent_attempts_threshold": 3.0,
///   "multi_quiz_master_threshold": 3
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Entries kept on each per-quiz leaderboard.
    pub leaderboard_size: usize,
    /// Entries kept on the section champion leaderboard.
    pub champion_board_size: usize,
    /// Attempt count from which a submitter counts as a persistent learner.
    pub persistent_attempts_threshold: f64,
    /// Perfect submissions needed for the multi-quiz master badge.
    pub multi_quiz_master_threshold: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            leaderboard_size: 3,
            champion_board_size: 3,
            persistent_attempts_threshold: 3.0,
            multi_quiz_master_threshold: 3,
        }
    }
}

impl AnalyzerConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Loads from an explicit path, else from `QUIZ_INSIGHTS_CONFIG`, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match std::env::var(CONFIG_ENV_VAR) {
                Ok(path) if !path.is_empty() => Self::load(path),
                _ => Ok(Self::default()),
            },
        }
    }
}
