//! CLI entry point for the quiz insights tool.
//!
//! Loads a wide-format quiz export from a file or URL and prints per-quiz
//! statistics, leaderboards, or a full section report.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use quiz_insights::analyzers::aggregate::quiz_statistics;
use quiz_insights::analyzers::analyzer::{Dataset, ReportFile, build_report};
use quiz_insights::analyzers::cache::StatsCache;
use quiz_insights::analyzers::champions::rank_champions;
use quiz_insights::analyzers::leaderboard::rank_quiz;
use quiz_insights::analyzers::section::section_overview;
use quiz_insights::config::AnalyzerConfig;
use quiz_insights::{
    fetch::load_source,
    output::{print_json, print_pretty, save_json, write_records},
    parser::parse_rows,
};
use serde_json::json;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "quiz_insights")]
#[command(about = "Statistics and leaderboards for quiz submission exports", long_about = None)]
struct Cli {
    /// JSON config file (falls back to QUIZ_INSIGHTS_CONFIG, then defaults)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the quiz indices detected in the export
    Quizzes {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,
    },
    /// Detailed statistics for one quiz
    Stats {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Quiz index
        #[arg(short, long)]
        quiz: u32,
    },
    /// Efficiency leaderboard for one quiz
    Leaderboard {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Quiz index
        #[arg(short, long)]
        quiz: u32,

        /// Number of entries (defaults to the configured leaderboard size)
        #[arg(short, long)]
        top: Option<usize>,
    },
    /// Section champion leaderboard across all quizzes
    Champions {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Number of entries (defaults to the configured champion board size)
        #[arg(short, long)]
        top: Option<usize>,
    },
    /// Section-wide overview and badges
    Overview {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,
    },
    /// Write the full section report as JSON
    Report {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// JSON file to write
        #[arg(short, long, default_value = "report.json")]
        output: String,
    },
    /// Export the flattened observations as CSV
    Export {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// CSV file to write
        #[arg(short, long, default_value = "observations.csv")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/quiz_insights.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("quiz_insights.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = AnalyzerConfig::resolve(cli.config.as_deref())?;
    print_pretty(&config);

    match cli.command {
        Commands::Quizzes { source } => {
            let dataset = load_dataset(&source).await?;
            print_json(&json!({
                "participants": dataset.participants(),
                "quizzes": dataset.quizzes(),
            }))?;
        }
        Commands::Stats { source, quiz } => {
            let dataset = load_dataset(&source).await?;
            require_quiz(&dataset, quiz)?;
            let stats = quiz_statistics(
                dataset.observations(),
                quiz,
                config.persistent_attempts_threshold,
            );
            print_json(&stats)?;
        }
        Commands::Leaderboard { source, quiz, top } => {
            let dataset = load_dataset(&source).await?;
            require_quiz(&dataset, quiz)?;
            let entries = rank_quiz(
                dataset.observations(),
                quiz,
                top.unwrap_or(config.leaderboard_size),
            );
            if entries.is_empty() {
                warn!(quiz, "No submissions for this quiz");
            }
            print_json(&entries)?;
        }
        Commands::Champions { source, top } => {
            let dataset = load_dataset(&source).await?;
            let entries = rank_champions(
                dataset.observations(),
                dataset.quizzes(),
                top.unwrap_or(config.champion_board_size),
            );
            print_json(&entries)?;
        }
        Commands::Overview { source } => {
            let dataset = load_dataset(&source).await?;
            let overview = section_overview(
                dataset.observations(),
                dataset.quizzes(),
                dataset.participants(),
                config.multi_quiz_master_threshold,
            );
            print_json(&overview)?;
        }
        Commands::Report { source, output } => {
            let dataset = load_dataset(&source).await?;
            let mut cache = StatsCache::new(config.persistent_attempts_threshold);
            let report = build_report(&dataset, &config, &mut cache);
            save_json(&output, &ReportFile::new(&source, report))?;
        }
        Commands::Export { source, output } => {
            let dataset = load_dataset(&source).await?;
            write_records(&output, dataset.observations())?;
        }
    }

    Ok(())
}

/// Loads, parses and flattens a quiz export.
#[tracing::instrument]
async fn load_dataset(source: &str) -> Result<Dataset> {
    let bytes = load_source(source).await?;
    let rows = parse_rows(&bytes)?;
    info!(rows = rows.len(), "Export parsed");
    Ok(Dataset::load(&rows))
}

fn require_quiz(dataset: &Dataset, quiz: u32) -> Result<()> {
    if !dataset.quizzes().contains(quiz) {
        bail!(
            "quiz {quiz} not found; detected quizzes: {:?}",
            dataset.quizzes().as_slice()
        );
    }
    Ok(())
}
