use crate::analyzers::types::{GradeDistribution, PassFailSplit};

/// Minimum score counted as a pass.
pub const PASS_THRESHOLD: f64 = 70.0;
/// Minimum score counted as excellent.
pub const EXCELLENCE_THRESHOLD: f64 = 90.0;
/// Scores below this fall into the fail bucket.
pub const FAIL_THRESHOLD: f64 = 50.0;
/// A perfect score.
pub const PERFECT_SCORE: f64 = 100.0;

/// Score bucket used by the distribution reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Excellent,
    Good,
    Average,
    Fail,
}

/// Converts a percentage score into its bucket.
///
/// | Range     | Grade         |
/// |-----------|---------------|
/// | >= 90     | Excellent (A) |
/// | [70, 90)  | Good (B)      |
/// | [50, 70)  | Average (C)   |
/// | < 50      | Fail (F)      |
pub fn grade(score: f64) -> Grade {
    match score {
        s if s >= EXCELLENCE_THRESHOLD => Grade::Excellent,
        s if s >= PASS_THRESHOLD => Grade::Good,
        s if s >= FAIL_THRESHOLD => Grade::Average,
        _ => Grade::Fail,
    }
}

pub fn distribution(scores: &[f64]) -> GradeDistribution {
    scores
        .iter()
        .fold(GradeDistribution::default(), |mut d, &s| {
            match grade(s) {
                Grade::Excellent => d.excellent += 1,
                Grade::Good => d.good += 1,
                Grade::Average => d.average += 1,
                Grade::Fail => d.fail += 1,
            }
            d
        })
}

pub fn pass_fail(scores: &[f64]) -> PassFailSplit {
    let passed = scores.iter().filter(|&&s| s >= PASS_THRESHOLD).count();
    PassFailSplit {
        passed,
        failed: scores.len() - passed,
    }
}
