use crate::analyzers::grade::{
    EXCELLENCE_THRESHOLD, FAIL_THRESHOLD, PASS_THRESHOLD, PERFECT_SCORE, distribution, pass_fail,
};
use crate::analyzers::types::{
    AttemptGroup, Observation, QuizAggregate, QuizBadges, QuizIndexSet, QuizStatistics,
    ScoreBucket,
};
use crate::analyzers::utility::{
    min_max, nearest_rank, safe_mean, safe_ratio, sample_stddev, sorted_ascending,
};
use std::cmp::Ordering;
use std::collections::BTreeMap;

fn submissions_for(observations: &[Observation], quiz: u32) -> impl Iterator<Item = &Observation> {
    observations
        .iter()
        .filter(move |o| o.quiz == quiz && o.is_submission())
}

/// Summarizes the submissions for one quiz.
pub fn aggregate_quiz(observations: &[Observation], quiz: u32) -> QuizAggregate {
    let mut submission_count = 0;
    let mut scores = Vec::new();
    let mut attempts = Vec::new();

    for obs in submissions_for(observations, quiz) {
        submission_count += 1;
        if let Some(score) = obs.score {
            scores.push(score);
        }
        if let Some(a) = obs.attempts {
            attempts.push(a);
        }
    }

    QuizAggregate {
        quiz,
        submission_count,
        mean_score: safe_mean(scores.iter().copied()),
        mean_attempts: safe_mean(attempts),
        scores,
    }
}

/// One [`QuizAggregate`] per quiz index, in index order.
pub fn aggregate_quizzes(observations: &[Observation], quizzes: &QuizIndexSet) -> Vec<QuizAggregate> {
    quizzes
        .iter()
        .map(|quiz| aggregate_quiz(observations, quiz))
        .collect()
}

/// Most frequent ten-point bucket (`floor(s / 10) * 10`). Ties go to the higher bucket.
pub fn most_common_bucket(scores: &[f64]) -> Option<ScoreBucket> {
    let mut freq: BTreeMap<i64, usize> = BTreeMap::new();
    for s in scores {
        *freq.entry(((s / 10.0).floor() * 10.0) as i64).or_default() += 1;
    }

    let mut best: Option<(i64, usize)> = None;
    for (&lower, &count) in &freq {
        match best {
            Some((_, best_count)) if best_count > count => {}
            _ => best = Some((lower, count)),
        }
    }

    best.map(|(lower, count)| ScoreBucket {
        lower,
        upper: lower.saturating_add(9),
        count,
    })
}

/// Groups submissions by attempt count, ascending.
pub fn attempt_groups(observations: &[Observation], quiz: u32) -> Vec<AttemptGroup> {
    let mut groups: Vec<(f64, usize, Vec<f64>)> = Vec::new();

    for obs in submissions_for(observations, quiz) {
        let Some(attempts) = obs.attempts else {
            continue;
        };
        let idx = match groups.iter().position(|g| g.0 == attempts) {
            Some(idx) => idx,
            None => {
                groups.push((attempts, 0, Vec::new()));
                groups.len() - 1
            }
        };
        groups[idx].1 += 1;
        if let Some(score) = obs.score {
            groups[idx].2.push(score);
        }
    }

    groups.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    groups
        .into_iter()
        .map(|(attempts, count, scores)| AttemptGroup {
            attempts,
            count,
            mean_score: safe_mean(scores),
        })
        .collect()
}

fn quiz_badges(observations: &[Observation], quiz: u32, scores: &[f64]) -> QuizBadges {
    QuizBadges {
        perfect_scorers: scores.iter().filter(|&&s| s == PERFECT_SCORE).count(),
        ace_on_first_shot: submissions_for(observations, quiz)
            .filter(|o| o.attempts == Some(1.0) && o.score == Some(PERFECT_SCORE))
            .count(),
        complete_misses: scores.iter().filter(|&&s| s == 0.0).count(),
        progress_halted: scores.iter().filter(|&&s| s < PERFECT_SCORE).count(),
    }
}

/// Detailed statistics for one quiz.
///
/// Every observation of `quiz` stands for one participant, so the completion
/// rate is submissions over observations for that quiz.
pub fn quiz_statistics(
    observations: &[Observation],
    quiz: u32,
    persistent_attempts_threshold: f64,
) -> QuizStatistics {
    let aggregate = aggregate_quiz(observations, quiz);
    let participants = observations.iter().filter(|o| o.quiz == quiz).count();

    let scores = &aggregate.scores;
    let sorted = sorted_ascending(scores);
    let attempts: Vec<f64> = submissions_for(observations, quiz)
        .filter_map(|o| o.attempts)
        .collect();

    let score_bounds = min_max(scores);
    let attempt_bounds = min_max(&attempts);
    let count_where = |pred: fn(f64) -> bool| scores.iter().filter(|&&s| pred(s)).count();

    QuizStatistics {
        quiz,
        submission_count: aggregate.submission_count,
        scored_count: scores.len(),
        completion_rate: safe_ratio(aggregate.submission_count, participants),
        mean_score: aggregate.mean_score,
        mean_attempts: aggregate.mean_attempts,
        min_score: score_bounds.map(|(lo, _)| lo),
        max_score: score_bounds.map(|(_, hi)| hi),
        score_range: score_bounds.map(|(lo, hi)| hi - lo),
        q1: nearest_rank(&sorted, 0.25),
        median: nearest_rank(&sorted, 0.5),
        q3: nearest_rank(&sorted, 0.75),
        std_dev: sample_stddev(scores),
        distribution: distribution(scores),
        pass_fail: pass_fail(scores),
        pass_rate: safe_ratio(count_where(|s| s >= PASS_THRESHOLD), scores.len()),
        excellence_rate: safe_ratio(count_where(|s| s >= EXCELLENCE_THRESHOLD), scores.len()),
        fail_rate: safe_ratio(count_where(|s| s < FAIL_THRESHOLD), scores.len()),
        most_common_bucket: most_common_bucket(scores),
        min_attempts: attempt_bounds.map(|(lo, _)| lo),
        max_attempts: attempt_bounds.map(|(_, hi)| hi),
        persistent_learners: attempts
            .iter()
            .filter(|&&a| a >= persistent_attempts_threshold)
            .count(),
        attempt_groups: attempt_groups(observations, quiz),
        badges: quiz_badges(observations, quiz, scores),
    }
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

    #[test]
    fn test_aggregate_excludes_non_submissions() {
        let data = vec![
            obs("a", 1, Some(80.0), Some(2.0)),
            obs("b", 1, Some(0.0), Some(0.0)),
            obs("c", 1, Some(40.0), None),
            obs("d", 1, None, Some(1.0)),
            obs("e", 2, Some(100.0), Some(1.0)),
        ];
        let agg = aggregate_quiz(&data, 1);

        assert_eq!(agg.submission_count, 2);
        assert_eq!(agg.scores, vec![80.0]);
        assert_eq!(agg.mean_score, Some(80.0));
        assert_eq!(agg.mean_attempts, Some(1.5));
    }

    #[test]
    fn test_aggregate_no_submissions_yields_none() {
        let data = vec![obs("a", 1, Some(50.0), Some(0.0))];
        let agg = aggregate_quiz(&data, 1);

        assert_eq!(agg.submission_count, 0);
        assert_eq!(agg.mean_score, None);
        assert_eq!(agg.mean_attempts, None);
        assert!(agg.scores.is_empty());
    }

    #[test]
    fn test_aggregate_quizzes_follows_index_set() {
        let data = vec![obs("a", 1, Some(10.0), Some(1.0)), obs("a", 3, Some(30.0), Some(1.0))];
        let aggs = aggregate_quizzes(&data, &QuizIndexSet::new([3, 1]));
        let quizzes: Vec<u32> = aggs.iter().map(|a| a.quiz).collect();
        assert_eq!(quizzes, vec![1, 3]);
        assert!(aggregate_quizzes(&[], &QuizIndexSet::default()).is_empty());
    }

    #[test]
    fn test_most_common_bucket_ties_prefer_higher() {
        let bucket = most_common_bucket(&[72.0, 75.0, 91.0, 99.0, 10.0]).unwrap();
        assert_eq!(bucket.lower, 90);
        assert_eq!(bucket.upper, 99);
        assert_eq!(bucket.count, 2);
        assert_eq!(most_common_bucket(&[]), None);
        assert_eq!(most_common_bucket(&[100.0]).unwrap().lower, 100);
    }

    #[test]
    fn test_most_common_bucket_extreme_scores_saturate() {
        let high = most_common_bucket(&[1e300]).unwrap();
        assert_eq!(high.lower, i64::MAX);
        assert_eq!(high.upper, i64::MAX);
        assert_eq!(high.count, 1);

        let low = most_common_bucket(&[-1e300]).unwrap();
        assert_eq!(low.lower, i64::MIN);
        assert_eq!(low.upper, i64::MIN + 9);
    }

    #[test]
    fn test_attempt_groups_sorted() {
        let data = vec![
            obs("a", 1, Some(100.0), Some(3.0)),
            obs("b", 1, Some(50.0), Some(1.0)),
            obs("c", 1, None, Some(3.0)),
            obs("d", 1, Some(80.0), Some(3.0)),
        ];
        let groups = attempt_groups(&data, 1);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].attempts, 1.0);
        assert_eq!(groups[0].mean_score, Some(50.0));
        assert_eq!(groups[1].attempts, 3.0);
        assert_eq!(groups[1].count, 3);
        assert_eq!(groups[1].mean_score, Some(90.0));
    }

    #[test]
    fn test_quiz_statistics_order_stats() {
        let data = vec![
            obs("a", 1, Some(40.0), Some(1.0)),
            obs("b", 1, Some(100.0), Some(1.0)),
            obs("c", 1, Some(70.0), Some(4.0)),
            obs("d", 1, Some(90.0), Some(2.0)),
            obs("e", 1, None, Some(0.0)),
        ];
        let stats = quiz_statistics(&data, 1, 3.0);

        assert_eq!(stats.submission_count, 4);
        assert_eq!(stats.completion_rate, Some(0.8));
        // sorted: 40, 70, 90, 100
        assert_eq!(stats.q1, Some(70.0));
        assert_eq!(stats.median, Some(90.0));
        assert_eq!(stats.q3, Some(100.0));
        assert_eq!(stats.min_score, Some(40.0));
        assert_eq!(stats.max_score, Some(100.0));
        assert_eq!(stats.score_range, Some(60.0));
        assert_eq!(stats.pass_rate, Some(0.75));
        assert_eq!(stats.excellence_rate, Some(0.5));
        assert_eq!(stats.fail_rate, Some(0.25));
        assert_eq!(stats.pass_fail.passed, 3);
        assert_eq!(stats.min_attempts, Some(1.0));
        assert_eq!(stats.max_attempts, Some(4.0));
        assert_eq!(stats.persistent_learners, 1);
        assert_eq!(stats.badges.perfect_scorers, 1);
        assert_eq!(stats.badges.ace_on_first_shot, 1);
        assert_eq!(stats.badges.progress_halted, 3);
        assert_eq!(stats.badges.complete_misses, 0);
    }

    #[test]
    fn test_quiz_statistics_null_score_counts_toward_completion() {
        let data = vec![
            obs("a", 1, None, Some(2.0)),
            obs("b", 1, Some(60.0), Some(1.0)),
        ];
        let stats = quiz_statistics(&data, 1, 3.0);

        assert_eq!(stats.submission_count, 2);
        assert_eq!(stats.scored_count, 1);
        assert_eq!(stats.completion_rate, Some(1.0));
        assert_eq!(stats.mean_score, Some(60.0));
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_quiz_statistics_extreme_score() {
        let data = vec![
            obs("a", 1, Some(1e300), Some(1.0)),
            obs("b", 1, Some(80.0), Some(2.0)),
        ];
        let stats = quiz_statistics(&data, 1, 3.0);

        assert_eq!(stats.submission_count, 2);
        assert_eq!(stats.max_score, Some(1e300));
        assert_eq!(stats.most_common_bucket.unwrap().count, 1);
        assert_eq!(stats.badges.perfect_scorers, 0);
    }

    #[test]
    fn test_aggregation_leaves_input_untouched() {
        let data = vec![
            obs("b", 1, Some(60.0), Some(2.0)),
            obs("a", 1, Some(100.0), Some(1.0)),
            obs("c", 1, None, Some(0.0)),
            obs("a", 2, Some(40.0), Some(3.0)),
        ];
        let before = data.clone();

        aggregate_quiz(&data, 1);
        aggregate_quizzes(&data, &QuizIndexSet::new([1, 2]));
        quiz_statistics(&data, 1, 3.0);

        assert_eq!(data, before);
    }

    #[test]
    fn test_quiz_statistics_empty() {
        let stats = quiz_statistics(&[], 1, 3.0);
        assert_eq!(stats.submission_count, 0);
        assert_eq!(stats.completion_rate, None);
        assert_eq!(stats.median, None);
        assert_eq!(stats.pass_rate, None);
        assert_eq!(stats.most_common_bucket, None);
        assert!(stats.attempt_groups.is_empty());
    }
}
