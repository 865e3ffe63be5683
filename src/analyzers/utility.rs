use std::cmp::Ordering;

/// Arithmetic mean of the values. Returns `None` for empty input.
pub fn safe_mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// `part / total` as a ratio. Returns `None` when `total` is zero.
pub fn safe_ratio(part: usize, total: usize) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(part as f64 / total as f64)
    }
}

/// Bessel-corrected sample standard deviation. Returns 0.0 for fewer than two values.
pub fn sample_stddev(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;

    variance.sqrt()
}

/// Ascending copy of `values`.
pub fn sorted_ascending(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Nearest-rank order statistic: `sorted[floor(q * n)]`, no interpolation.
pub fn nearest_rank(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let idx = ((q * sorted.len() as f64).floor() as usize).min(sorted.len() - 1);
    Some(sorted[idx])
}

/// Minimum and maximum of the values, `None` for empty input.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_mean_empty_is_none() {
        assert_eq!(safe_mean(Vec::<f64>::new()), None);
    }

    #[test]
    fn test_safe_mean_values() {
        assert_eq!(safe_mean([0.0]), Some(0.0));
        assert_eq!(safe_mean([50.0, 100.0]), Some(75.0));
    }

    #[test]
    fn test_safe_ratio() {
        assert_eq!(safe_ratio(3, 0), None);
        assert_eq!(safe_ratio(0, 4), Some(0.0));
        assert_eq!(safe_ratio(1, 4), Some(0.25));
    }

    #[test]
    fn test_sample_stddev_small_inputs() {
        assert_eq!(sample_stddev(&[]), 0.0);
        assert_eq!(sample_stddev(&[42.0]), 0.0);
    }

    #[test]
    fn test_sample_stddev_bessel() {
        // mean 5, squared deviations sum 32, n-1 = 7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let expected = (32.0f64 / 7.0).sqrt();
        assert!((sample_stddev(&values) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_rank_quartiles() {
        let sorted = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(nearest_rank(&sorted, 0.25), Some(20.0));
        assert_eq!(nearest_rank(&sorted, 0.5), Some(30.0));
        assert_eq!(nearest_rank(&sorted, 0.75), Some(40.0));
        assert_eq!(nearest_rank(&[], 0.5), None);
        assert_eq!(nearest_rank(&[7.0], 0.75), Some(7.0));
    }

    #[test]
    fn test_sorted_ascending_leaves_input_untouched() {
        let values = vec![3.0, 1.0, 2.0];
        assert_eq!(sorted_ascending(&values), vec![1.0, 2.0, 3.0]);
        assert_eq!(values, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min_max(&[]), None);
        assert_eq!(min_max(&[5.0, 1.0, 9.0]), Some((1.0, 9.0)));
    }
}
