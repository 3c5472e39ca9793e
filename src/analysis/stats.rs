//! Descriptive statistics over numeric samples.

use crate::models::{BucketSummary, NumericSummary};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Fixed convergence-score ranges. Lower bound inclusive, upper exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScoreBucket {
    ZeroToFive,
    FiveToTen,
    TenToFifteen,
    FifteenToTwenty,
    TwentyPlus,
}

impl ScoreBucket {
    pub const ALL: [ScoreBucket; 5] = [
        ScoreBucket::ZeroToFive,
        ScoreBucket::FiveToTen,
        ScoreBucket::TenToFifteen,
        ScoreBucket::FifteenToTwenty,
        ScoreBucket::TwentyPlus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBucket::ZeroToFive => "0-5",
            ScoreBucket::FiveToTen => "5-10",
            ScoreBucket::TenToFifteen => "10-15",
            ScoreBucket::FifteenToTwenty => "15-20",
            ScoreBucket::TwentyPlus => "20+",
        }
    }

    /// Bucket for a score. Negative and NaN scores have none.
    pub fn for_score(score: f64) -> Option<Self> {
        match score {
            s if (0.0..5.0).contains(&s) => Some(ScoreBucket::ZeroToFive),
            s if (5.0..10.0).contains(&s) => Some(ScoreBucket::FiveToTen),
            s if (10.0..15.0).contains(&s) => Some(ScoreBucket::TenToFifteen),
            s if (15.0..20.0).contains(&s) => Some(ScoreBucket::FifteenToTwenty),
            s if s >= 20.0 => Some(ScoreBucket::TwentyPlus),
            _ => None,
        }
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median; the average of the two middle values for even-sized samples.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sample standard deviation (n - 1 denominator).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Summarize a sample. Returns `None` for an empty sample.
pub fn summarize(values: &[f64]) -> Option<NumericSummary> {
    let mean = mean(values)?;
    let median = median(values)?;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);

    Some(NumericSummary {
        count: values.len(),
        mean,
        median,
        max,
        min,
        std_dev: std_dev(values),
    })
}

/// Count of each distinct value, ordered by value.
pub fn size_distribution(sizes: &[usize]) -> Vec<(usize, usize)> {
    let mut dist: BTreeMap<usize, usize> = BTreeMap::new();
    for size in sizes {
        *dist.entry(*size).or_default() += 1;
    }
    dist.into_iter().collect()
}

/// Group scores into the fixed ranges. Empty ranges are omitted.
pub fn bucket_scores(scores: &[f64]) -> Vec<BucketSummary> {
    let mut grouped: BTreeMap<ScoreBucket, Vec<f64>> = BTreeMap::new();
    for score in scores {
        if let Some(bucket) = ScoreBucket::for_score(*score) {
            grouped.entry(bucket).or_default().push(*score);
        }
    }

    ScoreBucket::ALL
        .iter()
        .filter_map(|bucket| {
            let values = grouped.get(bucket)?;
            Some(BucketSummary {
                label: bucket.label().to_string(),
                count: values.len(),
                mean: mean(values)?,
            })
        })
        .collect()
}

/// Share of `count` in `total` as a percentage. Zero when `total` is zero.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_participant_summary() {
        let sizes = [2usize, 3, 3, 5];
        let values: Vec<f64> = sizes.iter().map(|s| *s as f64).collect();
        let summary = summarize(&values).unwrap();

        assert_eq!(summary.count, 4);
        assert!(approx(summary.mean, 3.25));
        assert!(approx(summary.median, 3.0));
        assert!(approx(summary.max, 5.0));
        assert!(approx(summary.min, 2.0));
        assert_eq!(size_distribution(&sizes), vec![(2, 1), (3, 2), (5, 1)]);
    }

    #[test]
    fn test_empty_sample() {
        assert!(summarize(&[]).is_none());
        assert!(mean(&[]).is_none());
        assert!(median(&[]).is_none());
        assert!(size_distribution(&[]).is_empty());
        assert!(bucket_scores(&[]).is_empty());
    }

    #[test]
    fn test_std_dev_needs_two_values() {
        assert!(std_dev(&[4.0]).is_none());
        assert!(summarize(&[4.0]).unwrap().std_dev.is_none());

        // Sample standard deviation of 2, 4, 4, 4, 5, 5, 7, 9
        let sd = std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!(approx(sd, (32.0f64 / 7.0).sqrt()));
    }

    #[test]
    fn test_median_odd_and_unsorted() {
        assert!(approx(median(&[9.0, 1.0, 5.0]).unwrap(), 5.0));
    }

    #[test]
    fn test_bucket_assignment() {
        let buckets = bucket_scores(&[1.0, 6.0, 11.0, 22.0]);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();

        assert_eq!(labels, vec!["0-5", "5-10", "10-15", "20+"]);
        assert!(buckets.iter().all(|b| b.count == 1));
        assert!(approx(buckets[3].mean, 22.0));
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(ScoreBucket::for_score(0.0), Some(ScoreBucket::ZeroToFive));
        assert_eq!(ScoreBucket::for_score(5.0), Some(ScoreBucket::FiveToTen));
        assert_eq!(ScoreBucket::for_score(14.999), Some(ScoreBucket::TenToFifteen));
        assert_eq!(ScoreBucket::for_score(15.0), Some(ScoreBucket::FifteenToTwenty));
        assert_eq!(ScoreBucket::for_score(20.0), Some(ScoreBucket::TwentyPlus));
        assert_eq!(ScoreBucket::for_score(-0.5), None);
        assert_eq!(ScoreBucket::for_score(f64::NAN), None);
    }

    #[test]
    fn test_every_non_negative_score_lands_in_one_bucket() {
        let scores: Vec<f64> = (0..500).map(|i| i as f64 * 0.1).collect();
        let buckets = bucket_scores(&scores);
        let total: usize = buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, scores.len());
    }

    #[test]
    fn test_percentage() {
        assert!(approx(percentage(1, 4), 25.0));
        assert!(approx(percentage(0, 0), 0.0));
        assert!(approx(percentage(4, 4), 100.0));
    }
}
