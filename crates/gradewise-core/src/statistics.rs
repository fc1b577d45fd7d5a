//! Aggregate statistics over a graded batch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::results::GradedSubmission;

/// Aggregate statistics across all graded submissions of one assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Number of graded submissions.
    pub count: usize,
    pub mean_score: f64,
    pub median_score: f64,
    pub min_score: u32,
    pub max_score: u32,
    /// Mean score as a fraction of the assignment's ceiling (0–1).
    pub mean_score_ratio: f64,
    pub mean_risk_percent: f64,
    pub max_risk_percent: u32,
    /// Submissions whose risk reached the flag threshold.
    pub flagged: usize,
    /// Rubric rule id → number of submissions it fired for.
    pub rule_counts: BTreeMap<String, usize>,
}

/// Median of an unsorted sample; 0 for an empty one.
pub fn median(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0
    } else {
        f64::from(sorted[mid])
    }
}

/// Compute aggregate statistics from graded submissions.
pub fn compute_aggregate_stats(graded: &[GradedSubmission], ceiling: u32) -> AggregateStats {
    if graded.is_empty() {
        return AggregateStats::default();
    }

    let n = graded.len() as f64;
    let scores: Vec<u32> = graded.iter().map(|g| g.result.score).collect();
    let risks: Vec<u32> = graded
        .iter()
        .map(|g| g.result.plagiarism_risk.percent())
        .collect();

    let mean_score = scores.iter().map(|&s| f64::from(s)).sum::<f64>() / n;
    let mean_score_ratio = if ceiling == 0 {
        0.0
    } else {
        mean_score / f64::from(ceiling)
    };

    let mut rule_counts = BTreeMap::new();
    for g in graded {
        for finding in &g.findings {
            *rule_counts.entry(finding.clone()).or_insert(0) += 1;
        }
    }

    AggregateStats {
        count: graded.len(),
        mean_score,
        median_score: median(&scores),
        min_score: scores.iter().copied().min().unwrap_or(0),
        max_score: scores.iter().copied().max().unwrap_or(0),
        mean_score_ratio,
        mean_risk_percent: risks.iter().map(|&r| f64::from(r)).sum::<f64>() / n,
        max_risk_percent: risks.iter().copied().max().unwrap_or(0),
        flagged: graded.iter().filter(|g| g.flagged).count(),
        rule_counts,
    }
}
