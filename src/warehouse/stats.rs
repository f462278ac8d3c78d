// src/warehouse/stats.rs
//! Summary numbers over a projection, shown next to the results table.

use std::collections::HashMap;

use crate::types::CandidateRecord;

/// How many top skills/gaps the summary keeps.
const TOP_COUNT: usize = 3;

const BUCKET_WIDTH: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionStats {
    pub count: usize,
    /// Mean effective score, truncated to a whole number; 0 for an empty
    /// projection.
    pub average_score: i64,
    /// Most frequent normalized skills, count descending. Ties rank
    /// alphabetically.
    pub top_skills: Vec<(String, usize)>,
    pub top_gaps: Vec<(String, usize)>,
    /// Score histogram in width-10 buckets ("00-09", "10-19", ...),
    /// ordered by bucket start. Empty buckets are omitted.
    pub score_buckets: Vec<(String, usize)>,
}

impl ProjectionStats {
    pub fn from_records(records: &[CandidateRecord]) -> Self {
        let count = records.len();
        let average_score = if count == 0 {
            0
        } else {
            let total: f64 = records.iter().map(|r| r.effective_score()).sum();
            (total / count as f64) as i64
        };

        Self {
            count,
            average_score,
            top_skills: top_counts(records.iter().flat_map(|r| r.skills_normalized().iter())),
            top_gaps: top_counts(records.iter().flat_map(|r| r.gaps.iter())),
            score_buckets: bucket_counts(records),
        }
    }
}

/// Bucket label for a score: "00-09", "10-19", ... A perfect 100 lands
/// in "100-109".
pub fn score_bucket(score: f64) -> String {
    bucket_label(bucket_start(score))
}

fn bucket_start(score: f64) -> i64 {
    (score as i64 / BUCKET_WIDTH) * BUCKET_WIDTH
}

fn bucket_label(start: i64) -> String {
    format!("{:02}-{:02}", start, start + BUCKET_WIDTH - 1)
}

fn top_counts<'a>(items: impl Iterator<Item = &'a String>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in items {
        *counts.entry(item.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, n)| (name.to_string(), n))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_COUNT);
    ranked
}

fn bucket_counts(records: &[CandidateRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for record in records {
        *counts.entry(bucket_start(record.effective_score())).or_insert(0) += 1;
    }

    let mut buckets: Vec<(i64, usize)> = counts.into_iter().collect();
    buckets.sort_by_key(|(start, _)| *start);
    buckets
        .into_iter()
        .map(|(start, n)| (bucket_label(start), n))
        .collect()
}
