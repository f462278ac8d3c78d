// src/warehouse/filter.rs
//! Pure filter and sort logic for the candidate projection. Everything
//! here is a function of (records, filter state) with no I/O, so the
//! table view and the CSV export share one implementation.

use clap::ValueEnum;
use std::cmp::Ordering;

use crate::types::CandidateRecord;

pub const SCORE_FLOOR: f64 = 0.0;
pub const SCORE_CEIL: f64 = 100.0;

/// User-selected view settings for the warehouse table.
#[derive(Debug, Clone)]
pub struct FilterState {
    /// Free-form search text, matched case-insensitively against id,
    /// headline, skills and gaps.
    pub search: String,
    pub score_min: f64,
    pub score_max: f64,
    pub sort: SortKey,
    /// Skills every shown candidate must carry, matched verbatim against
    /// the normalized skill list.
    pub must_have: Vec<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            score_min: SCORE_FLOOR,
            score_max: SCORE_CEIL,
            sort: SortKey::default(),
            must_have: Vec::new(),
        }
    }
}

impl FilterState {
    /// Effective score range: both bounds clamped to 0-100 and swapped
    /// when given inverted, so any input yields a usable range.
    pub fn score_range(&self) -> (f64, f64) {
        let mut min = normalize_bound(self.score_min, SCORE_FLOOR);
        let mut max = normalize_bound(self.score_max, SCORE_CEIL);
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        (min, max)
    }
}

fn normalize_bound(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(SCORE_FLOOR, SCORE_CEIL)
    } else {
        fallback
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    ScoreDesc,
    ScoreAsc,
    FileAsc,
    FileDesc,
    HeadlineAsc,
    HeadlineDesc,
}

/// Compute the filtered, sorted projection of `records`. Returns a new
/// sequence; the input records are never mutated.
pub fn apply_filters(records: &[CandidateRecord], filter: &FilterState) -> Vec<CandidateRecord> {
    let (min_score, max_score) = filter.score_range();
    let search = filter.search.trim().to_lowercase();

    let mut projection: Vec<CandidateRecord> = records
        .iter()
        .filter(|record| {
            let score = record.effective_score();
            if score < min_score || score > max_score {
                return false;
            }
            if !search.is_empty() && !search_haystack(record).contains(&search) {
                return false;
            }
            if !filter.must_have.is_empty() {
                // exact names, as they appear in the normalized skill list
                let skills = record.skills_normalized();
                if !filter.must_have.iter().all(|needed| skills.contains(needed)) {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect();

    sort_projection(&mut projection, filter.sort);
    projection
}

/// Order a projection in place. Ties under every key fall back to the
/// candidate id, ascending and case-insensitive, so repeated runs over
/// the same data always produce the same order.
pub fn sort_projection(projection: &mut [CandidateRecord], key: SortKey) {
    projection.sort_by(|a, b| compare_records(a, b, key));
}

fn compare_records(a: &CandidateRecord, b: &CandidateRecord, key: SortKey) -> Ordering {
    let primary = match key {
        SortKey::ScoreDesc => b.effective_score().total_cmp(&a.effective_score()),
        SortKey::ScoreAsc => a.effective_score().total_cmp(&b.effective_score()),
        SortKey::FileAsc => file_key(a).cmp(&file_key(b)),
        SortKey::FileDesc => file_key(b).cmp(&file_key(a)),
        SortKey::HeadlineAsc => headline_key(a).cmp(&headline_key(b)),
        SortKey::HeadlineDesc => headline_key(b).cmp(&headline_key(a)),
    };
    primary.then_with(|| file_key(a).cmp(&file_key(b)))
}

fn file_key(record: &CandidateRecord) -> String {
    record.candidate_id.to_lowercase()
}

fn headline_key(record: &CandidateRecord) -> String {
    record.headline_text().to_lowercase()
}

fn search_haystack(record: &CandidateRecord) -> String {
    let skills = record.skills_normalized().join(" ");
    let gaps = record.gaps.join(" ");
    [
        record.candidate_id.as_str(),
        record.headline_text(),
        skills.as_str(),
        gaps.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}
