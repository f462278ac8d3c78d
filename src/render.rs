// src/render.rs
//! Plain-text rendering of score reports and warehouse views. Everything
//! returns a `String` so command handlers decide where it goes.

use serde_json::Value;

use crate::chart::ScoreProfile;
use crate::types::{CandidateRecord, ScoreReport, UserProfile};
use crate::warehouse::ProjectionStats;

const BAR_WIDTH: usize = 20;

/// Full score view for one resume: header, summary, score component
/// profile and the per-skill breakdown.
pub fn score_report_text(report: &ScoreReport, profile: Option<&ScoreProfile>) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!(
        "Candidate: {}",
        report.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("Unknown")
    ));
    // a reported zero is a real score; only an absent one shows N/A
    lines.push(format!("Score: {}", fmt_score(report.score)));
    lines.push(format!(
        "Level: {}",
        report.level.as_deref().unwrap_or("N/A")
    ));

    lines.push(String::new());
    lines.push("Summary".to_string());
    match &report.summary {
        Some(summary) => {
            let percent = match summary.matched_percent {
                Some(p) => format!("{p}%"),
                None => "N/A".to_string(),
            };
            lines.push(format!("  Skill Match: {percent}"));
            lines.push(format!(
                "  Matched Skills: {}",
                join_or_dash(&summary.matched_skills)
            ));
            lines.push(format!(
                "  Missing Must-Have Skills: {}",
                join_or_dash(&summary.missing_skills)
            ));
        }
        None => lines.push("  No summary available.".to_string()),
    }

    lines.push(String::new());
    lines.push("Score Components".to_string());
    match profile {
        Some(profile) => {
            for axis in &profile.axes {
                lines.push(format!(
                    "  {:<12} {}  {:>3.0}%",
                    axis.label,
                    bar(axis.percent),
                    axis.percent
                ));
            }
        }
        None => lines.push("  Not enough score components to draw a profile.".to_string()),
    }

    lines.push(String::new());
    lines.push("Breakdown".to_string());
    if report.breakdown.is_empty() {
        lines.push("  No breakdown available.".to_string());
    } else {
        for item in report.sorted_breakdown() {
            lines.push(format!(
                "  {:<24} {}",
                item.skill.as_deref().unwrap_or("N/A"),
                item.level.as_deref().unwrap_or("N/A")
            ));
        }
    }

    if !report.notes.is_empty() {
        lines.push(String::new());
        lines.push("Notes".to_string());
        for note in &report.notes {
            lines.push(format!("  - {note}"));
        }
    }

    lines.join("\n")
}

/// Warehouse results table. Candidates render one row each with the
/// first five skills; an empty projection renders a notice instead.
pub fn candidate_table(projection: &[CandidateRecord]) -> String {
    if projection.is_empty() {
        return "No candidates match the current filters.".to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    lines.push(format!(
        "{:<30} {:<8} {:<28} {:<34} {}",
        "File", "Score", "Headline", "Skills", "Gaps"
    ));
    lines.push("-".repeat(110));

    for record in projection {
        let id = if record.candidate_id.is_empty() {
            "N/A"
        } else {
            record.candidate_id.as_str()
        };
        let headline = match record.headline_text() {
            "" => "-",
            text => text,
        };
        lines.push(format!(
            "{:<30} {:<8} {:<28} {:<34} {}",
            id,
            fmt_score(record.reported_score()),
            headline,
            skills_cell(record.skills_normalized()),
            record.gaps.join(", ")
        ));
    }

    lines.join("\n")
}

/// Compare card for a single candidate. Contact values behind known PII
/// keys are masked before anything is shown.
pub fn candidate_detail(record: &CandidateRecord) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("File: {}", record.candidate_id));
    lines.push(format!("Fit Score: {}", fmt_score(record.reported_score())));
    let headline = match record.headline_text() {
        "" => "-",
        text => text,
    };
    lines.push(format!("Headline: {headline}"));

    if record.reasons.is_empty() {
        lines.push("Reasons: -".to_string());
    } else {
        lines.push("Reasons:".to_string());
        for reason in &record.reasons {
            lines.push(format!("  - {reason}"));
        }
    }

    lines.push(format!("Gaps: {}", join_or_dash(&record.gaps)));
    lines.push(format!(
        "Skills (Normalized): {}",
        join_or_dash(record.skills_normalized())
    ));

    let contacts = record.redacted_contacts();
    let contacts_json = serde_json::to_string_pretty(&contacts)
        .unwrap_or_else(|_| "{}".to_string());
    lines.push(format!("Contacts (Redacted): {contacts_json}"));

    lines.join("\n")
}

/// Summary block shown under the warehouse table.
pub fn stats_text(stats: &ProjectionStats) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!(
        "Candidates: {}   Average Fit Score: {}",
        stats.count, stats.average_score
    ));
    lines.push(format!("Top skills: {}", counts_cell(&stats.top_skills)));
    lines.push(format!("Top gaps: {}", counts_cell(&stats.top_gaps)));

    if !stats.score_buckets.is_empty() {
        lines.push("Score distribution:".to_string());
        for (bucket, count) in &stats.score_buckets {
            lines.push(format!("  {bucket}  {count}"));
        }
    }

    lines.join("\n")
}

/// `whoami` output for an authenticated session.
pub fn profile_text(profile: &UserProfile) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!(
        "Logged in as: {}",
        profile.username.as_deref().unwrap_or("N/A")
    ));
    if let Some(email) = &profile.email {
        lines.push(format!("Email: {email}"));
    }
    for (key, value) in &profile.extra {
        lines.push(format!("{key}: {}", display_value(value)));
    }

    lines.join("\n")
}

/// "N/A" for a missing score, the bare number otherwise.
fn fmt_score(score: Option<f64>) -> String {
    match score {
        Some(score) => format!("{score}"),
        None => "N/A".to_string(),
    }
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

/// First five skills, with a marker when more were reported.
fn skills_cell(skills: &[String]) -> String {
    let mut cell = skills
        .iter()
        .take(5)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if skills.len() > 5 {
        cell.push_str("...");
    }
    cell
}

fn counts_cell(counts: &[(String, usize)]) -> String {
    if counts.is_empty() {
        return "-".to_string();
    }
    counts
        .iter()
        .map(|(name, count)| format!("{name} ({count})"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
