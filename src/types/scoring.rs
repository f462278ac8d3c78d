// src/types/scoring.rs
//! Payloads exchanged with the parse/score/report endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parsed resume as returned by `POST /parse-resume`. The document is kept
/// verbatim because the scoring and PDF endpoints expect it back unchanged.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(transparent)]
pub struct ParsedResume(pub Value);

impl ParsedResume {
    /// Candidate name extracted by the parser, when present and non-empty.
    pub fn name(&self) -> Option<&str> {
        self.0
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }

    /// File name the generated PDF report is saved under. Path separators
    /// in the parsed name are replaced so the file stays in its directory.
    pub fn report_filename(&self) -> String {
        match self.name() {
            Some(name) => format!("{}_UCB_Report.pdf", name.replace(['/', '\\'], "_")),
            None => "Candidate_UCB_Report.pdf".to_string(),
        }
    }
}

/// Scored result from `POST /score-hr`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScoreReport {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub summary: Option<ScoreSummary>,
    #[serde(default, deserialize_with = "crate::types::null_default")]
    pub breakdown: Vec<SkillBreakdown>,
    #[serde(default, deserialize_with = "crate::types::null_default")]
    pub notes: Vec<String>,
    /// Named components scored as 0-1 fractions, the basis of the score
    /// profile rendering.
    #[serde(default, deserialize_with = "crate::types::null_default")]
    pub score_components: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScoreReport {
    /// Breakdown entries ordered by skill name, case-insensitively.
    /// Entries without a skill name sort first.
    pub fn sorted_breakdown(&self) -> Vec<&SkillBreakdown> {
        let mut items: Vec<&SkillBreakdown> = self.breakdown.iter().collect();
        items.sort_by_key(|item| item.skill.as_deref().unwrap_or("").to_lowercase());
        items
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ScoreSummary {
    #[serde(default, deserialize_with = "crate::types::null_default")]
    pub matched_skills: Vec<String>,
    #[serde(default, deserialize_with = "crate::types::null_default")]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub matched_percent: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SkillBreakdown {
    #[serde(default)]
    pub skill: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Profile returned by `GET /users/me`. The shape is backend-defined, so
/// only the common fields are typed.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserProfile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_filename_uses_parsed_name() {
        let parsed = ParsedResume(json!({"name": "Jane Doe", "skills": ["Python"]}));
        assert_eq!(parsed.report_filename(), "Jane Doe_UCB_Report.pdf");
    }

    #[test]
    fn test_report_filename_default_without_name() {
        let missing = ParsedResume(json!({"skills": ["Python"]}));
        assert_eq!(missing.report_filename(), "Candidate_UCB_Report.pdf");

        let empty = ParsedResume(json!({"name": ""}));
        assert_eq!(empty.report_filename(), "Candidate_UCB_Report.pdf");
    }

    #[test]
    fn test_report_filename_strips_path_separators() {
        let tricky = ParsedResume(json!({"name": "../Jane/Doe"}));
        assert_eq!(tricky.report_filename(), ".._Jane_Doe_UCB_Report.pdf");
    }

    #[test]
    fn test_nulled_report_fields_read_as_empty() {
        let report: ScoreReport = serde_json::from_value(json!({
            "name": "Jane",
            "score": 70,
            "level": null,
            "summary": {
                "matched_skills": null,
                "missing_skills": null,
                "matched_percent": null
            },
            "breakdown": null,
            "notes": null,
            "score_components": null
        }))
        .unwrap();

        assert_eq!(report.level, None);
        assert!(report.breakdown.is_empty());
        assert!(report.notes.is_empty());
        assert!(report.score_components.is_empty());

        let summary = report.summary.unwrap();
        assert!(summary.matched_skills.is_empty());
        assert!(summary.missing_skills.is_empty());
        assert_eq!(summary.matched_percent, None);
    }

    #[test]
    fn test_breakdown_sorts_by_skill_name() {
        let report: ScoreReport = serde_json::from_value(json!({
            "name": "Jane",
            "score": 0,
            "breakdown": [
                {"skill": "sql", "level": "strong"},
                {"skill": "AWS", "level": "missing"},
                {"level": "partial"}
            ]
        }))
        .unwrap();

        let sorted = report.sorted_breakdown();
        assert_eq!(sorted[0].skill, None);
        assert_eq!(sorted[1].skill.as_deref(), Some("AWS"));
        assert_eq!(sorted[2].skill.as_deref(), Some("sql"));
        // a reported zero is a real score, not a missing one
        assert_eq!(report.score, Some(0.0));
    }
}
