// src/types/candidate.rs
//! Candidate records as returned by `GET /resumes`. Records are kept close
//! to the wire shape: unknown fields ride along in `extra` so a record can
//! be shown or re-serialized without losing what the server sent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Contact field names that are personally identifying. Matched against the
/// lowercased key name.
pub const PII_CONTACT_KEYS: [&str; 8] = [
    "email", "phone", "location", "address", "linkedin", "github", "line", "facebook",
];

/// Shown in place of a redacted contact value.
pub const REDACTION_MASK: &str = "•••";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CandidateRecord {
    /// Unique key within a fetch result set (the server uses the stored
    /// file name).
    #[serde(default, deserialize_with = "crate::types::null_default")]
    pub candidate_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "SkillSet::is_empty")]
    pub skills: SkillSet,
    #[serde(
        default,
        deserialize_with = "crate::types::null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub gaps: Vec<String>,
    #[serde(
        default,
        deserialize_with = "crate::types::null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub reasons: Vec<String>,
    #[serde(
        default,
        deserialize_with = "crate::types::null_default",
        skip_serializing_if = "Map::is_empty"
    )]
    pub contacts: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Skills arrive in two shapes depending on which stage of the pipeline
/// produced the stored record: an object carrying a `normalized` list, or
/// a bare list of skill names.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum SkillSet {
    Structured(SkillDetail),
    Flat(Vec<String>),
    Other(Value),
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SkillDetail {
    #[serde(default)]
    pub normalized: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for SkillSet {
    fn default() -> Self {
        SkillSet::Flat(Vec::new())
    }
}

impl SkillSet {
    pub fn normalized(&self) -> &[String] {
        match self {
            SkillSet::Structured(detail) => &detail.normalized,
            SkillSet::Flat(list) => list,
            SkillSet::Other(_) => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SkillSet::Structured(detail) => detail.normalized.is_empty() && detail.extra.is_empty(),
            SkillSet::Flat(list) => list.is_empty(),
            SkillSet::Other(value) => value.is_null(),
        }
    }
}

impl CandidateRecord {
    /// Score as reported by the server: `fit_score` wins over `score`,
    /// `None` when the record carries neither.
    pub fn reported_score(&self) -> Option<f64> {
        self.fit_score.or(self.score)
    }

    /// Score used for range filtering, sorting and export. Records without
    /// any score count as 0.
    pub fn effective_score(&self) -> f64 {
        self.reported_score().unwrap_or(0.0)
    }

    pub fn headline_text(&self) -> &str {
        self.headline.as_deref().unwrap_or("")
    }

    pub fn skills_normalized(&self) -> &[String] {
        self.skills.normalized()
    }

    /// Contacts with every PII-named field masked, safe to display.
    pub fn redacted_contacts(&self) -> Map<String, Value> {
        redact_contacts(&self.contacts)
    }

    /// Whole record as JSON with the contacts masked. Machine-readable
    /// output goes through this so it never carries more than the screen
    /// shows.
    pub fn to_redacted_value(&self) -> Value {
        let mut value = serde_json::json!(self);
        if let Some(map) = value.as_object_mut() {
            if map.contains_key("contacts") {
                map.insert(
                    "contacts".to_string(),
                    Value::Object(self.redacted_contacts()),
                );
            }
        }
        value
    }
}

/// Replaces the value of every contact field whose lowercased name is in
/// the PII set. Values are masked regardless of their type.
pub fn redact_contacts(contacts: &Map<String, Value>) -> Map<String, Value> {
    contacts
        .iter()
        .map(|(key, value)| {
            if PII_CONTACT_KEYS.contains(&key.to_lowercase().as_str()) {
                (key.clone(), Value::String(REDACTION_MASK.to_string()))
            } else {
                (key.clone(), value.clone())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> CandidateRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_fit_score_takes_precedence() {
        let r = record(json!({"candidate_id": "a.json", "fit_score": 82, "score": 40}));
        assert_eq!(r.effective_score(), 82.0);
    }

    #[test]
    fn test_score_fallback_then_zero() {
        let with_score = record(json!({"candidate_id": "a.json", "score": 40}));
        assert_eq!(with_score.effective_score(), 40.0);

        let bare = record(json!({"candidate_id": "a.json"}));
        assert_eq!(bare.reported_score(), None);
        assert_eq!(bare.effective_score(), 0.0);
    }

    #[test]
    fn test_skills_structured_shape() {
        let r = record(json!({
            "candidate_id": "a.json",
            "skills": {"normalized": ["Python", "SQL"], "mined": ["ETL"]}
        }));
        assert_eq!(r.skills_normalized(), ["Python", "SQL"]);
    }

    #[test]
    fn test_skills_flat_shape() {
        let r = record(json!({"candidate_id": "a.json", "skills": ["Go", "Rust"]}));
        assert_eq!(r.skills_normalized(), ["Go", "Rust"]);
    }

    #[test]
    fn test_skills_unusable_shape_is_empty() {
        let r = record(json!({"candidate_id": "a.json", "skills": "Python"}));
        assert!(r.skills_normalized().is_empty());
    }

    #[test]
    fn test_redaction_masks_pii_fields_only() {
        let r = record(json!({
            "candidate_id": "a.json",
            "contacts": {"email": "a@b.com", "location": "NYC", "role": "Eng"}
        }));
        let redacted = r.redacted_contacts();
        assert_eq!(redacted["email"], REDACTION_MASK);
        assert_eq!(redacted["location"], REDACTION_MASK);
        assert_eq!(redacted["role"], "Eng");
    }

    #[test]
    fn test_redaction_is_case_insensitive_and_type_blind() {
        let r = record(json!({
            "candidate_id": "a.json",
            "contacts": {"Email": "a@b.com", "phone": 66123456789u64}
        }));
        let redacted = r.redacted_contacts();
        assert_eq!(redacted["Email"], REDACTION_MASK);
        assert_eq!(redacted["phone"], REDACTION_MASK);
    }

    #[test]
    fn test_redacted_value_keeps_everything_but_pii() {
        let r = record(json!({
            "candidate_id": "a.json",
            "fit_score": 70,
            "contacts": {"email": "a@b.com", "role": "Eng"},
            "snapshot": {"rank": 1}
        }));

        let value = r.to_redacted_value();
        assert_eq!(value["candidate_id"], "a.json");
        assert_eq!(value["contacts"]["email"], REDACTION_MASK);
        assert_eq!(value["contacts"]["role"], "Eng");
        assert_eq!(value["snapshot"]["rank"], 1);
    }

    #[test]
    fn test_explicit_nulls_read_as_absent() {
        let r = record(json!({
            "candidate_id": null,
            "fit_score": null,
            "headline": null,
            "skills": null,
            "gaps": null,
            "reasons": null,
            "contacts": null
        }));

        assert_eq!(r.candidate_id, "");
        assert_eq!(r.reported_score(), None);
        assert_eq!(r.headline_text(), "");
        assert!(r.skills_normalized().is_empty());
        assert!(r.gaps.is_empty());
        assert!(r.reasons.is_empty());
        assert!(r.contacts.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let r = record(json!({
            "candidate_id": "a.json",
            "fit_score": 70,
            "snapshot": {"top_reasons": ["strong Python"]}
        }));
        assert!(r.extra.contains_key("snapshot"));

        let back = serde_json::to_value(&r).unwrap();
        assert_eq!(back["snapshot"]["top_reasons"][0], "strong Python");
    }
}
