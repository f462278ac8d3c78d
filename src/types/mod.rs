// src/types/mod.rs
//! Wire types shared by the API client and the warehouse view

use serde::{Deserialize, Deserializer};

pub mod candidate;
pub mod scoring;

/// Reads an explicit JSON `null` as the field's default, like a missing
/// key. List and map fields use this so a nulled-out field never fails
/// the whole record.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub use candidate::{redact_contacts, CandidateRecord, SkillDetail, SkillSet};
pub use candidate::{PII_CONTACT_KEYS, REDACTION_MASK};
pub use scoring::{ParsedResume, ScoreReport, ScoreSummary, SkillBreakdown, UserProfile};
