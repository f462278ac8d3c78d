// src/warehouse/export.rs
//! CSV serialization of a warehouse projection.

use anyhow::{Context, Result};
use csv::{QuoteStyle, WriterBuilder};

use crate::types::CandidateRecord;

/// Header row, written without quoting.
pub const EXPORT_HEADERS: [&str; 5] = ["File", "Fit Score", "Headline", "Skills", "Gaps"];

/// Default file name for a warehouse export.
pub const DEFAULT_EXPORT_FILE: &str = "candidate_warehouse_export.csv";

/// Spreadsheet tools need the byte-order mark to detect UTF-8 and render
/// non-ASCII names correctly.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Serialize a projection to CSV bytes: BOM, bare header row, then one
/// row per record. String fields are always quoted with internal quotes
/// doubled, scores stay bare numbers, list fields join with "; ".
pub fn projection_to_csv(projection: &[CandidateRecord]) -> Result<Vec<u8>> {
    let mut out = UTF8_BOM.to_vec();

    // the header must stay unquoted, so it gets its own writer
    let mut header = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .from_writer(&mut out);
    header
        .write_record(EXPORT_HEADERS)
        .context("Failed to write CSV header")?;
    header.flush().context("Failed to write CSV header")?;
    drop(header);

    let mut body = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(&mut out);
    for record in projection {
        let score = record.effective_score().to_string();
        let skills = record.skills_normalized().join("; ");
        let gaps = record.gaps.join("; ");
        body.write_record([
            record.candidate_id.as_str(),
            score.as_str(),
            record.headline_text(),
            skills.as_str(),
            gaps.as_str(),
        ])
        .with_context(|| format!("Failed to write CSV row for {}", record.candidate_id))?;
    }
    body.flush().context("Failed to finish CSV body")?;
    drop(body);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> CandidateRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_csv_row_quoting_and_bom() {
        let projection = vec![record(json!({
            "candidate_id": "A,1",
            "fit_score": 80,
            "headline": "Dev \"X\"",
            "skills": {"normalized": ["Go", "Rust"]},
            "gaps": ["SQL"]
        }))];

        let bytes = projection_to_csv(&projection).unwrap();
        let expected = "\u{feff}File,Fit Score,Headline,Skills,Gaps\n\
                        \"A,1\",80,\"Dev \"\"X\"\"\",\"Go; Rust\",\"SQL\"\n";
        assert_eq!(bytes, expected.as_bytes());
    }

    #[test]
    fn test_missing_scores_export_as_zero() {
        let projection = vec![record(json!({"candidate_id": "bare.json"}))];

        let bytes = projection_to_csv(&projection).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.ends_with("\"bare.json\",0,\"\",\"\",\"\"\n"));
    }

    #[test]
    fn test_rows_keep_projection_order() {
        let projection = vec![
            record(json!({"candidate_id": "first.json", "fit_score": 10})),
            record(json!({"candidate_id": "second.json", "fit_score": 90})),
        ];

        let text = String::from_utf8(projection_to_csv(&projection).unwrap()).unwrap();
        let first = text.find("first.json").unwrap();
        let second = text.find("second.json").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_fractional_scores_are_not_quoted() {
        let projection = vec![record(json!({"candidate_id": "f.json", "fit_score": 76.5}))];

        let text = String::from_utf8(projection_to_csv(&projection).unwrap()).unwrap();
        assert!(text.contains("\"f.json\",76.5,"));
    }
}
