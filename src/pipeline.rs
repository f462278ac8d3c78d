// src/pipeline.rs
//! Upload-and-score pipeline. The flow is two named stages, parse then
//! score, with the parsed document kept around because the PDF report
//! endpoint wants it back verbatim.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::api::{resume_content_type, ApiClient};
use crate::error::ApiError;
use crate::types::{ParsedResume, ScoreReport};

/// Output of a full pipeline run.
pub struct ScoredResume {
    pub parsed: ParsedResume,
    pub report: ScoreReport,
}

pub struct ScorePipeline<'a> {
    client: &'a ApiClient,
}

impl<'a> ScorePipeline<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Stage 1: read the document from disk and have the service parse it.
    /// Only PDF and DOCX files are accepted.
    pub async fn parse(&self, file_path: &Path) -> Result<ParsedResume> {
        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid file path: {}", file_path.display()))?;

        let content_type = resume_content_type(file_name).ok_or_else(|| {
            anyhow::anyhow!(
                "Unsupported file format: {} (expected .pdf or .docx)",
                file_name
            )
        })?;

        let content = tokio::fs::read(file_path)
            .await
            .with_context(|| format!("Failed to read file: {}", file_path.display()))?;

        let parsed = self
            .client
            .parse_resume(file_name, content_type, content)
            .await?;
        Ok(parsed)
    }

    /// Stage 2: score a parsed resume.
    pub async fn score(&self, parsed: &ParsedResume) -> Result<ScoreReport, ApiError> {
        self.client.score_resume(parsed).await
    }

    /// Both stages in sequence.
    pub async fn run(&self, file_path: &Path) -> Result<ScoredResume> {
        let parsed = self.parse(file_path).await?;
        let report = self.score(&parsed).await?;
        Ok(ScoredResume { parsed, report })
    }
}

/// Fetch the UCB PDF for a parsed resume and write it under `out_dir`,
/// named after the parsed candidate. Returns the written path.
pub async fn save_report(
    client: &ApiClient,
    parsed: &ParsedResume,
    out_dir: &Path,
) -> Result<PathBuf> {
    let bytes = client.download_report(parsed).await?;

    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let path = out_dir.join(parsed.report_filename());
    tokio::fs::write(&path, &bytes)
        .await
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    info!("Saved UCB report to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_parse_rejects_unsupported_format() {
        let client = ApiClient::new("http://127.0.0.1:0/api/v1".to_string()).unwrap();
        let pipeline = ScorePipeline::new(&client);

        let err = pipeline
            .parse(Path::new("notes.txt"))
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("Unsupported file format"));
    }

    #[tokio::test]
    async fn test_parse_rejects_missing_file_name() {
        let client = ApiClient::new("http://127.0.0.1:0/api/v1".to_string()).unwrap();
        let pipeline = ScorePipeline::new(&client);

        let err = pipeline
            .parse(Path::new("/"))
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("Invalid file path"));
    }
}
