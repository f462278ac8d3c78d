// src/api/client.rs
//! HTTP client for the UCB resume-scoring service - JSON in, JSON out,
//! except for the multipart upload and the binary PDF stream.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{error, info, trace};

use crate::error::ApiError;
use crate::types::{CandidateRecord, ParsedResume, ScoreReport, UserProfile};

const RESUMES_ENDPOINT: &str = "/resumes";
const DELETE_RESUME_ENDPOINT: &str = "/resume";
const PARSE_RESUME_ENDPOINT: &str = "/parse-resume";
const SCORE_HR_ENDPOINT: &str = "/score-hr";
const UCB_PDF_ENDPOINT: &str = "/ucb-pdf";
const PROFILE_ENDPOINT: &str = "/users/me";

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client against the given base URL. No request timeout
    /// is set; the transport's own limits are the only bound.
    pub fn new(base_url: String) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full candidate list from the warehouse.
    pub async fn fetch_candidates(&self) -> Result<Vec<CandidateRecord>, ApiError> {
        let url = format!("{}{}", self.base_url, RESUMES_ENDPOINT);
        info!("Calling candidate list service: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let text = Self::success_text(response).await?;
        let records: Vec<CandidateRecord> = serde_json::from_str(&text).map_err(|e| {
            ApiError::DataShape(format!("candidate list is not a JSON array of records: {e}"))
        })?;

        trace!("Fetched {} candidate records", records.len());
        Ok(records)
    }

    /// Delete one candidate's stored files. The server answers
    /// `204 No Content` on success; any 2xx counts.
    pub async fn delete_candidate(&self, candidate_id: &str) -> Result<(), ApiError> {
        let url = format!(
            "{}{}/{}",
            self.base_url,
            DELETE_RESUME_ENDPOINT,
            encode_id_segment(candidate_id)
        );
        info!("Calling delete service for candidate: {}", candidate_id);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        Self::success_text(response).await?;
        Ok(())
    }

    /// Upload a resume document for parsing. The file travels as a
    /// multipart `file` part with its original name and content type.
    pub async fn parse_resume(
        &self,
        file_name: &str,
        content_type: &str,
        content: Vec<u8>,
    ) -> Result<ParsedResume, ApiError> {
        let url = format!("{}{}", self.base_url, PARSE_RESUME_ENDPOINT);

        let form = Form::new().part(
            "file",
            Part::bytes(content)
                .file_name(file_name.to_string())
                .mime_str(content_type)
                .map_err(ApiError::Transport)?,
        );

        info!("Calling resume parse service: {}", url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let text = Self::success_text(response).await?;
        let document: Value = serde_json::from_str(&text)
            .map_err(|e| ApiError::DataShape(format!("parse result is not valid JSON: {e}")))?;

        Ok(ParsedResume(document))
    }

    /// Score a parsed resume against the HR profile.
    pub async fn score_resume(&self, parsed: &ParsedResume) -> Result<ScoreReport, ApiError> {
        let url = format!("{}{}", self.base_url, SCORE_HR_ENDPOINT);
        info!("Calling scoring service: {}", url);

        let response = self
            .client
            .post(&url)
            .json(parsed)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let text = Self::success_text(response).await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::DataShape(format!("score result has an unexpected shape: {e}")))
    }

    /// Generate the UCB PDF report for a parsed resume, returning the raw
    /// PDF bytes.
    pub async fn download_report(&self, parsed: &ParsedResume) -> Result<Vec<u8>, ApiError> {
        let url = format!("{}{}", self.base_url, UCB_PDF_ENDPOINT);
        info!("Calling report service: {}", url);

        let response = self
            .client
            .post(&url)
            .json(parsed)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = response.status();
        trace!("Response status: {}", status);

        if status.is_success() {
            let bytes = response.bytes().await.map_err(ApiError::Transport)?;
            Ok(bytes.to_vec())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            error!("Report service error response: {}", error_text);
            Err(ApiError::from_error_response(status, &error_text))
        }
    }

    /// Profile of the authenticated user.
    pub async fn fetch_profile(&self, token: &str) -> Result<UserProfile, ApiError> {
        let url = format!("{}{}", self.base_url, PROFILE_ENDPOINT);
        trace!("Calling profile service: {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let text = Self::success_text(response).await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::DataShape(format!("profile has an unexpected shape: {e}")))
    }

    /// Read the body as text, then branch on the status so error bodies
    /// are never lost.
    async fn success_text(response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();
        trace!("Response status: {}", status);

        let text = response.text().await.map_err(ApiError::Transport)?;

        if status.is_success() {
            Ok(text)
        } else {
            error!("Service error response: {}", text);
            Err(ApiError::from_error_response(status, &text))
        }
    }
}

/// Bytes escaped when a candidate id is spliced into a URL path: every
/// ASCII character except letters, digits and `- _ . ! ~ * ' ( )`.
const ID_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Escape a candidate id for the delete URL. Ids are stored file names,
/// so they can carry `#`, `?`, `/` or spaces that would otherwise cut
/// the path short.
fn encode_id_segment(candidate_id: &str) -> String {
    utf8_percent_encode(candidate_id, ID_ENCODE_SET).to_string()
}

/// Content type for a resume upload, by file extension. The service
/// accepts PDF and DOCX documents.
pub fn resume_content_type(file_name: &str) -> Option<&'static str> {
    let lower_name = file_name.to_lowercase();
    if lower_name.ends_with(".pdf") {
        Some("application/pdf")
    } else if lower_name.ends_with(".docx") {
        Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
    } else {
        None
    }
}
