//! Typed HTTP client for the pipeline API.

use std::path::Path;

use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub file_path: String,
    pub file_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    pub parsed_resume: String,
}

#[derive(Debug, Deserialize)]
pub struct BuildResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis: AnalysisReport,
}

/// Structured match report; mirrors the server's analysis schema.
/// Fields the model left null simply do not render.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisReport {
    pub match_score: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub insights: Option<String>,
}

pub struct PipelineClient {
    http: reqwest::Client,
    base_url: String,
}

impl PipelineClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// POST /uploadResume — multipart upload of the resume PDF.
    pub async fn upload_resume(&self, path: &Path) -> Result<UploadResponse, ApiError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume.pdf")
            .to_string();
        tracing::debug!(file = %path.display(), "uploading resume");
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(self.url("/uploadResume"))
            .multipart(form)
            .send()
            .await?;
        Self::check_json(response).await
    }

    /// POST /parseResume — extract text from the uploaded file.
    pub async fn parse_resume(&self, file_path: &str) -> Result<ParseResponse, ApiError> {
        let response = self
            .http
            .post(self.url("/parseResume"))
            .json(&json!({ "filePath": file_path }))
            .send()
            .await?;
        Self::check_json(response).await
    }

    /// POST /buildVectorDb — rebuild the persisted index from parsed text.
    pub async fn build_vector_db(&self, parsed_text: &str) -> Result<BuildResponse, ApiError> {
        let response = self
            .http
            .post(self.url("/buildVectorDb"))
            .json(&json!({ "parsedText": parsed_text }))
            .send()
            .await?;
        Self::check_json(response).await
    }

    /// POST /analyzeResume — structured match report for a job description.
    pub async fn analyze_resume(&self, job_description: &str) -> Result<AnalyzeResponse, ApiError> {
        let response = self
            .http
            .post(self.url("/analyzeResume"))
            .json(&json!({ "jobDescription": job_description }))
            .send()
            .await?;
        Self::check_json(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), %message, "request failed");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = PipelineClient::new("http://localhost:3000/");
        assert_eq!(client.url("/parseResume"), "http://localhost:3000/parseResume");
    }

    #[test]
    fn test_analysis_report_tolerates_missing_fields() {
        let json = r#"{"analysis": {"match_score": 63}}"#;
        let parsed: AnalyzeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.analysis.match_score, 63.0);
        assert!(parsed.analysis.strengths.is_empty());
        assert!(parsed.analysis.insights.is_none());
    }
}
