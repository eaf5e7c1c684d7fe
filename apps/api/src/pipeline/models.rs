//! Wire types for the four pipeline endpoints.
//!
//! Request fields are `Option` so a missing field maps to a 400 validation
//! error instead of a body-deserialization reject.

use serde::{Deserialize, Deserializer, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Requests
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResumeRequest {
    pub file_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildVectorDbRequest {
    pub parsed_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResumeRequest {
    pub job_description: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Responses
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub file_path: String,
    pub file_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    pub parsed_resume: String,
    pub status: u16,
}

#[derive(Debug, Serialize)]
pub struct BuildResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: AnalysisReport,
}

/// Structured match report produced by the completion model.
///
/// `match_score` is required; the model may set the remaining fields to
/// null, which deserializes to empty/None and simply does not render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub match_score: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub weaknesses: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub insights: Option<String>,
}

/// Treats an explicit JSON `null` the same as a missing field.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
