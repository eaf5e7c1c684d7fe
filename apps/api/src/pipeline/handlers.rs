//! Axum route handlers for the four pipeline steps.
//!
//! Each operation is a single request/response with no server-side session;
//! the only state carried between calls is the upload directory and the
//! persisted vector index.

use std::path::Path;

use anyhow::anyhow;
use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use chrono::Utc;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::{ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM};
use crate::llm_client::Embedder;
use crate::pipeline::chunking::RecursiveCharacterSplitter;
use crate::pipeline::extract::extract_pdf_text;
use crate::pipeline::models::{
    AnalysisReport, AnalyzeResponse, AnalyzeResumeRequest, BuildResponse, BuildVectorDbRequest,
    ParseResponse, ParseResumeRequest, UploadResponse,
};
use crate::state::AppState;
use crate::vector_store::VectorStore;

/// How many chunks are retrieved as context for the analysis prompt.
const TOP_K: usize = 5;
/// Visible separator between retrieved chunks in the prompt.
const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// POST /uploadResume
///
/// Accepts a multipart `file` field and writes it to the upload directory
/// as `<unix-millis>-<original-name>`.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;

        let file_path = save_upload(&state.config.upload_dir, &file_name, data).await?;
        info!(%file_path, %file_name, "resume uploaded");

        return Ok(Json(UploadResponse {
            message: "File uploaded successfully".to_string(),
            file_path,
            file_name,
        }));
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}

/// POST /parseResume
///
/// Extracts the plain text of a previously uploaded PDF. The parsed text is
/// returned to the client and not persisted server-side.
pub async fn handle_parse(
    State(_state): State<AppState>,
    Json(request): Json<ParseResumeRequest>,
) -> Result<Json<ParseResponse>, AppError> {
    let file_path = request
        .file_path
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::Validation("filePath required".to_string()))?;

    // pdf-extract is CPU-bound; keep it off the async runtime.
    let parsed_resume = tokio::task::spawn_blocking(move || {
        extract_pdf_text(Path::new(&file_path))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow!("extraction task failed: {e}")))??;

    info!(chars = parsed_resume.len(), "resume parsed");

    Ok(Json(ParseResponse {
        parsed_resume,
        status: 200,
    }))
}

/// POST /buildVectorDb
///
/// Chunks the parsed text, embeds every chunk, and overwrites the persisted
/// vector index. Each analysis run operates against the index built from the
/// most recently parsed resume only.
pub async fn handle_build_vector_db(
    State(state): State<AppState>,
    Json(request): Json<BuildVectorDbRequest>,
) -> Result<Json<BuildResponse>, AppError> {
    let parsed_text = request
        .parsed_text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("parsedText is required".to_string()))?;

    let chunks = RecursiveCharacterSplitter::default().split(&parsed_text);

    let _guard = state.index_guard.lock().await;
    let store = VectorStore::rebuild(&state.config.vector_dir, &chunks, &state.llm)
        .await
        .map_err(|e| AppError::Index(e.to_string()))?;

    info!(chunks = store.len(), "vector index rebuilt");

    Ok(Json(BuildResponse {
        message: "Vector DB created".to_string(),
    }))
}

/// POST /analyzeResume
///
/// Loads the persisted index, retrieves the top chunks for the job
/// description, and asks the completion model for a structured match report.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeResumeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let job_description = request
        .job_description
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("jobDescription required".to_string()))?;

    let store = {
        let _guard = state.index_guard.lock().await;
        VectorStore::load(&state.config.vector_dir).map_err(|e| AppError::Index(e.to_string()))?
    };

    let query_embedding = state
        .llm
        .embed(&job_description)
        .await
        .map_err(|e| AppError::Llm(format!("Failed to embed job description: {e}")))?;

    let hits = store.similarity_search(&query_embedding, TOP_K);
    let resume_context = hits
        .iter()
        .map(|h| h.text)
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR);

    let prompt = ANALYSIS_PROMPT_TEMPLATE
        .replace("{job_description}", &job_description)
        .replace("{resume_context}", &resume_context);

    let analysis: AnalysisReport = state
        .llm
        .generate_json(&prompt, ANALYSIS_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Resume analysis failed: {e}")))?;

    info!(
        retrieved = hits.len(),
        match_score = analysis.match_score,
        "resume analyzed"
    );

    Ok(Json(AnalyzeResponse { analysis }))
}

async fn save_upload(dir: &Path, original_name: &str, data: Bytes) -> Result<String, AppError> {
    let stamped = format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        sanitize_file_name(original_name)
    );
    let dest = dir.join(stamped);
    tokio::fs::write(&dest, &data)
        .await
        .map_err(|e| AppError::Internal(anyhow!("failed to write upload {}: {e}", dest.display())))?;
    Ok(dest.to_string_lossy().into_owned())
}

/// Keeps only the final path component of a client-supplied filename.
fn sanitize_file_name(name: &str) -> &str {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    if base.is_empty() {
        "resume.pdf"
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name_strips_path_components() {
        assert_eq!(sanitize_file_name("resume.pdf"), "resume.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\cv.pdf"), "cv.pdf");
        assert_eq!(sanitize_file_name("dir/"), "resume.pdf");
    }
}
