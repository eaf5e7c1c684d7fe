//! Text Extractor — plain text from a PDF on disk.

use std::path::Path;

use crate::errors::AppError;

/// Extracts the full text of a PDF, pages concatenated in document order,
/// trimmed of leading/trailing whitespace.
///
/// Any loader error propagates as an extraction failure; there is no
/// partial-text fallback. Blocking — call from `spawn_blocking` in handlers.
pub fn extract_pdf_text(path: &Path) -> Result<String, AppError> {
    let text = pdf_extract::extract_text(path)
        .map_err(|e| AppError::Extraction(format!("{}: {e}", path.display())))?;
    Ok(text.trim().to_string())
}
