/// LLM Client — the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All completion and embedding traffic MUST go through this module.
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The completion model used for resume analysis.
pub const COMPLETION_MODEL: &str = "gemini-2.5-flash-lite";
/// The embedding model used for chunk and query vectors.
pub const EMBEDDING_MODEL: &str = "gemini-embedding-001";
const MAX_RETRIES: u32 = 3;
/// Gemini caps batchEmbedContents at 100 requests per call.
const EMBED_BATCH_LIMIT: usize = 100;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Seam for converting text to vectors; the vector store depends on this
/// trait rather than on the concrete Gemini client so tests can substitute
/// a deterministic embedder.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, LlmError>;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let mut batch = self.embed_batch(&[text]).await?;
        if batch.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(batch.remove(0))
    }
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct ContentPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: ContentPayload<'a>,
    contents: Vec<ContentPayload<'a>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Extracts the text of the first candidate's first text part.
    pub fn text(&self) -> Option<&str> {
        self.candidates.iter().find_map(|c| {
            let content = c.content.as_ref()?;
            content.parts.iter().find_map(|p| p.text.as_deref())
        })
    }
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedRequest<'a>>,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: String,
    content: ContentPayload<'a>,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// The single Gemini client used by all handlers.
/// Wraps generateContent with retry logic and structured output helpers,
/// and batchEmbedContents for embeddings.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Makes a raw generateContent call, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn generate(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<GenerateContentResponse, LlmError> {
        let request_body = GenerateContentRequest {
            system_instruction: ContentPayload {
                role: None,
                parts: vec![TextPart { text: system }],
            },
            contents: vec![ContentPayload {
                role: Some("user"),
                parts: vec![TextPart { text: prompt }],
            }],
        };

        let url = format!("{GEMINI_API_BASE}/{COMPLETION_MODEL}:generateContent");
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Gemini API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiErrorEnvelope>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: GenerateContentResponse = response.json().await?;

            if let Some(usage) = &llm_response.usage_metadata {
                debug!(
                    "LLM call succeeded: prompt_tokens={:?}, candidate_tokens={:?}",
                    usage.prompt_token_count, usage.candidates_token_count
                );
            }

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Convenience method that calls the LLM and deserializes the text response as JSON.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let response = self.generate(prompt, system).await?;

        let text = response.text().ok_or(LlmError::EmptyContent)?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

#[async_trait]
impl Embedder for GeminiClient {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, LlmError> {
        let url = format!("{GEMINI_API_BASE}/{EMBEDDING_MODEL}:batchEmbedContents");
        let mut embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(EMBED_BATCH_LIMIT) {
            let request_body = BatchEmbedRequest {
                requests: batch
                    .iter()
                    .map(|text| EmbedRequest {
                        model: format!("models/{EMBEDDING_MODEL}"),
                        content: ContentPayload {
                            role: None,
                            parts: vec![TextPart { text }],
                        },
                    })
                    .collect(),
            };

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiErrorEnvelope>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let batch_response: BatchEmbedResponse = response.json().await?;
            embeddings.extend(batch_response.embeddings.into_iter().map(|e| e.values));
        }

        debug!("Embedded {} texts", embeddings.len());

        Ok(embeddings)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
