//! Persisted vector index with cosine-similarity search.
//!
//! One global index per process, stored as a single JSON file. The index is
//! rebuilt wholesale on every build request — there is no incremental update,
//! deletion, or namespacing. Callers serialize rebuild and load through the
//! `index_guard` mutex in `AppState`.

use std::cmp::Ordering;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm_client::Embedder;

const INDEX_FILE: &str = "index.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("vector index has not been built yet")]
    NotBuilt,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("index file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("embedding failed: {0}")]
    Embedding(String),
}

/// One chunk of resume text with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A search result: a borrowed chunk and its cosine similarity to the query.
#[derive(Debug)]
pub struct SearchHit<'a> {
    pub text: &'a str,
    pub score: f32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VectorStore {
    entries: Vec<IndexedChunk>,
}

impl VectorStore {
    /// Embeds `chunks` and writes a fresh index to `dir`, replacing any
    /// prior index.
    pub async fn rebuild(
        dir: &Path,
        chunks: &[String],
        embedder: &dyn Embedder,
    ) -> Result<Self, StoreError> {
        let texts: Vec<&str> = chunks.iter().map(String::as_str).collect();
        let embeddings = embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| StoreError::Embedding(e.to_string()))?;

        if embeddings.len() != chunks.len() {
            return Err(StoreError::Embedding(format!(
                "expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let store = Self {
            entries: chunks
                .iter()
                .zip(embeddings)
                .map(|(text, embedding)| IndexedChunk {
                    text: text.clone(),
                    embedding,
                })
                .collect(),
        };
        store.save(dir)?;
        Ok(store)
    }

    /// Reads the persisted index from `dir`. Fails with [`StoreError::NotBuilt`]
    /// if no index has ever been written there.
    pub fn load(dir: &Path) -> Result<Self, StoreError> {
        let path = dir.join(INDEX_FILE);
        if !path.exists() {
            return Err(StoreError::NotBuilt);
        }
        let bytes = std::fs::read(&path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Writes the index to `dir` atomically: temp file, then rename over the
    /// previous index.
    fn save(&self, dir: &Path) -> Result<(), StoreError> {
        std::fs::create_dir_all(dir)?;
        let tmp = dir.join(format!("{INDEX_FILE}.tmp"));
        std::fs::write(&tmp, serde_json::to_vec(self)?)?;
        std::fs::rename(&tmp, dir.join(INDEX_FILE))?;
        Ok(())
    }

    /// Top-`k` chunks by cosine similarity to `query`, descending.
    pub fn similarity_search(&self, query: &[f32], k: usize) -> Vec<SearchHit<'_>> {
        let mut hits: Vec<SearchHit<'_>> = self
            .entries
            .iter()
            .map(|entry| SearchHit {
                text: &entry.text,
                score: cosine_similarity(query, &entry.embedding),
            })
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        hits.truncate(k);
        hits
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    fn texts(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.text.as_str()).collect()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;

    /// Deterministic test embedder: each text maps to a 3-dim vector derived
    /// from its length and first byte.
    struct MockEmbedder;

    #[async_trait]
    impl Embedder for MockEmbedder {
        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, LlmError> {
            Ok(texts
                .iter()
                .map(|t| {
                    vec![
                        t.len() as f32,
                        *t.as_bytes().first().unwrap_or(&0) as f32,
                        1.0,
                    ]
                })
                .collect())
        }
    }

    fn chunks(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_cosine_similarity_parallel_and_orthogonal() {
        assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_similarity_search_ranks_descending_and_truncates() {
        let store = VectorStore {
            entries: vec![
                IndexedChunk {
                    text: "far".into(),
                    embedding: vec![0.0, 1.0],
                },
                IndexedChunk {
                    text: "near".into(),
                    embedding: vec![1.0, 0.1],
                },
                IndexedChunk {
                    text: "middle".into(),
                    embedding: vec![1.0, 1.0],
                },
            ],
        };
        let hits = store.similarity_search(&[1.0, 0.0], 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "near");
        assert_eq!(hits[1].text, "middle");
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn test_load_before_build_is_not_built() {
        let dir = tempfile::tempdir().unwrap();
        let err = VectorStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::NotBuilt));
    }

    #[tokio::test]
    async fn test_rebuild_persists_and_loads() {
        let dir = tempfile::tempdir().unwrap();
        let built = VectorStore::rebuild(dir.path(), &chunks(&["alpha", "beta"]), &MockEmbedder)
            .await
            .unwrap();
        assert_eq!(built.len(), 2);

        let loaded = VectorStore::load(dir.path()).unwrap();
        assert_eq!(loaded.texts(), vec!["alpha", "beta"]);
    }

    #[tokio::test]
    async fn test_rebuild_replaces_prior_index() {
        let dir = tempfile::tempdir().unwrap();
        VectorStore::rebuild(dir.path(), &chunks(&["first resume"]), &MockEmbedder)
            .await
            .unwrap();
        VectorStore::rebuild(dir.path(), &chunks(&["second", "resume"]), &MockEmbedder)
            .await
            .unwrap();

        let loaded = VectorStore::load(dir.path()).unwrap();
        assert_eq!(loaded.texts(), vec!["second", "resume"]);
    }

    #[tokio::test]
    async fn test_rebuild_with_no_chunks_is_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorStore::rebuild(dir.path(), &[], &MockEmbedder)
            .await
            .unwrap();
        assert!(store.is_empty());
        assert!(store.similarity_search(&[1.0, 0.0, 0.0], 5).is_empty());
    }
}
