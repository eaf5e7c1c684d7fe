//! Resume screening pipeline API.
//!
//! Four stateless HTTP operations driven in order by the client:
//! upload a PDF, extract its text, rebuild the persisted vector index
//! from that text, and analyze retrieved context against a job
//! description with Gemini.

pub mod config;
pub mod errors;
pub mod llm_client;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod vector_store;
