//! The four-step screening pipeline: extract, chunk, index, analyze.

pub mod chunking;
pub mod extract;
pub mod handlers;
pub mod models;
