pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/uploadResume", post(handlers::handle_upload))
        .route("/parseResume", post(handlers::handle_parse))
        .route("/buildVectorDb", post(handlers::handle_build_vector_db))
        .route("/analyzeResume", post(handlers::handle_analyze))
        .with_state(state)
}
