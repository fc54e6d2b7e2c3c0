mod files;
mod health;
mod pages;

use axum::extract::State;
use axum::response::Response;
use std::sync::Arc;

use crate::api::error::ResponseFormat;
use crate::AppState;

pub use files::{download, file_result};
pub use health::health;
pub use pages::{about, contact, docs, home};

/// Router fallback: no route matched.
pub async fn not_found(State(state): State<Arc<AppState>>, format: ResponseFormat) -> Response {
    state.errors.not_found(format)
}
