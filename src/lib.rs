//! ryu-cdn - A small CDN front-end serving rendered pages and file metadata
//!
//! This crate provides:
//! - Rendered pages (home, about, contact, docs) via compiled-in templates
//! - A file-result page backed by a swappable file metadata provider
//! - Centralized error translation to JSON or HTML, selected per request
//! - File content serving by stored name

pub mod api;
pub mod config;
pub mod files;
pub mod render;
#[cfg(test)]
pub mod testutil;

use std::sync::Arc;

use api::error::ErrorResponder;
use config::Config;
use render::Templates;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub errors: ErrorResponder,
    pub files: Arc<dyn files::FileProvider>,
    pub templates: Arc<Templates>,
}
