//! Shared test helpers for ryu-cdn integration tests.

use std::sync::Arc;

use crate::api::error::ErrorResponder;
use crate::config::{Config, Environment};
use crate::files::{FileProvider, LocalProvider};
use crate::render::Templates;
use crate::AppState;

/// Create a test AppState backed by a temporary storage directory.
pub fn test_state(temp_dir: &tempfile::TempDir, environment: Environment) -> Arc<AppState> {
    let storage = temp_dir.path().join("uploads");

    let config = Config {
        bind_address: "127.0.0.1:0".to_string(),
        environment,
        storage_path: storage.to_string_lossy().to_string(),
    };

    let templates = Arc::new(Templates::new().expect("Failed to compile templates"));
    let provider = LocalProvider::new(&storage).expect("Failed to create test provider");
    let files: Arc<dyn FileProvider> = Arc::new(provider);

    Arc::new(AppState {
        errors: ErrorResponder::new(config.environment, Arc::clone(&templates)),
        config,
        files,
        templates,
    })
}
