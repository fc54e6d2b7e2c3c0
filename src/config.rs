use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Development/production switch. Decided once at startup and threaded into
/// the error responder, so request handling never reads process state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        matches!(self, Environment::Development)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind_address: String,
    pub environment: Environment,
    /// Directory the file metadata provider reads from
    pub storage_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let environment = match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "production".to_string())
            .to_lowercase()
            .as_str()
        {
            "development" | "dev" => Environment::Development,
            _ => Environment::Production,
        };

        let storage_path =
            std::env::var("STORAGE_PATH").unwrap_or_else(|_| "./uploads".to_string());

        let config = Config {
            bind_address,
            environment,
            storage_path,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.is_empty() {
            return Err(ConfigError::ValidationError(
                "BIND_ADDRESS cannot be empty".to_string(),
            ));
        }

        if self.storage_path.is_empty() {
            return Err(ConfigError::ValidationError(
                "STORAGE_PATH cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
