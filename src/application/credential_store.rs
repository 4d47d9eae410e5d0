// Credential store trait - Persistence boundary for dashboards and settings
use crate::domain::settings::SignageConfig;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The caller sent a configuration that cannot be saved.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Current configuration with defaults filled in and intervals coerced.
    async fn load(&self) -> Result<SignageConfig, StoreError>;

    /// Validate and persist. Rejects a configuration without dashboards.
    async fn save(&self, config: &SignageConfig) -> Result<(), StoreError>;
}
