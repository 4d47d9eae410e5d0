// JSON file credential store
use crate::application::credential_store::{CredentialStore, StoreError};
use crate::domain::settings::SignageConfig;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_atomic(&self, config: &SignageConfig) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(config)?;
        let tmp = self.path.with_extension("json.tmp");

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for JsonFileStore {
    async fn load(&self) -> Result<SignageConfig, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No configuration at {}, creating defaults", self.path.display());
                let config = SignageConfig::default();
                let _guard = self.write_lock.lock().await;
                self.write_atomic(&config).await?;
                return Ok(config);
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<SignageConfig>(&raw) {
            Ok(config) => Ok(config.coerce()),
            Err(e) => {
                tracing::error!(
                    "Error loading config from {}: {}, using defaults",
                    self.path.display(),
                    e
                );
                Ok(SignageConfig::default())
            }
        }
    }

    async fn save(&self, config: &SignageConfig) -> Result<(), StoreError> {
        config.validate().map_err(StoreError::Validation)?;

        let _guard = self.write_lock.lock().await;
        self.write_atomic(config).await?;
        tracing::info!(
            "Saved {} dashboards to {}",
            config.dashboards.len(),
            self.path.display()
        );
        Ok(())
    }
}
