//! Secret resolution for provider credentials.
//!
//! Secrets are looked up by name on every call and never cached, so rotating
//! a mounted secret takes effect on the next checkout.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

/// Name under which the PayPal API key is stored.
pub const PAYPAL_API_KEY: &str = "PAYPAL_API_KEY";

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Invalid secret name: {name}")]
    InvalidName { name: String },

    #[error("Failed to read secret {name}: {message}")]
    Unreadable { name: String, message: String },
}

pub type SecretResult<T> = Result<T, SecretError>;

#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Resolve a secret by name. `Ok(None)` means the secret is not configured.
    async fn get_secret(&self, name: &str) -> SecretResult<Option<String>>;
}

fn validate_name(name: &str) -> SecretResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(SecretError::InvalidName {
            name: name.to_string(),
        })
    }
}

fn normalize(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Reads `<dir>/<name>`, the layout used by mounted secret volumes.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    dir: PathBuf,
}

impl FileSecretStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn get_secret(&self, name: &str) -> SecretResult<Option<String>> {
        validate_name(name)?;
        let path = self.dir.join(name);

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                debug!(secret = name, "Secret resolved from file");
                Ok(normalize(&contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(secret = name, path = %path.display(), "Secret file not found");
                Ok(None)
            }
            Err(e) => Err(SecretError::Unreadable {
                name: name.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

/// Fixed in-memory secrets.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    secrets: HashMap<String, String>,
}

impl StaticSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn get_secret(&self, name: &str) -> SecretResult<Option<String>> {
        validate_name(name)?;
        Ok(self.secrets.get(name).and_then(|v| normalize(v)))
    }
}
