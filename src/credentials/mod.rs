//! Credential storage for provider API keys.
//!
//! The registry never holds a secret in its own state; it coordinates
//! store/delete calls against a [`CredentialStore`] and only commits its own
//! mutation after the credential call succeeded.

use async_trait::async_trait;
use keyring::Entry;
use thiserror::Error;

const SERVICE_NAME: &str = "modelvault";

/// Failures crossing the credential-service boundary.
///
/// The registry never catches these; they propagate unchanged to the caller
/// and no registry state is mutated after one occurs.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The keyring backend rejected the operation or is unreachable.
    #[error("keyring error: {0}")]
    Keyring(String),

    /// The blocking keyring task could not be joined.
    #[error("credential task failed: {0}")]
    Task(String),
}

/// External credential service, keyed by provider namespace.
///
/// Deleting a namespace that holds no secret is idempotent success; callers
/// may rely on that.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist (or overwrite) the secret for a provider namespace.
    async fn store_api_key(&self, provider: &str, api_key: &str) -> Result<(), CredentialError>;

    /// Remove the secret for a provider namespace.
    async fn delete_api_key(&self, provider: &str) -> Result<(), CredentialError>;
}

/// Secure API key storage using the OS keychain.
///
/// Keyring calls are blocking, so they run on the tokio blocking pool.
pub struct KeychainStore {
    service: String,
}

impl KeychainStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Use a different keychain service name (e.g. in tests).
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Load the API key for a provider, if one is stored.
    ///
    /// Not part of the registry's contract; offered for callers that need to
    /// hand the key to an HTTP client.
    pub async fn load(&self, provider: &str) -> Result<Option<String>, CredentialError> {
        let service = self.service.clone();
        let provider = provider.to_string();
        spawn_keyring(move || {
            let entry = Entry::new(&service, &provider).map_err(keyring_err)?;
            match entry.get_password() {
                Ok(key) => {
                    tracing::debug!("Loaded API key from keychain for provider: {}", provider);
                    Ok(Some(key))
                }
                Err(keyring::Error::NoEntry) => {
                    tracing::debug!("No API key in keychain for provider: {}", provider);
                    Ok(None)
                }
                Err(e) => Err(keyring_err(e)),
            }
        })
        .await
    }

    /// Check whether an API key exists for a provider.
    pub async fn exists(&self, provider: &str) -> Result<bool, CredentialError> {
        Ok(self.load(provider).await?.is_some())
    }
}

impl Default for KeychainStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for KeychainStore {
    async fn store_api_key(&self, provider: &str, api_key: &str) -> Result<(), CredentialError> {
        let service = self.service.clone();
        let provider = provider.to_string();
        let api_key = api_key.to_string();
        spawn_keyring(move || {
            let entry = Entry::new(&service, &provider).map_err(keyring_err)?;
            entry.set_password(&api_key).map_err(keyring_err)?;
            tracing::info!("Saved API key to keychain for provider: {}", provider);
            Ok(())
        })
        .await
    }

    async fn delete_api_key(&self, provider: &str) -> Result<(), CredentialError> {
        let service = self.service.clone();
        let provider = provider.to_string();
        spawn_keyring(move || {
            let entry = Entry::new(&service, &provider).map_err(keyring_err)?;
            match entry.delete_credential() {
                Ok(_) => {
                    tracing::info!("Deleted API key from keychain for provider: {}", provider);
                    Ok(())
                }
                // Already deleted, that's fine
                Err(keyring::Error::NoEntry) => Ok(()),
                Err(e) => Err(keyring_err(e)),
            }
        })
        .await
    }
}

async fn spawn_keyring<T, F>(f: F) -> Result<T, CredentialError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CredentialError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CredentialError::Task(e.to_string()))?
}

fn keyring_err(e: keyring::Error) -> CredentialError {
    CredentialError::Keyring(e.to_string())
}
