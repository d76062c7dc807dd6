//! Credential sources for signing requests.

use async_trait::async_trait;
use leadsync_types::{CREDENTIAL_KEY, CREDENTIAL_SECRET};
use serde_json::Value;

use crate::error::StoreError;
use crate::store::KvStore;

/// API key and shared secret for one device account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// API key, sent in clear in `X-API-Key`.
    pub api_key: String,
    secret: String,
}

impl Credentials {
    /// Create credentials.
    pub fn new(api_key: &str, secret: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            secret: secret.to_string(),
        }
    }

    /// The shared secret. Only ever used as signing input.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Both parts present and non-empty.
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.secret.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Supplies credentials at call time.
///
/// Consulted once per request, so rotating credentials takes effect on the
/// next request without rebuilding the engine.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Current credentials, or `None` if the device is not logged in.
    async fn credentials(&self) -> Result<Option<Credentials>, StoreError>;
}

/// Fixed credentials, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(Option<Credentials>);

impl StaticCredentials {
    /// Always return these credentials.
    pub fn new(api_key: &str, secret: &str) -> Self {
        Self(Some(Credentials::new(api_key, secret)))
    }

    /// Never return credentials.
    pub fn none() -> Self {
        Self(None)
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn credentials(&self) -> Result<Option<Credentials>, StoreError> {
        Ok(self.0.clone())
    }
}

/// Reads the `key` and `secret` entries from a key-value store.
///
/// Those entries are owned by whoever logs the device in; this type only
/// reads them.
#[derive(Debug, Clone)]
pub struct StoredCredentials<S: KvStore> {
    kv: S,
}

impl<S: KvStore> StoredCredentials<S> {
    /// Read credentials from `kv`.
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Write both entries. Used by the login flow.
    pub async fn store(&self, credentials: &Credentials) -> Result<(), StoreError> {
        self.kv
            .set(CREDENTIAL_KEY, Value::String(credentials.api_key.clone()))
            .await?;
        self.kv
            .set(CREDENTIAL_SECRET, Value::String(credentials.secret.clone()))
            .await
    }

    async fn read_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.kv.get(key).await? {
            Some(Value::String(s)) => Ok(Some(s)),
            Some(Value::Null) | None => Ok(None),
            Some(other) => Err(StoreError::Backend(format!(
                "credential entry {:?} is not a string: {}",
                key, other
            ))),
        }
    }
}

#[async_trait]
impl<S: KvStore> CredentialProvider for StoredCredentials<S> {
    async fn credentials(&self) -> Result<Option<Credentials>, StoreError> {
        let api_key = self.read_string(CREDENTIAL_KEY).await?;
        let secret = self.read_string(CREDENTIAL_SECRET).await?;
        Ok(match (api_key, secret) {
            (Some(api_key), Some(secret)) => Some(Credentials { api_key, secret }),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[test]
    fn debug_redacts_secret() {
        let creds = Credentials::new("key-1", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("key-1"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn empty_parts_are_incomplete() {
        assert!(Credentials::new("k", "s").is_complete());
        assert!(!Credentials::new("", "s").is_complete());
        assert!(!Credentials::new("k", "").is_complete());
    }

    #[tokio::test]
    async fn static_credentials() {
        let creds = StaticCredentials::new("k", "s").credentials().await.unwrap();
        assert_eq!(creds, Some(Credentials::new("k", "s")));
        assert!(StaticCredentials::none().credentials().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stored_credentials_roundtrip() {
        let kv = MemoryStore::new();
        let provider = StoredCredentials::new(kv.clone());
        assert!(provider.credentials().await.unwrap().is_none());

        provider.store(&Credentials::new("k", "s")).await.unwrap();

        assert_eq!(kv.raw("key"), Some(json!("k")));
        assert_eq!(kv.raw("secret"), Some(json!("s")));
        assert_eq!(
            provider.credentials().await.unwrap(),
            Some(Credentials::new("k", "s"))
        );
    }

    #[tokio::test]
    async fn half_stored_credentials_are_absent() {
        let kv = MemoryStore::new();
        kv.set("key", json!("k")).await.unwrap();
        let provider = StoredCredentials::new(kv);
        assert!(provider.credentials().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn non_string_entry_is_an_error() {
        let kv = MemoryStore::new();
        kv.set("key", json!(42)).await.unwrap();
        kv.set("secret", json!("s")).await.unwrap();
        let provider = StoredCredentials::new(kv);
        assert!(provider.credentials().await.is_err());
    }
}
