//! Store API credentials.

use anyhow::{Context, Result};
use leadsync_client::{Credentials, StoredCredentials};
use std::path::Path;

use super::open_store;

/// Run the login command.
pub async fn run(data_dir: &Path, key: &str, secret: &str) -> Result<()> {
    let credentials = Credentials::new(key, secret);
    if !credentials.is_complete() {
        anyhow::bail!("Both --key and --secret must be non-empty");
    }

    let store = open_store(data_dir).await?;
    StoredCredentials::new(store)
        .store(&credentials)
        .await
        .context("Failed to save credentials")?;

    println!("Credentials saved.");
    println!("  Key:      {}", key);
    println!("  Data dir: {}", data_dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadsync_client::{CredentialProvider, KvStore};
    use tempfile::tempdir;

    #[tokio::test]
    async fn login_writes_both_entries() {
        let dir = tempdir().unwrap();
        run(dir.path(), "key-1", "s3cret").await.unwrap();

        let store = open_store(dir.path()).await.unwrap();
        let creds = StoredCredentials::new(store.clone())
            .credentials()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(creds.api_key, "key-1");
        assert_eq!(creds.secret(), "s3cret");
        assert!(store.get("secret").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn login_rejects_empty_secret() {
        let dir = tempdir().unwrap();
        assert!(run(dir.path(), "key-1", "").await.is_err());
    }
}
