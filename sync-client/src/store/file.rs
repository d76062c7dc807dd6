//! Directory-backed key-value store.
//!
//! One JSON file per key. Writes land in a temporary file that is flushed
//! to disk and renamed over the target, then the directory is synced, so a
//! key is always either the old or the new value and a completed `set` is
//! durable before any later `remove` takes effect.

use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use super::KvStore;
use crate::error::StoreError;

/// Key-value store persisting each key as `<dir>/<escaped key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    tmp_counter: Arc<AtomicU64>,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            tmp_counter: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Directory the store lives in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", escape_key(key)))
    }

    /// Persist directory entries (renames and unlinks).
    async fn sync_dir(&self) -> Result<(), StoreError> {
        #[cfg(unix)]
        {
            tokio::fs::File::open(&self.dir).await?.sync_all().await?;
        }
        Ok(())
    }
}

async fn write_synced(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(contents).await?;
    file.flush().await?;
    // Ensure data is physically written to disk
    file.sync_all().await
}

/// Escape a key into a portable file name.
///
/// `[A-Za-z0-9._-]` pass through, everything else becomes `%XX` per byte.
fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' => out.push(byte as char),
            // a leading dot would hide the file
            b'.' if !out.is_empty() => out.push('.'),
            _ => {
                let _ = write!(out, "%{:02X}", byte);
            }
        }
    }
    out
}

#[async_trait]
impl KvStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let target = self.path_for(key);
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let tmp = self
            .dir
            .join(format!(".{}.{}.{}.tmp", escape_key(key), std::process::id(), n));

        let contents = serde_json::to_vec(&value)?;
        let written = match write_synced(&tmp, &contents).await {
            Ok(()) => tokio::fs::rename(&tmp, &target).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        self.sync_dir().await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => self.sync_dir().await,
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn escape_key_keeps_safe_names() {
        assert_eq!(escape_key("pending-scan-A1"), "pending-scan-A1");
        assert_eq!(escape_key("note-a/b"), "note-a%2Fb");
        assert_eq!(escape_key(".."), "%2E.");
        assert_eq!(escape_key("key"), "key");
    }

    #[tokio::test]
    async fn file_store_roundtrip_survives_reopen() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        store
            .set("synced-scan-A1", json!({"scanData": "A1:V"}))
            .await
            .unwrap();

        let reopened = JsonFileStore::open(dir.path()).await.unwrap();
        assert_eq!(
            reopened.get("synced-scan-A1").await.unwrap(),
            Some(json!({"scanData": "A1:V"}))
        );
        assert!(dir.path().join("synced-scan-A1.json").exists());
    }

    #[tokio::test]
    async fn file_store_missing_is_none() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        assert_eq!(store.get("pending-scan-X").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_overwrite_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        store.set("note-A1", json!({"note": "one"})).await.unwrap();
        store.set("note-A1", json!({"note": "two"})).await.unwrap();

        assert_eq!(
            store.get("note-A1").await.unwrap(),
            Some(json!({"note": "two"}))
        );
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn set_is_complete_on_disk_when_it_returns() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        let value = json!({"accessCode": "A1", "syncPayload": {"data": {"id": 7}}});

        store.set("synced-scan-A1", value.clone()).await.unwrap();

        // read back bypassing the store
        let bytes = std::fs::read(dir.path().join("synced-scan-A1.json")).unwrap();
        assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap(), value);
    }

    #[tokio::test]
    async fn failed_rename_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        std::fs::create_dir(dir.path().join("note-A1.json")).unwrap();

        assert!(matches!(
            store.set("note-A1", json!({"note": "x"})).await,
            Err(StoreError::Io(_))
        ));
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn file_store_remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        store.set("k", json!(1)).await.unwrap();

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        std::fs::write(dir.path().join("k.json"), b"{not json").unwrap();

        assert!(matches!(
            store.get("k").await,
            Err(StoreError::Encoding(_))
        ));
    }

    #[tokio::test]
    async fn open_creates_nested_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = JsonFileStore::open(&nested).await.unwrap();
        assert_eq!(store.dir(), nested.as_path());
        assert!(nested.is_dir());
    }
}
