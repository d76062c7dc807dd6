//! Record-typed view over a [`KvStore`].

use leadsync_types::{AccessCode, NoteRecord, ScanRecord, ScanStatus, StorageKey};
use serde_json::Value;

use super::KvStore;
use crate::error::StoreError;

/// Typed get/put/delete for the pending and synced slots of each access code.
///
/// Absence is a normal outcome (`Ok(None)`). Puts overwrite. Deletes are
/// idempotent.
#[derive(Debug, Clone)]
pub struct SyncStore<S: KvStore> {
    kv: S,
}

impl<S: KvStore> SyncStore<S> {
    /// Wrap a raw key-value store.
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// The underlying key-value store.
    pub fn kv(&self) -> &S {
        &self.kv
    }

    // --- Scans ---

    /// Capture waiting for the remote.
    pub async fn get_pending_scan(&self, code: &AccessCode) -> Result<Option<ScanRecord>, StoreError> {
        self.get_scan_at(StorageKey::PendingScan(code.clone())).await
    }

    /// Capture the remote has acknowledged.
    pub async fn get_synced_scan(&self, code: &AccessCode) -> Result<Option<ScanRecord>, StoreError> {
        self.get_scan_at(StorageKey::SyncedScan(code.clone())).await
    }

    /// Write the pending capture.
    pub async fn put_pending_scan(&self, code: &AccessCode, record: &ScanRecord) -> Result<(), StoreError> {
        self.put(StorageKey::PendingScan(code.clone()), record.to_value()?)
            .await
    }

    /// Write the synced capture.
    pub async fn put_synced_scan(&self, code: &AccessCode, record: &ScanRecord) -> Result<(), StoreError> {
        self.put(StorageKey::SyncedScan(code.clone()), record.to_value()?)
            .await
    }

    /// Drop the pending capture.
    pub async fn delete_pending_scan(&self, code: &AccessCode) -> Result<(), StoreError> {
        self.delete(StorageKey::PendingScan(code.clone())).await
    }

    /// The synced capture if present, else the pending one.
    pub async fn get_scan(&self, code: &AccessCode) -> Result<Option<ScanRecord>, StoreError> {
        match self.get_synced_scan(code).await? {
            Some(synced) => Ok(Some(synced)),
            None => self.get_pending_scan(code).await,
        }
    }

    /// Where the capture for this code stands.
    pub async fn scan_status(&self, code: &AccessCode) -> Result<ScanStatus, StoreError> {
        let has_synced = self.get_synced_scan(code).await?.is_some();
        let has_pending = self.get_pending_scan(code).await?.is_some();
        Ok(ScanStatus::from_slots(has_pending, has_synced))
    }

    // --- Notes ---

    /// Display copy of the latest note.
    pub async fn get_note(&self, code: &AccessCode) -> Result<Option<NoteRecord>, StoreError> {
        self.get_note_at(StorageKey::Note(code.clone())).await
    }

    /// Note waiting for the remote.
    pub async fn get_pending_note(&self, code: &AccessCode) -> Result<Option<NoteRecord>, StoreError> {
        self.get_note_at(StorageKey::PendingNote(code.clone())).await
    }

    /// Write the display note.
    pub async fn put_note(&self, code: &AccessCode, record: &NoteRecord) -> Result<(), StoreError> {
        self.put(StorageKey::Note(code.clone()), record.to_value()?)
            .await
    }

    /// Write the pending note.
    pub async fn put_pending_note(&self, code: &AccessCode, record: &NoteRecord) -> Result<(), StoreError> {
        self.put(StorageKey::PendingNote(code.clone()), record.to_value()?)
            .await
    }

    /// Drop the pending note.
    pub async fn delete_pending_note(&self, code: &AccessCode) -> Result<(), StoreError> {
        self.delete(StorageKey::PendingNote(code.clone())).await
    }

    // --- Internal helpers ---

    async fn get_scan_at(&self, key: StorageKey) -> Result<Option<ScanRecord>, StoreError> {
        match self.kv.get(&key.to_string()).await? {
            Some(value) => Ok(Some(ScanRecord::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn get_note_at(&self, key: StorageKey) -> Result<Option<NoteRecord>, StoreError> {
        match self.kv.get(&key.to_string()).await? {
            Some(value) => Ok(Some(NoteRecord::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: StorageKey, value: Value) -> Result<(), StoreError> {
        self.kv.set(&key.to_string(), value).await
    }

    async fn delete(&self, key: StorageKey) -> Result<(), StoreError> {
        self.kv.remove(&key.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Utc;
    use leadsync_types::ScanData;
    use serde_json::json;

    fn code() -> AccessCode {
        AccessCode::new("A1").unwrap()
    }

    fn scan() -> ScanRecord {
        ScanRecord::new(code(), ScanData::parse("A1:xyz:V1").unwrap(), Utc::now())
    }

    #[tokio::test]
    async fn absent_records_are_none() {
        let store = SyncStore::new(MemoryStore::new());

        assert!(store.get_pending_scan(&code()).await.unwrap().is_none());
        assert!(store.get_synced_scan(&code()).await.unwrap().is_none());
        assert!(store.get_note(&code()).await.unwrap().is_none());
        assert!(store.get_pending_note(&code()).await.unwrap().is_none());
        assert_eq!(
            store.scan_status(&code()).await.unwrap(),
            ScanStatus::NotCaptured
        );
    }

    #[tokio::test]
    async fn scans_land_under_their_keys() {
        let kv = MemoryStore::new();
        let store = SyncStore::new(kv.clone());
        let record = scan();

        store.put_pending_scan(&code(), &record).await.unwrap();
        assert!(kv.contains("pending-scan-A1"));
        assert_eq!(
            store.get_pending_scan(&code()).await.unwrap(),
            Some(record.clone())
        );

        store.put_synced_scan(&code(), &record).await.unwrap();
        assert!(kv.contains("synced-scan-A1"));
    }

    #[tokio::test]
    async fn get_scan_prefers_synced() {
        let store = SyncStore::new(MemoryStore::new());
        let pending = scan();
        let synced = pending.clone().promote(serde_json::Map::new());

        store.put_pending_scan(&code(), &pending).await.unwrap();
        assert_eq!(store.get_scan(&code()).await.unwrap(), Some(pending.clone()));
        assert_eq!(store.scan_status(&code()).await.unwrap(), ScanStatus::Pending);

        store.put_synced_scan(&code(), &synced).await.unwrap();
        assert_eq!(store.get_scan(&code()).await.unwrap(), Some(synced));
        assert_eq!(store.scan_status(&code()).await.unwrap(), ScanStatus::Synced);
    }

    #[tokio::test]
    async fn deletes_are_idempotent() {
        let store = SyncStore::new(MemoryStore::new());
        store.put_pending_scan(&code(), &scan()).await.unwrap();

        store.delete_pending_scan(&code()).await.unwrap();
        store.delete_pending_scan(&code()).await.unwrap();
        store.delete_pending_note(&code()).await.unwrap();

        assert!(store.get_pending_scan(&code()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn notes_are_last_write_wins() {
        let kv = MemoryStore::new();
        let store = SyncStore::new(kv.clone());

        store
            .put_note(&code(), &NoteRecord::new(code(), "first"))
            .await
            .unwrap();
        store
            .put_note(&code(), &NoteRecord::new(code(), "second"))
            .await
            .unwrap();

        assert_eq!(
            store.get_note(&code()).await.unwrap().unwrap().note,
            "second"
        );
        assert_eq!(kv.raw("note-A1"), Some(json!({"accessCode": "A1", "note": "second"})));
    }

    #[tokio::test]
    async fn corrupt_record_is_a_store_error() {
        let kv = MemoryStore::new();
        kv.set("pending-scan-A1", json!("garbage")).await.unwrap();
        let store = SyncStore::new(kv);

        assert!(matches!(
            store.get_pending_scan(&code()).await,
            Err(StoreError::Record(_))
        ));
    }
}
