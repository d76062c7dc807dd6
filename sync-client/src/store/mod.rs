//! Key-value persistence for the capture queue.
//!
//! This module provides a trait for the raw durability layer (string keys,
//! JSON values), an in-memory and a directory-backed implementation, and
//! [`SyncStore`], the record-typed view the engine works against.
//!
//! Each operation is atomic per key. No multi-key transactions exist; the
//! engine sequences its writes so an interruption between two of them never
//! loses a record.

mod file;
mod memory;
mod records;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use records::SyncStore;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;

/// Trait for the raw key-value durability layer.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read a value. Absence is `Ok(None)`, never an error.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove a value. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
