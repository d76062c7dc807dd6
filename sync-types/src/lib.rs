//! # sync-types
//!
//! Record types for the leadsync offline-first capture queue.
//!
//! This crate provides the foundational types used across all leadsync crates:
//! - [`AccessCode`], [`ScanData`] - Attendee identity and the raw badge payload
//! - [`ScanRecord`], [`NoteRecord`] - The values persisted in the key-value store
//! - [`StorageKey`] - The key scheme for pending/synced slots
//! - [`RecordError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod keys;
mod records;

pub use error::RecordError;
pub use ids::{AccessCode, ScanData};
pub use keys::{StorageKey, CREDENTIAL_KEY, CREDENTIAL_SECRET};
pub use records::{NoteRecord, ScanRecord, ScanStatus};
