//! # sync-core
//!
//! Pure logic for leadsync (no I/O, instant tests).
//!
//! This crate implements the request-signing scheme, the endpoint layout,
//! and the capture decision table without any network or disk I/O.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. Time is injected rather than read where it matters,
//! so signatures are reproducible in tests.
//!
//! The actual I/O (network, storage) is performed by `sync-client`, which
//! acts on the decisions produced here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod capture;
pub mod endpoint;
pub mod signer;

pub use capture::{decide_capture, CaptureDecision};
pub use endpoint::{Endpoint, Method};
pub use signer::{
    canonical_string, hex_digest, sign, sign_at, unix_now, AuthHeaders, HEADER_API_KEY,
    HEADER_SIGNATURE, HEADER_TIMESTAMP,
};
