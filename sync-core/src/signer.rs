//! Request signing for the lead retrieval API.
//!
//! Every authenticated request carries three headers:
//!
//! ```text
//! X-API-Key:       <api key>
//! X-API-Signature: hex(SHA1(secret || timestamp || METHOD || path || body))
//! X-API-Timestamp: <unix seconds>
//! ```
//!
//! The fields are concatenated with no delimiters. The path includes the
//! query string. The digest is plain SHA-1 over the concatenation, not an
//! HMAC; the remote verifies exactly this construction.

use sha1::{Digest, Sha1};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::Method;

/// Header carrying the API key.
pub const HEADER_API_KEY: &str = "X-API-Key";
/// Header carrying the hex signature.
pub const HEADER_SIGNATURE: &str = "X-API-Signature";
/// Header carrying the signing timestamp.
pub const HEADER_TIMESTAMP: &str = "X-API-Timestamp";

/// The authentication headers for one request.
///
/// Computed per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    /// API key identifying the device account.
    pub api_key: String,
    /// Lowercase hex digest of the canonical string.
    pub signature: String,
    /// Unix time in whole seconds used in the signature.
    pub timestamp: i64,
}

impl AuthHeaders {
    /// Header name/value pairs, ready to attach to a request.
    pub fn pairs(&self) -> [(&'static str, String); 3] {
        [
            (HEADER_API_KEY, self.api_key.clone()),
            (HEADER_SIGNATURE, self.signature.clone()),
            (HEADER_TIMESTAMP, self.timestamp.to_string()),
        ]
    }
}

/// Build the string-to-sign.
pub fn canonical_string(
    secret: &str,
    timestamp: i64,
    method: Method,
    path: &str,
    body: &str,
) -> String {
    format!("{}{}{}{}{}", secret, timestamp, method.as_str(), path, body)
}

/// Lowercase hex SHA-1 of the input.
pub fn hex_digest(input: &str) -> String {
    hex::encode(Sha1::digest(input.as_bytes()))
}

/// Sign a request at an explicit timestamp.
///
/// Deterministic: identical inputs always give identical headers.
pub fn sign_at(
    method: Method,
    path: &str,
    body: &str,
    secret: &str,
    api_key: &str,
    timestamp: i64,
) -> AuthHeaders {
    let message = canonical_string(secret, timestamp, method, path, body);
    AuthHeaders {
        api_key: api_key.to_string(),
        signature: hex_digest(&message),
        timestamp,
    }
}

/// Sign a request at the current wall-clock time.
pub fn sign(method: Method, path: &str, body: &str, secret: &str, api_key: &str) -> AuthHeaders {
    sign_at(method, path, body, secret, api_key, unix_now())
}

/// Current Unix time in whole seconds.
///
/// A clock set before the epoch yields 0 rather than failing; the remote
/// rejects the stale timestamp.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPTURE_PATH: &str =
        "/2023/api/v1/lead_retrieval/capture/?attendee_access_code=A1&badge_validator=VALIDATOR1";

    #[test]
    fn digest_is_sha1_hex() {
        assert_eq!(hex_digest("abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn canonical_string_has_no_delimiters() {
        let s = canonical_string("s3cret", 1700000000, Method::Get, "/p?x=1", "");
        assert_eq!(s, "s3cret1700000000GET/p?x=1");
    }

    #[test]
    fn signs_capture_request() {
        let headers = sign_at(Method::Get, CAPTURE_PATH, "", "s3cret", "key-1", 1700000000);
        assert_eq!(headers.api_key, "key-1");
        assert_eq!(headers.timestamp, 1700000000);
        assert_eq!(
            headers.signature,
            "d269d7b67960731bf05ec703ffb1224f2b540237"
        );
    }

    #[test]
    fn signs_note_request_with_body() {
        let headers = sign_at(
            Method::Post,
            "/2023/api/v1/lead_retrieval/A1/note/",
            r#"{"accessCode":"A1","note":"hi"}"#,
            "s3cret",
            "key-1",
            1700000000,
        );
        assert_eq!(
            headers.signature,
            "eb574df59992a788be887886e799189e18a15905"
        );
    }

    #[test]
    fn signing_is_deterministic() {
        let a = sign_at(Method::Patch, "/x", "{}", "s", "k", 42);
        let b = sign_at(Method::Patch, "/x", "{}", "s", "k", 42);
        assert_eq!(a, b);
    }

    #[test]
    fn every_input_changes_signature() {
        let base = sign_at(Method::Post, "/x", "body", "s", "k", 42).signature;
        assert_ne!(base, sign_at(Method::Get, "/x", "body", "s", "k", 42).signature);
        assert_ne!(base, sign_at(Method::Post, "/y", "body", "s", "k", 42).signature);
        assert_ne!(base, sign_at(Method::Post, "/x", "other", "s", "k", 42).signature);
        assert_ne!(base, sign_at(Method::Post, "/x", "body", "t", "k", 42).signature);
        assert_ne!(base, sign_at(Method::Post, "/x", "body", "s", "k", 43).signature);
    }

    #[test]
    fn api_key_is_not_part_of_signature() {
        let a = sign_at(Method::Get, "/x", "", "s", "key-a", 42);
        let b = sign_at(Method::Get, "/x", "", "s", "key-b", 42);
        assert_eq!(a.signature, b.signature);
    }

    #[test]
    fn header_pairs_use_wire_names() {
        let headers = sign_at(Method::Get, "/x", "", "s", "k", 42);
        let pairs = headers.pairs();
        assert_eq!(pairs[0], ("X-API-Key", "k".to_string()));
        assert_eq!(pairs[1].0, "X-API-Signature");
        assert_eq!(pairs[2], ("X-API-Timestamp", "42".to_string()));
    }

    #[test]
    fn sign_uses_current_time() {
        let before = unix_now();
        let headers = sign(Method::Get, "/x", "", "s", "k");
        let after = unix_now();
        assert!(headers.timestamp >= before && headers.timestamp <= after);
    }
}
