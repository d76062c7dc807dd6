//! Remote endpoints used by the capture queue.

use leadsync_types::AccessCode;
use std::fmt;

/// HTTP methods the queue issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Capture lookups.
    Get,
    /// Note submission.
    Post,
    /// Device state mirror.
    Patch,
}

impl Method {
    /// Uppercase wire name, as signed.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An endpoint on the lead retrieval API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// `GET /lead_retrieval/capture/?attendee_access_code=&badge_validator=`
    Capture {
        /// Attendee being captured.
        access_code: &'a AccessCode,
        /// Validator token from the badge.
        validator: &'a str,
    },
    /// `POST /lead_retrieval/<code>/note/`
    Note {
        /// Attendee the note is about.
        access_code: &'a AccessCode,
    },
    /// `PATCH /user/mobile_state/`
    MobileState,
}

impl Endpoint<'_> {
    /// The method this endpoint is called with.
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Capture { .. } => Method::Get,
            Endpoint::Note { .. } => Method::Post,
            Endpoint::MobileState => Method::Patch,
        }
    }

    /// Path including query string, under the given API prefix.
    ///
    /// This is the exact string that gets signed. Query values are passed
    /// through verbatim.
    pub fn path(&self, api_prefix: &str) -> String {
        let prefix = api_prefix.trim_end_matches('/');
        match self {
            Endpoint::Capture {
                access_code,
                validator,
            } => format!(
                "{}/lead_retrieval/capture/?attendee_access_code={}&badge_validator={}",
                prefix, access_code, validator
            ),
            Endpoint::Note { access_code } => {
                format!("{}/lead_retrieval/{}/note/", prefix, access_code)
            }
            Endpoint::MobileState => format!("{}/user/mobile_state/", prefix),
        }
    }
}
