//! Capture decision table.
//!
//! Given which slots are occupied for an access code, decide what a new
//! capture attempt must do. Presence of either record short-circuits
//! creation, so duplicate submissions collapse into retries of the same
//! record.

/// What a capture attempt does next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureDecision {
    /// Code already closed. Nothing is sent.
    AlreadyCaptured {
        /// A pending copy survived an interrupted promotion and can be dropped.
        stale_pending: bool,
    },
    /// A pending record exists; re-attempt its sync.
    Retry,
    /// Nothing recorded yet; create the pending record, then sync it.
    Create,
}

/// Decide the capture step from slot occupancy.
pub fn decide_capture(has_pending: bool, has_synced: bool) -> CaptureDecision {
    match (has_pending, has_synced) {
        (stale_pending, true) => CaptureDecision::AlreadyCaptured { stale_pending },
        (true, false) => CaptureDecision::Retry,
        (false, false) => CaptureDecision::Create,
    }
}

impl CaptureDecision {
    /// Whether this decision leads to a network request.
    pub fn sends_request(&self) -> bool {
        !matches!(self, CaptureDecision::AlreadyCaptured { .. })
    }
}
