//! Per-session quota tracking for provider calls

use std::sync::atomic::{AtomicU32, Ordering};

use literacy_core::{MediaError, MediaResult};

/// Maximum provider calls allowed per application session
pub const MAX_CALLS_PER_SESSION: u32 = 5;

/// Counts attempted provider calls for one application lifetime
///
/// Construct one Session at startup and inject it into the provider. Every
/// attempted call counts against the quota, success or failure, and the
/// counter never decreases: exhaustion is terminal until a new Session is
/// constructed (the reload path in the UI).
#[derive(Debug)]
pub struct Session {
    max_calls: u32,
    used: AtomicU32,
}

impl Session {
    pub fn new() -> Self {
        Self::with_limit(MAX_CALLS_PER_SESSION)
    }

    pub fn with_limit(max_calls: u32) -> Self {
        Self {
            max_calls,
            used: AtomicU32::new(0),
        }
    }

    /// Count one attempted call against the quota
    ///
    /// Fails without consuming anything once the limit is reached.
    pub fn begin_call(&self) -> MediaResult<()> {
        self.used
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |used| {
                (used < self.max_calls).then_some(used + 1)
            })
            .map(|_| ())
            .map_err(|_| MediaError::quota_exceeded(self.max_calls))
    }

    pub fn calls_used(&self) -> u32 {
        self.used.load(Ordering::SeqCst)
    }

    pub fn calls_remaining(&self) -> u32 {
        self.max_calls.saturating_sub(self.calls_used())
    }

    pub fn limit(&self) -> u32 {
        self.max_calls
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_has_full_quota() {
        let session = Session::new();
        assert_eq!(session.calls_remaining(), MAX_CALLS_PER_SESSION);
        assert_eq!(session.calls_used(), 0);
    }

    #[test]
    fn each_attempt_consumes_one_call() {
        let session = Session::new();

        session.begin_call().unwrap();
        assert_eq!(session.calls_remaining(), MAX_CALLS_PER_SESSION - 1);

        session.begin_call().unwrap();
        assert_eq!(session.calls_used(), 2);
    }

    #[test]
    fn sixth_attempt_is_rejected() {
        let session = Session::new();

        for _ in 0..MAX_CALLS_PER_SESSION {
            session.begin_call().unwrap();
        }

        let err = session.begin_call().unwrap_err();
        assert!(matches!(
            err,
            MediaError::QuotaExceeded {
                limit: MAX_CALLS_PER_SESSION
            }
        ));
        // Rejection leaves the counter untouched
        assert_eq!(session.calls_used(), MAX_CALLS_PER_SESSION);
        assert_eq!(session.calls_remaining(), 0);
    }

    #[test]
    fn zero_limit_session_is_born_exhausted() {
        let session = Session::with_limit(0);
        assert_eq!(session.calls_remaining(), 0);
        assert!(session.begin_call().is_err());
    }
}
