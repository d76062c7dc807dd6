//! Per-access-code mutual exclusion.
//!
//! The capture sequence is read, check, write, send, write, delete. Those
//! steps are individually atomic but not together, so concurrent callers
//! for the same code are serialized here. Different codes never contend.
//!
//! An entry lives only while some caller holds or waits for its lock, so the
//! table is bounded by the number of codes in flight.

use dashmap::DashMap;
use leadsync_types::AccessCode;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = DashMap<AccessCode, Arc<Mutex<()>>>;

/// Lock table keyed by access code, with locks created on demand.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: LockMap,
}

/// Exclusive access to one access code. Released on drop.
#[derive(Debug)]
pub struct KeyedLockGuard<'a> {
    locks: &'a LockMap,
    code: AccessCode,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyedLockGuard<'_> {
    fn drop(&mut self) {
        // release first so the table holds the only remaining reference
        drop(self.guard.take());
        self.locks
            .remove_if(&self.code, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

impl KeyedLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `code`.
    ///
    /// Held until the returned guard is dropped.
    pub async fn lock(&self, code: &AccessCode) -> KeyedLockGuard<'_> {
        // clone out of the map so no shard lock is held across the await
        let mutex = Arc::clone(self.locks.entry(code.clone()).or_default().value());
        let guard = mutex.lock_owned().await;
        KeyedLockGuard {
            locks: &self.locks,
            code: code.clone(),
            guard: Some(guard),
        }
    }

    /// Number of codes currently locked or waited on.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no code is locked or waited on.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn code(s: &str) -> AccessCode {
        AccessCode::new(s).unwrap()
    }

    #[tokio::test]
    async fn same_code_is_exclusive() {
        let locks = Arc::new(KeyedLocks::new());
        let guard = locks.lock(&code("A1")).await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.lock(&code("A1")).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .expect("lock should be released")
            .expect("task should not panic");
    }

    #[tokio::test]
    async fn different_codes_do_not_contend() {
        let locks = KeyedLocks::new();
        let _a = locks.lock(&code("A1")).await;

        let _b = tokio::time::timeout(Duration::from_millis(100), locks.lock(&code("B2")))
            .await
            .expect("independent code should lock immediately");
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn released_codes_leave_the_table() {
        let locks = KeyedLocks::new();
        assert!(locks.is_empty());

        for i in 0..100 {
            drop(locks.lock(&code(&format!("C{}", i))).await);
        }

        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn entry_survives_while_a_waiter_remains() {
        let locks = Arc::new(KeyedLocks::new());
        let guard = locks.lock(&code("A1")).await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.lock(&code("A1")).await;
                tokio::time::sleep(Duration::from_millis(20)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(guard);
        assert_eq!(locks.len(), 1);

        contender.await.unwrap();
        assert!(locks.is_empty());
    }
}
