use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use rand::{rngs::OsRng, Rng};
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::config::OtpConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtpVerifyError {
    #[error("no active code for this number")]
    NotFound,
    #[error("code has expired")]
    Expired,
    #[error("incorrect code")]
    Mismatch,
}

/// Keyed, expiring, single-use code storage.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Generates and stores a fresh code for the key, replacing any prior
    /// entry, and returns it so the caller can hand it to a delivery channel.
    async fn issue(&self, key: &str, ttl: Duration) -> String;

    /// Checks a candidate against the stored code. A match consumes the
    /// entry; detecting expiry removes it too. A mismatch keeps the entry
    /// for a bounded number of retries.
    async fn verify(&self, key: &str, candidate: &str) -> Result<(), OtpVerifyError>;
}

#[derive(Debug)]
struct Entry {
    code: String,
    expires_at: OffsetDateTime,
    attempts: u32,
}

/// In-memory store. Check-and-consume happens under the map lock, so two
/// concurrent verifies of the same code can never both succeed. The lock is
/// never held across an await point.
pub struct MemoryOtpStore {
    entries: Mutex<HashMap<String, Entry>>,
    code_length: usize,
    max_attempts: u32,
}

impl MemoryOtpStore {
    pub fn new(config: &OtpConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            code_length: config.code_length,
            max_attempts: config.max_attempts,
        }
    }
}

/// Fixed-length numeric code from the OS entropy source. Predictable codes
/// would defeat the whole scheme, so no thread-local PRNG here.
fn generate_code(length: usize) -> String {
    (0..length)
        .map(|_| char::from(b'0' + OsRng.gen_range(0..10u8)))
        .collect()
}

#[async_trait]
impl OtpStore for MemoryOtpStore {
    async fn issue(&self, key: &str, ttl: Duration) -> String {
        let code = generate_code(self.code_length);
        let entry = Entry {
            code: code.clone(),
            expires_at: OffsetDateTime::now_utc() + ttl,
            attempts: 0,
        };
        self.entries.lock().await.insert(key.to_string(), entry);
        code
    }

    async fn verify(&self, key: &str, candidate: &str) -> Result<(), OtpVerifyError> {
        let mut entries = self.entries.lock().await;
        let entry = entries.get_mut(key).ok_or(OtpVerifyError::NotFound)?;

        if OffsetDateTime::now_utc() > entry.expires_at {
            entries.remove(key);
            return Err(OtpVerifyError::Expired);
        }

        if entry.code != candidate {
            entry.attempts += 1;
            if entry.attempts >= self.max_attempts {
                entries.remove(key);
            }
            return Err(OtpVerifyError::Mismatch);
        }

        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn store() -> MemoryOtpStore {
        MemoryOtpStore::new(&OtpConfig::default())
    }

    const TTL: Duration = Duration::from_secs(300);

    #[tokio::test]
    async fn issued_code_is_numeric_and_fixed_length() {
        let store = store();
        let code = store.issue("771234567", TTL).await;
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn verify_consumes_the_code() {
        let store = store();
        let code = store.issue("771234567", TTL).await;
        store.verify("771234567", &code).await.expect("first verify");
        assert_eq!(
            store.verify("771234567", &code).await.unwrap_err(),
            OtpVerifyError::NotFound
        );
    }

    #[tokio::test]
    async fn verify_unknown_key_is_not_found() {
        let store = store();
        assert_eq!(
            store.verify("700000000", "123456").await.unwrap_err(),
            OtpVerifyError::NotFound
        );
    }

    #[tokio::test]
    async fn expired_code_is_rejected_and_removed() {
        let store = store();
        let code = store.issue("771234567", Duration::ZERO).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(
            store.verify("771234567", &code).await.unwrap_err(),
            OtpVerifyError::Expired
        );
        // removal on expiry detection: the entry is gone now
        assert_eq!(
            store.verify("771234567", &code).await.unwrap_err(),
            OtpVerifyError::NotFound
        );
    }

    #[tokio::test]
    async fn mismatch_keeps_the_entry_verifiable() {
        let store = store();
        let code = store.issue("771234567", TTL).await;
        let wrong = if code == "000000" { "000001" } else { "000000" };
        assert_eq!(
            store.verify("771234567", wrong).await.unwrap_err(),
            OtpVerifyError::Mismatch
        );
        store.verify("771234567", &code).await.expect("correct code still works");
    }

    #[tokio::test]
    async fn attempt_cap_invalidates_the_code() {
        let store = MemoryOtpStore::new(&OtpConfig {
            max_attempts: 2,
            ..OtpConfig::default()
        });
        let code = store.issue("771234567", TTL).await;
        let wrong = if code == "000000" { "000001" } else { "000000" };
        assert_eq!(store.verify("771234567", wrong).await.unwrap_err(), OtpVerifyError::Mismatch);
        assert_eq!(store.verify("771234567", wrong).await.unwrap_err(), OtpVerifyError::Mismatch);
        // cap reached: even the correct code is gone
        assert_eq!(
            store.verify("771234567", &code).await.unwrap_err(),
            OtpVerifyError::NotFound
        );
    }

    #[tokio::test]
    async fn reissue_replaces_the_previous_code() {
        let store = store();
        let first = store.issue("771234567", TTL).await;
        let second = store.issue("771234567", TTL).await;
        if first != second {
            assert_eq!(
                store.verify("771234567", &first).await.unwrap_err(),
                OtpVerifyError::Mismatch
            );
        }
        store.verify("771234567", &second).await.expect("latest code verifies");
    }

    #[tokio::test]
    async fn concurrent_verifies_succeed_exactly_once() {
        let store = Arc::new(store());
        let code = store.issue("771234567", TTL).await;

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            let code = code.clone();
            tasks.push(tokio::spawn(async move {
                store.verify("771234567", &code).await
            }));
        }

        let mut successes = 0;
        for task in tasks {
            if task.await.expect("task").is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
    }
}
