//! Token revocation registry.
//!
//! Tracks jtis that must be rejected before natural expiry. Revocation is
//! shared mutable state and deliberately separate from token validation,
//! which is stateless; the request gate composes the two.
//!
//! The store is injected behind a trait: Redis in production (entries
//! survive API restarts and are shared across instances), in-memory for
//! tests.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::collections::HashSet;
use tokio::sync::Mutex;

use crate::error::ApiError;

/// Floor for revocation-entry TTLs, covering clock skew around tokens that
/// are already at the edge of expiry.
const MIN_ENTRY_TTL_SECS: u64 = 300;

#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Idempotent insert. The entry only needs to outlive the token, so
    /// `ttl_secs` is the token's remaining validity.
    async fn revoke(&self, jti: &str, ttl_secs: u64) -> Result<(), ApiError>;

    /// Membership test consulted on every authenticated request.
    async fn is_revoked(&self, jti: &str) -> Result<bool, ApiError>;

    /// Atomically revoke and report whether this call performed the
    /// insert. Of N concurrent consumers of one jti exactly one observes
    /// `true`; refresh-token rotation rides on this.
    async fn consume(&self, jti: &str, ttl_secs: u64) -> Result<bool, ApiError>;
}

/// Redis-backed registry.
pub struct RedisRevocationStore {
    redis: ConnectionManager,
}

impl RedisRevocationStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    fn key(jti: &str) -> String {
        format!("stockroom:revoked:jti:{}", jti)
    }

    fn entry_ttl(ttl_secs: u64) -> u64 {
        ttl_secs.max(MIN_ENTRY_TTL_SECS)
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn revoke(&self, jti: &str, ttl_secs: u64) -> Result<(), ApiError> {
        let mut redis = self.redis.clone();
        redis::cmd("SET")
            .arg(Self::key(jti))
            .arg("1")
            .arg("EX")
            .arg(Self::entry_ttl(ttl_secs))
            .query_async::<_, ()>(&mut redis)
            .await?;

        tracing::info!(jti, "Token revoked");
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, ApiError> {
        let mut redis = self.redis.clone();
        let exists: bool = redis::cmd("EXISTS")
            .arg(Self::key(jti))
            .query_async(&mut redis)
            .await?;
        Ok(exists)
    }

    async fn consume(&self, jti: &str, ttl_secs: u64) -> Result<bool, ApiError> {
        let mut redis = self.redis.clone();
        // SET NX: only the first caller writes the entry.
        let set: Option<String> = redis::cmd("SET")
            .arg(Self::key(jti))
            .arg("1")
            .arg("NX")
            .arg("EX")
            .arg(Self::entry_ttl(ttl_secs))
            .query_async(&mut redis)
            .await?;
        Ok(set.is_some())
    }
}

/// In-memory registry for tests. TTLs are ignored; the set lives for the
/// process.
#[derive(Default)]
pub struct MemoryRevocationStore {
    revoked: Mutex<HashSet<String>>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn revoke(&self, jti: &str, _ttl_secs: u64) -> Result<(), ApiError> {
        self.revoked.lock().await.insert(jti.to_string());
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, ApiError> {
        Ok(self.revoked.lock().await.contains(jti))
    }

    async fn consume(&self, jti: &str, _ttl_secs: u64) -> Result<bool, ApiError> {
        Ok(self.revoked.lock().await.insert(jti.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_revoke_then_is_revoked() {
        let store = MemoryRevocationStore::new();

        assert!(!store.is_revoked("jti-1").await.unwrap());
        store.revoke("jti-1", 60).await.unwrap();
        assert!(store.is_revoked("jti-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let store = MemoryRevocationStore::new();
        store.revoke("jti-1", 60).await.unwrap();
        store.revoke("jti-1", 60).await.unwrap();
        assert!(store.is_revoked("jti-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_consume_admits_exactly_one_winner() {
        let store = Arc::new(MemoryRevocationStore::new());

        let mut handles = vec![];
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.consume("refresh-jti", 60).await.unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert!(store.is_revoked("refresh-jti").await.unwrap());
    }

    #[tokio::test]
    async fn test_no_missed_writes_under_concurrent_revokers() {
        let store = Arc::new(MemoryRevocationStore::new());

        let mut handles = vec![];
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let jti = format!("jti-{}", i);
                store.revoke(&jti, 60).await.unwrap();
                store.is_revoked(&jti).await.unwrap()
            }));
        }

        for handle in handles {
            // Visible immediately after revoke, for every concurrent caller.
            assert!(handle.await.unwrap());
        }
    }

    #[test]
    fn test_entry_ttl_floor() {
        assert_eq!(RedisRevocationStore::entry_ttl(0), 300);
        assert_eq!(RedisRevocationStore::entry_ttl(10), 300);
        assert_eq!(RedisRevocationStore::entry_ttl(3600), 3600);
    }
}
