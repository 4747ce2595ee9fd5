//! Precomputed staff → owner lookup.
//!
//! The index is a cache in front of the delegation table, never the source
//! of truth: entries expire after a TTL and are dropped when a link is
//! deleted, and every miss or error falls through to the table.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, RedisError};
use tracing::{debug, warn};
use uuid::Uuid;

use common::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Cache key prefix for owner lookups
const KEY_PREFIX_OWNER: &str = "owner_of:";

#[cfg_attr(test, automock)]
#[async_trait]
pub trait OwnerIndex: Send + Sync {
    /// `Ok(None)` is a miss, not an absent link
    async fn lookup(&self, staff_id: Uuid) -> AppResult<Option<Uuid>>;

    async fn remember(&self, staff_id: Uuid, owner_id: Uuid) -> AppResult<()>;

    async fn forget(&self, staff_id: Uuid) -> AppResult<()>;

    /// Connectivity check for health reporting
    async fn ping(&self) -> AppResult<()>;
}

fn key(staff_id: Uuid) -> String {
    format!("{}{}", KEY_PREFIX_OWNER, staff_id)
}

/// Redis-backed index shared by every gateway instance.
pub struct RedisOwnerIndex {
    conn: ConnectionManager,
    ttl_seconds: u64,
}

impl RedisOwnerIndex {
    /// Connect to Redis.
    pub async fn connect(url: &str, ttl_seconds: u64) -> Result<Self, RedisError> {
        debug!("Connecting to Redis at {}", url);
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn, ttl_seconds })
    }
}

#[async_trait]
impl OwnerIndex for RedisOwnerIndex {
    async fn lookup(&self, staff_id: Uuid) -> AppResult<Option<Uuid>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key(staff_id)).await?;

        match value {
            Some(raw) => match Uuid::parse_str(&raw) {
                Ok(owner_id) => Ok(Some(owner_id)),
                Err(e) => {
                    warn!(%staff_id, "Discarding unparsable owner index entry: {}", e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn remember(&self, staff_id: Uuid, owner_id: Uuid) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key(staff_id), owner_id.to_string(), self.ttl_seconds)
            .await?;
        Ok(())
    }

    async fn forget(&self, staff_id: Uuid) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key(staff_id)).await?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

/// In-process index for single-instance deployments and tests.
///
/// Entries live in one process only. Behind several gateway instances an
/// eviction here does not reach the others, which keep a removed link until
/// their own TTL runs out; use [`RedisOwnerIndex`] there.
pub struct LocalOwnerIndex {
    entries: RwLock<HashMap<Uuid, (Uuid, Instant)>>,
    ttl: Duration,
}

impl LocalOwnerIndex {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    fn poisoned() -> AppError {
        AppError::internal("owner index lock poisoned")
    }
}

#[async_trait]
impl OwnerIndex for LocalOwnerIndex {
    async fn lookup(&self, staff_id: Uuid) -> AppResult<Option<Uuid>> {
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(entries
            .get(&staff_id)
            .filter(|(_, stored_at)| stored_at.elapsed() < self.ttl)
            .map(|(owner_id, _)| *owner_id))
    }

    async fn remember(&self, staff_id: Uuid, owner_id: Uuid) -> AppResult<()> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.insert(staff_id, (owner_id, Instant::now()));
        Ok(())
    }

    async fn forget(&self, staff_id: Uuid) -> AppResult<()> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.remove(&staff_id);
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
