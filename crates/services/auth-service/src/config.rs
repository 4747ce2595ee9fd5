//! Auth service configuration.

use std::env;
use std::str::FromStr;

use common::CacheConfig;

/// Upper bound on the process-local owner index TTL. Evictions there are not
/// seen by other instances, so stale entries must age out quickly.
pub const LOCAL_OWNER_INDEX_MAX_TTL_SECONDS: u64 = 30;

/// Where the staff → owner index lives.
///
/// `Memory` is for a single gateway instance: `forget` only evicts the
/// local copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OwnerIndexBackend {
    #[default]
    Redis,
    Memory,
}

impl FromStr for OwnerIndexBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" | "local" => Ok(Self::Memory),
            other => Err(format!("unknown owner index backend: {}", other)),
        }
    }
}

/// Auth service configuration.
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    pub owner_index: OwnerIndexBackend,
    /// Redis connection and owner index TTL
    pub cache: CacheConfig,
    /// Shared secret for payment signatures; verification fails closed without it
    pub payment_secret: Option<String>,
    /// Minimum age before an unlinked staff account is reconciled away
    pub orphan_grace_seconds: i64,
}

impl AuthServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            owner_index: env::var("AUTH_SERVICE_OWNER_INDEX")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(defaults.owner_index),
            cache: CacheConfig::from_env("AUTH_SERVICE"),
            payment_secret: env::var("PAYMENT_SECRET")
                .or_else(|_| env::var("AUTH_SERVICE_PAYMENT_SECRET"))
                .ok()
                .filter(|s| !s.is_empty()),
            orphan_grace_seconds: env::var("AUTH_SERVICE_ORPHAN_GRACE_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.orphan_grace_seconds),
        }
    }
}

impl AuthServiceConfig {
    /// TTL for owner index entries under the configured backend
    pub fn owner_index_ttl_seconds(&self) -> u64 {
        match self.owner_index {
            OwnerIndexBackend::Redis => self.cache.default_ttl_seconds,
            OwnerIndexBackend::Memory => self
                .cache
                .default_ttl_seconds
                .min(LOCAL_OWNER_INDEX_MAX_TTL_SECONDS),
        }
    }
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            owner_index: OwnerIndexBackend::Redis,
            cache: CacheConfig::default(),
            payment_secret: None,
            orphan_grace_seconds: 600,
        }
    }
}
