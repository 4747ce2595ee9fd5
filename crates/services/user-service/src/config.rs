//! User service configuration.

use common::DatabaseConfig;

/// Store configuration.
#[derive(Debug, Clone, Default)]
pub struct UserServiceConfig {
    pub database: DatabaseConfig,
}

impl UserServiceConfig {
    /// Load from `USER_SERVICE_DATABASE_URL`, falling back to `DATABASE_URL`.
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig::from_env("USER_SERVICE"),
        }
    }
}
