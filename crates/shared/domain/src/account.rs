//! Account domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{ROLE_ADMIN, ROLE_OWNER, ROLE_STAFF};
use crate::error::DomainError;

/// Account roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Owner,
    Staff,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Check if this role owns a shop
    pub fn is_owner(&self) -> bool {
        matches!(self, UserRole::Owner)
    }

    /// Check if this role acts on behalf of an owner
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Staff)
    }

    /// Interpret a role column that may be missing or hold a legacy value.
    ///
    /// Rows written before roles existed carry no role and belong to owners.
    pub fn from_stored(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or(UserRole::Owner)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::Owner => ROLE_OWNER,
            UserRole::Staff => ROLE_STAFF,
        }
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(UserRole::Admin),
            ROLE_OWNER => Ok(UserRole::Owner),
            ROLE_STAFF => Ok(UserRole::Staff),
            other => Err(DomainError::validation(format!(
                "Invalid role '{}'. Must be 'admin', 'owner' or 'staff'",
                other
            ))),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with the given role
    pub fn new(
        id: Uuid,
        email: String,
        password_hash: String,
        full_name: Option<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            full_name,
            role,
            created_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_owner(&self) -> bool {
        self.role.is_owner()
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    /// Update account's role
    pub fn update_role(&mut self, role: UserRole) {
        self.role = role;
    }

    /// Update account's display name
    pub fn update_full_name(&mut self, full_name: Option<String>) {
        self.full_name = full_name;
    }
}

/// Account creation data (password already hashed)
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: UserRole,
}

/// Account shape safe to hand to clients; also the persisted session value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AccountResponse {
    /// Unique account identifier
    pub id: Uuid,
    /// Account email address
    pub email: String,
    /// Display name
    pub full_name: Option<String>,
    /// Account role
    pub role: UserRole,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            full_name: account.full_name,
            role: account.role,
        }
    }
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            role: account.role,
        }
    }
}
