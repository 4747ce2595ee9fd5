//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Account Roles
// =============================================================================

/// Platform administrator with cross-owner privileges
pub const ROLE_ADMIN: &str = "admin";

/// Shop proprietor, default role for self-service sign-up
pub const ROLE_OWNER: &str = "owner";

/// Shop employee acting on behalf of exactly one owner
pub const ROLE_STAFF: &str = "staff";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_OWNER, ROLE_STAFF];

/// Check if a role value is valid
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

// =============================================================================
// Staff Directory
// =============================================================================

/// Shown in place of a staff email that could not be resolved
pub const UNAVAILABLE_EMAIL: &str = "N/A";

// =============================================================================
// Session
// =============================================================================

/// Fixed key of the persisted session slot in client-local storage
pub const SESSION_STORAGE_KEY: &str = "phoneMetricsUser";

// =============================================================================
// Ledger
// =============================================================================

/// Days used to spread a weekly fixed expense
pub const DAYS_PER_WEEK: u32 = 7;

/// Days used to spread a monthly fixed expense
pub const DAYS_PER_MONTH: u32 = 30;
