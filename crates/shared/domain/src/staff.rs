//! Delegation links between owners and their staff accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::UNAVAILABLE_EMAIL;

/// Record attaching a staff account to the owner it acts for.
///
/// A staff `user_id` appears in at most one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DelegationLink {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub user_id: Uuid,
    pub staff_name: String,
    pub created_at: DateTime<Utc>,
}

/// Delegation link creation data
#[derive(Debug, Clone)]
pub struct NewDelegationLink {
    pub owner_id: Uuid,
    pub user_id: Uuid,
    pub staff_name: String,
}

/// Staff directory row: a link joined with its account's email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StaffMember {
    pub id: Uuid,
    pub user_id: Uuid,
    pub staff_name: String,
    pub created_at: DateTime<Utc>,
    /// Email of the staff account, or the unavailable marker
    pub email: String,
}

impl StaffMember {
    /// Join a link with the email of its account, if one resolved.
    pub fn from_link(link: DelegationLink, email: Option<String>) -> Self {
        Self {
            id: link.id,
            user_id: link.user_id,
            staff_name: link.staff_name,
            created_at: link.created_at,
            email: email.unwrap_or_else(|| UNAVAILABLE_EMAIL.to_string()),
        }
    }

    /// Whether the account email could not be resolved
    pub fn email_unavailable(&self) -> bool {
        self.email == UNAVAILABLE_EMAIL
    }
}
