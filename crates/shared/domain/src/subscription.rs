//! Subscription plans, payment orders, subscriptions and payment logs.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A purchasable plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SubscriptionPlan {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub price: Decimal,
    pub features: Vec<String>,
    pub duration_days: i32,
}

impl SubscriptionPlan {
    /// End of a subscription to this plan starting at `from`
    pub fn ends_at(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        from + Duration::days(i64::from(self.duration_days))
    }

    /// Parse the stored features column; anything but a string array is empty.
    pub fn features_from_json(value: &serde_json::Value) -> Vec<String> {
        value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Paid,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Paid => "paid",
        }
    }

    /// Unknown values count as paid so they can never be settled again
    pub fn from_stored(value: &str) -> Self {
        if value == "created" {
            OrderStatus::Created
        } else {
            OrderStatus::Paid
        }
    }
}

/// What a user agreed to pay for, recorded before checkout opens.
///
/// The checkout callback names the order; plan and amount come from here,
/// never from the callback. An order settles at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PaymentOrder {
    pub id: String,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub amount: Decimal,
    pub status: OrderStatus,
    /// Set once the order is paid
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PaymentOrder {
    /// Fresh unpaid order for `plan` at its current price
    pub fn for_plan(user_id: Uuid, plan: &SubscriptionPlan) -> Self {
        Self {
            id: format!("order_{}", Uuid::new_v4().simple()),
            user_id,
            plan_id: plan.id,
            amount: plan.price,
            status: OrderStatus::Created,
            payment_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Created
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_stored(value: &str) -> Self {
        match value {
            "active" => SubscriptionStatus::Active,
            "cancelled" => SubscriptionStatus::Cancelled,
            _ => SubscriptionStatus::Expired,
        }
    }
}

/// A user's subscription to a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub status: SubscriptionStatus,
    pub end_date: DateTime<Utc>,
    pub payment_id: String,
}

impl Subscription {
    /// Active and not yet past its end date
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active && self.end_date > now
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn from_stored(value: &str) -> Self {
        if value == "success" {
            PaymentStatus::Success
        } else {
            PaymentStatus::Failed
        }
    }
}

/// Record of every payment confirmation received, verified or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub payment_id: String,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPaymentLog {
    pub user_id: Uuid,
    pub payment_id: String,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub metadata: serde_json::Value,
}
