//! Subscription plans, checkout orders and payment confirmation.
//!
//! Checkout starts from an order the server records with the plan and the
//! amount due. The signed callback only proves that the order was paid, so
//! the plan comes from the order and each order settles once.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{
    Account, NewPaymentLog, PaymentOrder, PaymentStatus, Subscription, SubscriptionPlan,
    SubscriptionStatus,
};
use user_service_lib::repository::SubscriptionRepository;

type HmacSha256 = Hmac<Sha256>;

/// Checkout callback fields as returned by the payment widget
#[derive(Debug, Clone)]
pub struct PaymentConfirmation {
    pub payment_id: String,
    pub order_id: String,
    /// Hex HMAC-SHA256 of `"{order_id}|{payment_id}"`
    pub signature: String,
    /// Must match the plan the order was opened for
    pub plan_id: Uuid,
}

#[async_trait]
pub trait SubscriptionService: Send + Sync {
    /// Plans, cheapest first
    async fn plans(&self) -> AppResult<Vec<SubscriptionPlan>>;

    /// Record an unpaid order for `plan_id` at the plan's price
    async fn create_order(&self, actor: &Account, plan_id: Uuid) -> AppResult<PaymentOrder>;

    /// Settle the actor's order, log the payment, then activate the
    /// order's plan.
    ///
    /// A forged signature, someone else's order or a plan other than the
    /// ordered one fails verification. A paid order or a spent payment id is
    /// a conflict.
    async fn verify_payment(
        &self,
        actor: &Account,
        confirmation: PaymentConfirmation,
    ) -> AppResult<Subscription>;

    /// Latest subscription if it is still running
    async fn current_subscription(&self, actor: &Account) -> AppResult<Option<Subscription>>;
}

pub struct Subscriptions {
    repo: Arc<dyn SubscriptionRepository>,
    payment_secret: Option<String>,
}

impl Subscriptions {
    pub fn new(repo: Arc<dyn SubscriptionRepository>, payment_secret: Option<String>) -> Self {
        Self {
            repo,
            payment_secret,
        }
    }
}

fn payment_mac(secret: &str, order_id: &str, payment_id: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    Some(mac)
}

/// Hex signature the checkout provider sends for a paid order.
pub fn payment_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
    payment_mac(secret, order_id, payment_id)
        .map(|mac| hex::encode(mac.finalize().into_bytes()))
        .unwrap_or_default()
}

/// Constant-time check of a hex signature over `"{order_id}|{payment_id}"`.
pub fn signature_matches(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    payment_mac(secret, order_id, payment_id)
        .is_some_and(|mac| mac.verify_slice(&expected).is_ok())
}

#[async_trait]
impl SubscriptionService for Subscriptions {
    async fn plans(&self) -> AppResult<Vec<SubscriptionPlan>> {
        self.repo.list_plans().await
    }

    async fn create_order(&self, actor: &Account, plan_id: Uuid) -> AppResult<PaymentOrder> {
        let plan = self.repo.find_plan(plan_id).await?.ok_or(AppError::NotFound)?;
        let order = self
            .repo
            .create_order(PaymentOrder::for_plan(actor.id, &plan))
            .await?;

        tracing::info!(
            user_id = %actor.id,
            order_id = %order.id,
            plan = %plan.name,
            "Order created"
        );
        Ok(order)
    }

    async fn verify_payment(
        &self,
        actor: &Account,
        confirmation: PaymentConfirmation,
    ) -> AppResult<Subscription> {
        let secret = self
            .payment_secret
            .as_deref()
            .ok_or_else(|| AppError::internal("payment secret is not configured"))?;

        if confirmation.payment_id.is_empty()
            || confirmation.order_id.is_empty()
            || confirmation.signature.is_empty()
        {
            return Err(AppError::validation("Payment details are required"));
        }

        let order = self
            .repo
            .find_order(&confirmation.order_id)
            .await?
            .filter(|o| o.user_id == actor.id && o.plan_id == confirmation.plan_id);
        let plan = match &order {
            Some(order) => self.repo.find_plan(order.plan_id).await?,
            None => None,
        };
        let signed = signature_matches(
            secret,
            &confirmation.order_id,
            &confirmation.payment_id,
            &confirmation.signature,
        );

        let outcome = match (&order, plan) {
            (Some(order), Some(plan)) if signed => {
                match self
                    .repo
                    .settle_order(&order.id, &confirmation.payment_id)
                    .await
                {
                    Ok(true) => Ok(plan),
                    Ok(false) | Err(AppError::Conflict(_)) => Err(AppError::conflict("Payment")),
                    Err(e) => return Err(e),
                }
            }
            _ => Err(AppError::validation("Payment verification failed")),
        };

        self.repo
            .log_payment(NewPaymentLog {
                user_id: actor.id,
                payment_id: confirmation.payment_id.clone(),
                amount: order.as_ref().map_or(Decimal::ZERO, |o| o.amount),
                status: if outcome.is_ok() {
                    PaymentStatus::Success
                } else {
                    PaymentStatus::Failed
                },
                metadata: json!({
                    "order_id": confirmation.order_id,
                    "plan_id": confirmation.plan_id,
                    "signature_valid": signed,
                    "verified": outcome.is_ok(),
                }),
            })
            .await?;

        let plan = match outcome {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(
                    user_id = %actor.id,
                    order_id = %confirmation.order_id,
                    payment_id = %confirmation.payment_id,
                    "Payment rejected: {}",
                    e
                );
                return Err(e);
            }
        };

        let subscription = self
            .repo
            .create_subscription(Subscription {
                id: Uuid::new_v4(),
                user_id: actor.id,
                plan_id: plan.id,
                status: SubscriptionStatus::Active,
                end_date: plan.ends_at(Utc::now()),
                payment_id: confirmation.payment_id,
            })
            .await?;

        tracing::info!(user_id = %actor.id, plan = %plan.name, "Subscription activated");
        Ok(subscription)
    }

    async fn current_subscription(&self, actor: &Account) -> AppResult<Option<Subscription>> {
        let latest = self.repo.latest_for(actor.id).await?;
        Ok(latest.filter(|s| s.is_current(Utc::now())))
    }
}
