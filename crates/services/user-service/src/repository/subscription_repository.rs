//! Subscription plans, payment orders, subscriptions and payment logs.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{payment_log, payment_order, subscription, subscription_plan};
use super::insert_error;
use common::{AppError, AppResult};
use domain::{
    NewPaymentLog, OrderStatus, PaymentLog, PaymentOrder, Subscription, SubscriptionPlan,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Subscription repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// All plans, cheapest first
    async fn list_plans(&self) -> AppResult<Vec<SubscriptionPlan>>;

    async fn find_plan(&self, id: Uuid) -> AppResult<Option<SubscriptionPlan>>;

    async fn create_order(&self, order: PaymentOrder) -> AppResult<PaymentOrder>;

    async fn find_order(&self, order_id: &str) -> AppResult<Option<PaymentOrder>>;

    /// Mark an open order paid by `payment_id`.
    ///
    /// `false` when the order is missing or already paid. A `payment_id`
    /// that already settled another order is a conflict.
    async fn settle_order(&self, order_id: &str, payment_id: &str) -> AppResult<bool>;

    async fn log_payment(&self, log: NewPaymentLog) -> AppResult<PaymentLog>;

    /// Conflict if a subscription already carries this payment id
    async fn create_subscription(&self, subscription: Subscription) -> AppResult<Subscription>;

    /// Subscription with the latest end date for a user
    async fn latest_for(&self, user_id: Uuid) -> AppResult<Option<Subscription>>;
}

/// Postgres implementation of SubscriptionRepository
pub struct SubscriptionStore {
    db: DatabaseConnection,
}

impl SubscriptionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionStore {
    async fn list_plans(&self) -> AppResult<Vec<SubscriptionPlan>> {
        let models = subscription_plan::Entity::find()
            .order_by_asc(subscription_plan::Column::Price)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(SubscriptionPlan::from).collect())
    }

    async fn find_plan(&self, id: Uuid) -> AppResult<Option<SubscriptionPlan>> {
        let result = subscription_plan::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(SubscriptionPlan::from))
    }

    async fn create_order(&self, order: PaymentOrder) -> AppResult<PaymentOrder> {
        let active_model = payment_order::ActiveModel {
            id: Set(order.id),
            user_id: Set(order.user_id),
            plan_id: Set(order.plan_id),
            amount: Set(order.amount),
            status: Set(order.status.as_str().to_string()),
            payment_id: Set(order.payment_id),
            created_at: Set(order.created_at),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| insert_error(e, "Order"))?;
        Ok(PaymentOrder::from(model))
    }

    async fn find_order(&self, order_id: &str) -> AppResult<Option<PaymentOrder>> {
        let result = payment_order::Entity::find_by_id(order_id.to_string())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(PaymentOrder::from))
    }

    async fn settle_order(&self, order_id: &str, payment_id: &str) -> AppResult<bool> {
        // Conditional on the open status so two settlements cannot both win
        let result = payment_order::Entity::update_many()
            .col_expr(
                payment_order::Column::Status,
                Expr::value(OrderStatus::Paid.as_str()),
            )
            .col_expr(payment_order::Column::PaymentId, Expr::value(payment_id))
            .filter(payment_order::Column::Id.eq(order_id))
            .filter(payment_order::Column::Status.eq(OrderStatus::Created.as_str()))
            .exec(&self.db)
            .await
            .map_err(|e| insert_error(e, "Payment"))?;

        Ok(result.rows_affected == 1)
    }

    async fn log_payment(&self, log: NewPaymentLog) -> AppResult<PaymentLog> {
        let active_model = payment_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(log.user_id),
            payment_id: Set(log.payment_id),
            amount: Set(log.amount),
            status: Set(log.status.as_str().to_string()),
            metadata: Set(log.metadata),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(PaymentLog::from(model))
    }

    async fn create_subscription(&self, subscription: Subscription) -> AppResult<Subscription> {
        let active_model = subscription::ActiveModel {
            id: Set(subscription.id),
            user_id: Set(subscription.user_id),
            plan_id: Set(subscription.plan_id),
            status: Set(subscription.status.as_str().to_string()),
            end_date: Set(subscription.end_date),
            payment_id: Set(subscription.payment_id),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| insert_error(e, "Payment"))?;
        Ok(Subscription::from(model))
    }

    async fn latest_for(&self, user_id: Uuid) -> AppResult<Option<Subscription>> {
        let result = subscription::Entity::find()
            .filter(subscription::Column::UserId.eq(user_id))
            .order_by_desc(subscription::Column::EndDate)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Subscription::from))
    }
}
