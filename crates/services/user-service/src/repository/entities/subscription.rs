//! User subscription database entity.

use sea_orm::entity::prelude::*;

use domain::{Subscription, SubscriptionStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub status: String,
    pub end_date: DateTimeUtc,
    #[sea_orm(unique)]
    pub payment_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Subscription {
    fn from(model: Model) -> Self {
        Subscription {
            id: model.id,
            user_id: model.user_id,
            plan_id: model.plan_id,
            status: SubscriptionStatus::from_stored(&model.status),
            end_date: model.end_date,
            payment_id: model.payment_id,
        }
    }
}
