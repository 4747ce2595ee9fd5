//! Subscription plan database entity.

use sea_orm::entity::prelude::*;

use domain::SubscriptionPlan;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "subscription_plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub features: Json,
    pub duration_days: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SubscriptionPlan {
    fn from(model: Model) -> Self {
        SubscriptionPlan {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            features: SubscriptionPlan::features_from_json(&model.features),
            duration_days: model.duration_days,
        }
    }
}
