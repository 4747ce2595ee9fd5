//! Payment order database entity.

use sea_orm::entity::prelude::*;

use domain::{OrderStatus, PaymentOrder};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
    pub status: String,
    #[sea_orm(unique)]
    pub payment_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PaymentOrder {
    fn from(model: Model) -> Self {
        PaymentOrder {
            id: model.id,
            user_id: model.user_id,
            plan_id: model.plan_id,
            amount: model.amount,
            status: OrderStatus::from_stored(&model.status),
            payment_id: model.payment_id,
            created_at: model.created_at,
        }
    }
}
