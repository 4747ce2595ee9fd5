//! Payment log database entity.

use sea_orm::entity::prelude::*;

use domain::{PaymentLog, PaymentStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub payment_id: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
    pub status: String,
    pub metadata: Json,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PaymentLog {
    fn from(model: Model) -> Self {
        PaymentLog {
            id: model.id,
            user_id: model.user_id,
            payment_id: model.payment_id,
            amount: model.amount,
            status: PaymentStatus::from_stored(&model.status),
            metadata: model.metadata,
            created_at: model.created_at,
        }
    }
}
