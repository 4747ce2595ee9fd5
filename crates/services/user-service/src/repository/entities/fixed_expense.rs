//! Fixed recurring expense database entity.

use sea_orm::entity::prelude::*;

use domain::{ExpenseFrequency, FixedExpense};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "fixed_expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
    pub frequency: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for FixedExpense {
    fn from(model: Model) -> Self {
        FixedExpense {
            id: model.id,
            owner_user_id: model.owner_user_id,
            name: model.name,
            amount: model.amount,
            frequency: model.frequency.parse().unwrap_or(ExpenseFrequency::Daily),
            created_at: model.created_at,
        }
    }
}
