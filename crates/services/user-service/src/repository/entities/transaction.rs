//! Ledger transaction database entity.

use sea_orm::entity::prelude::*;

use domain::{Transaction, TransactionType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub cost_price: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub profit_amount: Option<Decimal>,
    pub kind: String,
    pub occurred_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Transaction {
    fn from(model: Model) -> Self {
        Transaction {
            id: model.id,
            owner_user_id: model.owner_user_id,
            name: model.name,
            amount: model.amount,
            cost_price: model.cost_price,
            profit_amount: model.profit_amount,
            kind: model.kind.parse().unwrap_or(TransactionType::Expense),
            occurred_at: model.occurred_at,
        }
    }
}
