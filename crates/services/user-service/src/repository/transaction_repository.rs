//! Ledger transaction repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::transaction::{self, ActiveModel, Entity as TransactionEntity};
use common::{AppError, AppResult};
use domain::{DateRange, Transaction};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Transaction repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Persist a fully attributed transaction
    async fn insert(&self, transaction: Transaction) -> AppResult<Transaction>;

    /// Transactions of an owner, newest first, optionally within a range
    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        range: Option<DateRange>,
    ) -> AppResult<Vec<Transaction>>;

    /// Delete one of an owner's transactions
    async fn delete(&self, owner_id: Uuid, id: Uuid) -> AppResult<()>;
}

/// Postgres implementation of TransactionRepository
pub struct TransactionStore {
    db: DatabaseConnection,
}

impl TransactionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionRepository for TransactionStore {
    async fn insert(&self, transaction: Transaction) -> AppResult<Transaction> {
        let active_model = ActiveModel {
            id: Set(transaction.id),
            owner_user_id: Set(transaction.owner_user_id),
            name: Set(transaction.name),
            amount: Set(transaction.amount),
            cost_price: Set(transaction.cost_price),
            profit_amount: Set(transaction.profit_amount),
            kind: Set(transaction.kind.as_str().to_string()),
            occurred_at: Set(transaction.occurred_at),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Transaction::from(model))
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        range: Option<DateRange>,
    ) -> AppResult<Vec<Transaction>> {
        let mut query = TransactionEntity::find()
            .filter(transaction::Column::OwnerUserId.eq(owner_id));

        if let Some(range) = range {
            query = query
                .filter(transaction::Column::OccurredAt.gte(range.start))
                .filter(transaction::Column::OccurredAt.lt(range.end));
        }

        let models = query
            .order_by_desc(transaction::Column::OccurredAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Transaction::from).collect())
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> AppResult<()> {
        let result = TransactionEntity::delete_many()
            .filter(transaction::Column::Id.eq(id))
            .filter(transaction::Column::OwnerUserId.eq(owner_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
