//! Fixed expense repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::fixed_expense::{self, ActiveModel, Entity as FixedExpenseEntity};
use common::{AppError, AppResult};
use domain::{FixedExpense, NewFixedExpense};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Fixed expense repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FixedExpenseRepository: Send + Sync {
    async fn insert(&self, expense: FixedExpense) -> AppResult<FixedExpense>;

    /// Fixed expenses of an owner, oldest first
    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<FixedExpense>>;

    /// Replace name, amount and frequency of one of an owner's expenses
    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        changes: NewFixedExpense,
    ) -> AppResult<FixedExpense>;

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> AppResult<()>;
}

/// Postgres implementation of FixedExpenseRepository
pub struct FixedExpenseStore {
    db: DatabaseConnection,
}

impl FixedExpenseStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FixedExpenseRepository for FixedExpenseStore {
    async fn insert(&self, expense: FixedExpense) -> AppResult<FixedExpense> {
        let active_model = ActiveModel {
            id: Set(expense.id),
            owner_user_id: Set(expense.owner_user_id),
            name: Set(expense.name),
            amount: Set(expense.amount),
            frequency: Set(expense.frequency.as_str().to_string()),
            created_at: Set(expense.created_at),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(FixedExpense::from(model))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<FixedExpense>> {
        let models = FixedExpenseEntity::find()
            .filter(fixed_expense::Column::OwnerUserId.eq(owner_id))
            .order_by_asc(fixed_expense::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(FixedExpense::from).collect())
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        changes: NewFixedExpense,
    ) -> AppResult<FixedExpense> {
        let model = FixedExpenseEntity::find_by_id(id)
            .filter(fixed_expense::Column::OwnerUserId.eq(owner_id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        active.name = Set(changes.name);
        active.amount = Set(changes.amount);
        active.frequency = Set(changes.frequency.as_str().to_string());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(FixedExpense::from(model))
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> AppResult<()> {
        let result = FixedExpenseEntity::delete_many()
            .filter(fixed_expense::Column::Id.eq(id))
            .filter(fixed_expense::Column::OwnerUserId.eq(owner_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
