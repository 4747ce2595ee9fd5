//! Account repository: the credential store.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::insert_error;
use common::{AppError, AppResult, OptionExt};
use domain::{Account, NewAccount, UserRole};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Find account by exact email; `Ok(None)` when absent
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Find every account whose ID is listed; missing IDs are skipped
    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Account>>;

    /// List all accounts, newest first
    async fn list(&self) -> AppResult<Vec<Account>>;

    /// List accounts holding a role
    async fn list_by_role(&self, role: UserRole) -> AppResult<Vec<Account>>;

    /// Insert an account; a taken email is a conflict
    async fn create(&self, account: NewAccount) -> AppResult<Account>;

    /// Change an account's role
    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<Account>;

    /// Change an account's display name
    async fn update_profile(&self, id: Uuid, full_name: Option<String>) -> AppResult<Account>;

    /// Delete account by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Postgres implementation of AccountRepository
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<user::Model> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Account::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Account::from))
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Account>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = UserEntity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Account::from).collect())
    }

    async fn list(&self) -> AppResult<Vec<Account>> {
        let models = UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Account::from).collect())
    }

    async fn list_by_role(&self, role: UserRole) -> AppResult<Vec<Account>> {
        let models = UserEntity::find()
            .filter(user::Column::Role.eq(role.as_str()))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Account::from).collect())
    }

    async fn create(&self, account: NewAccount) -> AppResult<Account> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(account.email),
            password_hash: Set(account.password_hash),
            full_name: Set(account.full_name),
            role: Set(Some(account.role.to_string())),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| insert_error(e, "User"))?;
        Ok(Account::from(model))
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<Account> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.role = Set(Some(role.to_string()));

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Account::from(model))
    }

    async fn update_profile(&self, id: Uuid, full_name: Option<String>) -> AppResult<Account> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.full_name = Set(full_name);

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Account::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
