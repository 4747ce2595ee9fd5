//! Delegation link repository (the `staff` table).

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::staff::{self, ActiveModel, Entity as StaffEntity};
use super::insert_error;
use common::{AppError, AppResult};
use domain::{DelegationLink, NewDelegationLink};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Delegation link repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DelegationRepository: Send + Sync {
    /// Find link by its own ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DelegationLink>>;

    /// Find the link of a staff account (keyed lookup on the unique `user_id`)
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<DelegationLink>>;

    /// Every link in the table
    async fn list_all(&self) -> AppResult<Vec<DelegationLink>>;

    /// Links of one owner, oldest first
    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<DelegationLink>>;

    /// Insert a link; a staff account already linked is a conflict
    async fn create(&self, link: NewDelegationLink) -> AppResult<DelegationLink>;

    /// Delete link by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Postgres implementation of DelegationRepository
pub struct DelegationStore {
    db: DatabaseConnection,
}

impl DelegationStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DelegationRepository for DelegationStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DelegationLink>> {
        let result = StaffEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(DelegationLink::from))
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<DelegationLink>> {
        let result = StaffEntity::find()
            .filter(staff::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(DelegationLink::from))
    }

    async fn list_all(&self) -> AppResult<Vec<DelegationLink>> {
        let models = StaffEntity::find()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(DelegationLink::from).collect())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<DelegationLink>> {
        let models = StaffEntity::find()
            .filter(staff::Column::OwnerId.eq(owner_id))
            .order_by_asc(staff::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(DelegationLink::from).collect())
    }

    async fn create(&self, link: NewDelegationLink) -> AppResult<DelegationLink> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(link.owner_id),
            user_id: Set(link.user_id),
            staff_name: Set(link.staff_name),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| insert_error(e, "Staff link"))?;
        Ok(DelegationLink::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = StaffEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
