//! Staff delegation resolver: which owner a staff account writes for.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::Account;
use user_service_lib::repository::DelegationRepository;

use super::OwnerIndex;

#[async_trait]
pub trait DelegationResolver: Send + Sync {
    /// Owner of a staff account; `NoOwnerLinked` when no link exists
    async fn resolve_owner(&self, staff_id: Uuid) -> AppResult<Uuid>;

    /// The account id owner-scoped records are stored under for `actor`.
    ///
    /// Owners and admins write under their own id; staff under their
    /// owner's. Resolution is one level deep.
    async fn attribute(&self, actor: &Account) -> AppResult<Uuid> {
        if actor.is_staff() {
            self.resolve_owner(actor.id).await
        } else {
            Ok(actor.id)
        }
    }
}

pub struct OwnerResolver {
    index: Arc<dyn OwnerIndex>,
    delegations: Arc<dyn DelegationRepository>,
}

impl OwnerResolver {
    pub fn new(index: Arc<dyn OwnerIndex>, delegations: Arc<dyn DelegationRepository>) -> Self {
        Self { index, delegations }
    }

    async fn from_table(&self, staff_id: Uuid) -> AppResult<Uuid> {
        let link = self
            .delegations
            .find_by_user(staff_id)
            .await?
            .ok_or(AppError::NoOwnerLinked)?;

        if let Err(e) = self.index.remember(staff_id, link.owner_id).await {
            warn!(%staff_id, "Could not populate owner index: {}", e);
        }

        Ok(link.owner_id)
    }
}

#[async_trait]
impl DelegationResolver for OwnerResolver {
    async fn resolve_owner(&self, staff_id: Uuid) -> AppResult<Uuid> {
        match self.index.lookup(staff_id).await {
            Ok(Some(owner_id)) => {
                debug!(%staff_id, %owner_id, "Owner index hit");
                Ok(owner_id)
            }
            Ok(None) => self.from_table(staff_id).await,
            Err(e) => {
                warn!(%staff_id, "Owner index unavailable, reading delegation table: {}", e);
                self.from_table(staff_id).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{LocalOwnerIndex, MockOwnerIndex};
    use domain::{NewDelegationLink, UserRole};
    use user_service_lib::repository::{MockDelegationRepository, Repositories};

    fn staff_account() -> Account {
        Account::new(
            Uuid::new_v4(),
            "bob@x.com".to_string(),
            "hash".to_string(),
            None,
            UserRole::Staff,
        )
    }

    async fn linked(repos: &Repositories, staff_id: Uuid) -> Uuid {
        let owner_id = Uuid::new_v4();
        repos
            .delegations
            .create(NewDelegationLink {
                owner_id,
                user_id: staff_id,
                staff_name: "Bob".to_string(),
            })
            .await
            .unwrap();
        owner_id
    }

    #[tokio::test]
    async fn test_index_miss_reads_table_and_remembers() {
        let (repos, _) = Repositories::in_memory();
        let index = Arc::new(LocalOwnerIndex::new(300));
        let resolver = OwnerResolver::new(index.clone(), repos.delegations.clone());
        let staff = staff_account();
        let owner_id = linked(&repos, staff.id).await;

        assert_eq!(resolver.resolve_owner(staff.id).await.unwrap(), owner_id);
        assert_eq!(index.lookup(staff.id).await.unwrap(), Some(owner_id));
    }

    #[tokio::test]
    async fn test_index_error_falls_back_to_table() {
        let (repos, _) = Repositories::in_memory();
        let staff = staff_account();
        let owner_id = linked(&repos, staff.id).await;

        let mut index = MockOwnerIndex::new();
        index
            .expect_lookup()
            .returning(|_| Err(AppError::service_unavailable("redis")));
        index
            .expect_remember()
            .returning(|_, _| Err(AppError::service_unavailable("redis")));
        let resolver = OwnerResolver::new(Arc::new(index), repos.delegations.clone());

        assert_eq!(resolver.resolve_owner(staff.id).await.unwrap(), owner_id);
    }

    #[tokio::test]
    async fn test_index_and_table_agree() {
        let (repos, _) = Repositories::in_memory();
        let index = Arc::new(LocalOwnerIndex::new(300));
        let resolver = OwnerResolver::new(index.clone(), repos.delegations.clone());
        let staff = staff_account();
        let owner_id = linked(&repos, staff.id).await;

        let cold = resolver.resolve_owner(staff.id).await.unwrap();
        let warm = resolver.resolve_owner(staff.id).await.unwrap();
        let direct = repos.delegations.find_by_user(staff.id).await.unwrap().unwrap();

        assert_eq!(cold, owner_id);
        assert_eq!(warm, owner_id);
        assert_eq!(direct.owner_id, owner_id);
    }

    #[tokio::test]
    async fn test_unlinked_staff_has_no_owner() {
        let mut index = MockOwnerIndex::new();
        index.expect_lookup().returning(|_| Ok(None));
        let mut delegations = MockDelegationRepository::new();
        delegations.expect_find_by_user().returning(|_| Ok(None));
        let resolver = OwnerResolver::new(Arc::new(index), Arc::new(delegations));

        let result = resolver.attribute(&staff_account()).await;
        assert!(matches!(result, Err(AppError::NoOwnerLinked)));
    }

    #[tokio::test]
    async fn test_owner_and_admin_attribute_to_themselves() {
        let mut index = MockOwnerIndex::new();
        index.expect_lookup().times(0);
        let resolver = OwnerResolver::new(Arc::new(index), Arc::new(MockDelegationRepository::new()));

        for role in [UserRole::Owner, UserRole::Admin] {
            let actor = Account::new(
                Uuid::new_v4(),
                "a@x.com".to_string(),
                "hash".to_string(),
                None,
                role,
            );
            assert_eq!(resolver.attribute(&actor).await.unwrap(), actor.id);
        }
    }
}
