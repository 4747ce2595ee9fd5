//! Staff directory - owner-scoped management of staff accounts and their
//! delegation links.
//!
//! Create and delete span two tables with no shared transaction, so each is
//! run as a short saga: named steps, a compensation for the one step that
//! can be undone, and a reconciliation pass for the case that cannot.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Account, DelegationLink, NewAccount, NewDelegationLink, Password, StaffMember, UserRole};
use user_service_lib::repository::{AccountRepository, DelegationRepository};

use super::OwnerIndex;

/// Owner's request to add a staff login
#[derive(Debug, Clone)]
pub struct NewStaff {
    pub owner_id: Uuid,
    pub email: String,
    pub password: String,
    pub staff_name: String,
}

/// Steps of the staff create and delete sagas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffStep {
    CheckEmail,
    CreateAccount,
    CreateLink,
    CompensateAccount,
    ReadLink,
    DeleteLink,
    DeleteAccount,
}

impl StaffStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffStep::CheckEmail => "check_email",
            StaffStep::CreateAccount => "create_account",
            StaffStep::CreateLink => "create_link",
            StaffStep::CompensateAccount => "compensate_account",
            StaffStep::ReadLink => "read_link",
            StaffStep::DeleteLink => "delete_link",
            StaffStep::DeleteAccount => "delete_account",
        }
    }
}

impl fmt::Display for StaffStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait StaffDirectory: Send + Sync {
    /// The owner's staff, oldest link first
    async fn list(&self, actor: &Account, owner_id: Uuid) -> AppResult<Vec<StaffMember>>;

    /// Create a staff account and link it to the owner
    async fn create(&self, actor: &Account, request: NewStaff) -> AppResult<DelegationLink>;

    /// Remove a link and then its account
    async fn delete(&self, actor: &Account, link_id: Uuid) -> AppResult<()>;

    /// Delete staff accounts left without a link; returns how many were removed
    async fn reconcile_orphans(&self) -> AppResult<usize>;
}

pub struct StaffManager {
    accounts: Arc<dyn AccountRepository>,
    delegations: Arc<dyn DelegationRepository>,
    index: Arc<dyn OwnerIndex>,
    orphan_grace: Duration,
}

impl StaffManager {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        delegations: Arc<dyn DelegationRepository>,
        index: Arc<dyn OwnerIndex>,
    ) -> Self {
        Self {
            accounts,
            delegations,
            index,
            orphan_grace: Duration::minutes(10),
        }
    }

    /// Skip accounts younger than `grace` when reconciling, so a create
    /// saga still between its account and link steps is left alone.
    pub fn with_orphan_grace(mut self, grace: Duration) -> Self {
        self.orphan_grace = grace;
        self
    }

    /// Ownership is checked here; the view layer only gates by role.
    fn require_owner_of(actor: &Account, owner_id: Uuid) -> AppResult<()> {
        if !actor.is_owner() || actor.id != owner_id {
            warn!(actor = %actor.id, %owner_id, "Staff directory access refused");
            return Err(AppError::Forbidden);
        }
        Ok(())
    }

    async fn compensate(&self, account_id: Uuid) {
        match self.accounts.delete(account_id).await {
            Ok(()) => info!(%account_id, "Rolled back staff account after link failure"),
            Err(e) => error!(
                %account_id,
                step = %StaffStep::CompensateAccount,
                "Rollback failed, staff account left without owner: {}", e
            ),
        }
    }
}

fn validate(request: &NewStaff) -> AppResult<(String, String)> {
    let email = request.email.trim();
    let staff_name = request.staff_name.trim();
    if email.is_empty() || request.password.is_empty() || staff_name.is_empty() {
        return Err(AppError::validation(
            "Email, password and staff name are required",
        ));
    }
    Ok((email.to_string(), staff_name.to_string()))
}

#[async_trait]
impl StaffDirectory for StaffManager {
    async fn list(&self, actor: &Account, owner_id: Uuid) -> AppResult<Vec<StaffMember>> {
        Self::require_owner_of(actor, owner_id)?;

        let links = self.delegations.list_by_owner(owner_id).await?;
        let ids = links.iter().map(|l| l.user_id).collect();
        let accounts = self.accounts.find_many(ids).await?;

        Ok(links
            .into_iter()
            .map(|link| {
                let email = accounts
                    .iter()
                    .find(|a| a.id == link.user_id)
                    .map(|a| a.email.clone());
                StaffMember::from_link(link, email)
            })
            .collect())
    }

    async fn create(&self, actor: &Account, request: NewStaff) -> AppResult<DelegationLink> {
        Self::require_owner_of(actor, request.owner_id)?;
        let (email, staff_name) = validate(&request)?;

        // check_email
        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        // create_account; nothing to undo if this fails
        let password_hash = Password::new(&request.password)?.into_string();
        let account = self
            .accounts
            .create(NewAccount {
                email,
                password_hash,
                full_name: Some(staff_name.clone()),
                role: UserRole::Staff,
            })
            .await?;

        // create_link; a failure here must not leave a login without owner
        let link = match self
            .delegations
            .create(NewDelegationLink {
                owner_id: request.owner_id,
                user_id: account.id,
                staff_name,
            })
            .await
        {
            Ok(link) => link,
            Err(e) => {
                error!(
                    owner_id = %request.owner_id,
                    user_id = %account.id,
                    step = %StaffStep::CreateLink,
                    "Staff link insert failed: {}", e
                );
                self.compensate(account.id).await;
                return Err(AppError::partial_failure(StaffStep::CreateLink.as_str()));
            }
        };

        if let Err(e) = self.index.remember(link.user_id, link.owner_id).await {
            warn!(user_id = %link.user_id, "Could not populate owner index: {}", e);
        }

        info!(owner_id = %link.owner_id, user_id = %link.user_id, "Staff member created");
        Ok(link)
    }

    async fn delete(&self, actor: &Account, link_id: Uuid) -> AppResult<()> {
        // read_link
        let link = self
            .delegations
            .find_by_id(link_id)
            .await?
            .ok_or(AppError::NotFound)?;
        Self::require_owner_of(actor, link.owner_id)?;

        // delete_link, then drop the cached owner before the account goes
        self.delegations.delete(link.id).await?;
        if let Err(e) = self.index.forget(link.user_id).await {
            warn!(user_id = %link.user_id, "Could not evict owner index entry: {}", e);
        }

        // delete_account; the link is gone, so failure leaves an orphan
        // for reconcile_orphans to collect
        if let Err(e) = self.accounts.delete(link.user_id).await {
            error!(
                user_id = %link.user_id,
                step = %StaffStep::DeleteAccount,
                "Staff account left without owner: {}", e
            );
            return Err(AppError::partial_failure(StaffStep::DeleteAccount.as_str()));
        }

        info!(owner_id = %link.owner_id, user_id = %link.user_id, "Staff member deleted");
        Ok(())
    }

    async fn reconcile_orphans(&self) -> AppResult<usize> {
        let linked: HashSet<Uuid> = self
            .delegations
            .list_all()
            .await?
            .into_iter()
            .map(|l| l.user_id)
            .collect();
        let cutoff = Utc::now() - self.orphan_grace;

        let orphans: Vec<Account> = self
            .accounts
            .list_by_role(UserRole::Staff)
            .await?
            .into_iter()
            .filter(|a| !linked.contains(&a.id) && a.created_at <= cutoff)
            .collect();

        let mut removed = 0;
        for orphan in orphans {
            match self.accounts.delete(orphan.id).await {
                Ok(()) | Err(AppError::NotFound) => {
                    removed += 1;
                    info!(user_id = %orphan.id, "Removed orphaned staff account");
                }
                Err(e) => warn!(user_id = %orphan.id, "Orphan cleanup failed, will retry: {}", e),
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::LocalOwnerIndex;
    use user_service_lib::repository::memory::{FailPoint, InMemoryStore};
    use user_service_lib::repository::{MockDelegationRepository, Repositories};

    struct Fixture {
        manager: StaffManager,
        repos: Repositories,
        store: Arc<InMemoryStore>,
        owner: Account,
    }

    async fn fixture() -> Fixture {
        let (repos, store) = Repositories::in_memory();
        let owner = repos
            .accounts
            .create(NewAccount {
                email: "alice@x.com".to_string(),
                password_hash: "hash".to_string(),
                full_name: Some("Alice".to_string()),
                role: UserRole::Owner,
            })
            .await
            .unwrap();
        let manager = StaffManager::new(
            repos.accounts.clone(),
            repos.delegations.clone(),
            Arc::new(LocalOwnerIndex::new(300)),
        )
        .with_orphan_grace(Duration::zero());
        Fixture {
            manager,
            repos,
            store,
            owner,
        }
    }

    fn bob(owner_id: Uuid) -> NewStaff {
        NewStaff {
            owner_id,
            email: "bob@x.com".to_string(),
            password: "pw456".to_string(),
            staff_name: "Bob".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_links_staff_to_owner() {
        let f = fixture().await;

        let link = f.manager.create(&f.owner, bob(f.owner.id)).await.unwrap();

        assert_eq!(link.owner_id, f.owner.id);
        let account = f.repos.accounts.find_by_id(link.user_id).await.unwrap().unwrap();
        assert_eq!(account.role, UserRole::Staff);
        assert_eq!(account.email, "bob@x.com");
    }

    #[tokio::test]
    async fn test_create_rejects_used_email() {
        let f = fixture().await;
        let mut request = bob(f.owner.id);
        request.email = "alice@x.com".to_string();

        let result = f.manager.create(&f.owner, request).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(f.store.accounts().len(), 1);
    }

    #[tokio::test]
    async fn test_link_failure_rolls_back_account() {
        let f = fixture().await;
        f.store.fail(FailPoint::CreateLink);

        let result = f.manager.create(&f.owner, bob(f.owner.id)).await;

        assert!(matches!(result, Err(AppError::PartialFailure(ref s)) if s == "create_link"));
        assert!(f.repos.accounts.find_by_email("bob@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_link_failure_with_mock_store_compensates() {
        let (repos, _) = Repositories::in_memory();
        let owner = repos
            .accounts
            .create(NewAccount {
                email: "alice@x.com".to_string(),
                password_hash: "hash".to_string(),
                full_name: None,
                role: UserRole::Owner,
            })
            .await
            .unwrap();
        let mut delegations = MockDelegationRepository::new();
        delegations
            .expect_create()
            .times(1)
            .returning(|_| Err(AppError::internal("insert timed out")));
        let manager = StaffManager::new(
            repos.accounts.clone(),
            Arc::new(delegations),
            Arc::new(LocalOwnerIndex::new(300)),
        );

        let result = manager.create(&owner, bob(owner.id)).await;

        assert!(matches!(result, Err(AppError::PartialFailure(_))));
        assert_eq!(repos.accounts.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_other_owner_is_forbidden() {
        let f = fixture().await;
        let link = f.manager.create(&f.owner, bob(f.owner.id)).await.unwrap();
        let intruder = f
            .repos
            .accounts
            .create(NewAccount {
                email: "mallory@x.com".to_string(),
                password_hash: "hash".to_string(),
                full_name: None,
                role: UserRole::Owner,
            })
            .await
            .unwrap();

        assert!(matches!(
            f.manager.list(&intruder, f.owner.id).await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            f.manager.create(&intruder, bob(f.owner.id)).await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            f.manager.delete(&intruder, link.id).await,
            Err(AppError::Forbidden)
        ));
        assert!(f.repos.delegations.find_by_id(link.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_staff_cannot_manage_staff() {
        let f = fixture().await;
        let link = f.manager.create(&f.owner, bob(f.owner.id)).await.unwrap();
        let staff = f.repos.accounts.find_by_id(link.user_id).await.unwrap().unwrap();

        let result = f.manager.list(&staff, f.owner.id).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_list_marks_missing_email_unavailable() {
        let f = fixture().await;
        let first = f.manager.create(&f.owner, bob(f.owner.id)).await.unwrap();
        let mut second = bob(f.owner.id);
        second.email = "carol@x.com".to_string();
        second.staff_name = "Carol".to_string();
        f.manager.create(&f.owner, second).await.unwrap();

        // Account vanished behind the link's back
        f.repos.accounts.delete(first.user_id).await.unwrap();

        let staff = f.manager.list(&f.owner, f.owner.id).await.unwrap();
        assert_eq!(staff.len(), 2);
        assert_eq!(staff[0].staff_name, "Bob");
        assert!(staff[0].email_unavailable());
        assert_eq!(staff[1].email, "carol@x.com");
    }

    #[tokio::test]
    async fn test_delete_removes_link_then_account() {
        let f = fixture().await;
        let link = f.manager.create(&f.owner, bob(f.owner.id)).await.unwrap();

        f.manager.delete(&f.owner, link.id).await.unwrap();

        assert!(f.store.links().is_empty());
        assert!(f.repos.accounts.find_by_id(link.user_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_link_is_not_found() {
        let f = fixture().await;
        let result = f.manager.delete(&f.owner, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_failed_account_delete_is_reconciled() {
        let f = fixture().await;
        let link = f.manager.create(&f.owner, bob(f.owner.id)).await.unwrap();
        f.store.fail(FailPoint::DeleteAccount);

        let result = f.manager.delete(&f.owner, link.id).await;
        assert!(matches!(result, Err(AppError::PartialFailure(ref s)) if s == "delete_account"));
        assert!(f.repos.accounts.find_by_id(link.user_id).await.unwrap().is_some());

        f.store.heal(FailPoint::DeleteAccount);
        assert_eq!(f.manager.reconcile_orphans().await.unwrap(), 1);
        assert!(f.repos.accounts.find_by_id(link.user_id).await.unwrap().is_none());

        // Idempotent once clean
        assert_eq!(f.manager.reconcile_orphans().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reconcile_keeps_linked_and_recent_accounts() {
        let f = fixture().await;
        f.manager.create(&f.owner, bob(f.owner.id)).await.unwrap();
        let fresh_orphan = f
            .repos
            .accounts
            .create(NewAccount {
                email: "pending@x.com".to_string(),
                password_hash: "hash".to_string(),
                full_name: None,
                role: UserRole::Staff,
            })
            .await
            .unwrap();

        let patient = StaffManager::new(
            f.repos.accounts.clone(),
            f.repos.delegations.clone(),
            Arc::new(LocalOwnerIndex::new(300)),
        );
        assert_eq!(patient.reconcile_orphans().await.unwrap(), 0);
        assert!(f.repos.accounts.find_by_id(fresh_orphan.id).await.unwrap().is_some());

        assert_eq!(f.manager.reconcile_orphans().await.unwrap(), 1);
        assert_eq!(f.store.accounts().len(), 2);
    }
}
