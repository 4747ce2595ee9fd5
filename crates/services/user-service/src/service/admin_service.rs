//! Admin service - account management for administrators plus self-service
//! profile edits.
//!
//! The acting account is always the one the server loaded for the request;
//! the admin check happens here, not in the caller.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Account, AccountResponse, NewAccount, Password, UserRole};

use crate::repository::{AccountRepository, DelegationRepository};

/// Admin-issued account creation request (plain-text password)
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub role: Option<UserRole>,
}

#[async_trait]
pub trait AdminService: Send + Sync {
    /// Every account, newest first
    async fn get_users(&self, actor: &Account) -> AppResult<Vec<AccountResponse>>;

    /// Create an account; role defaults to owner
    async fn create_user(&self, actor: &Account, request: CreateAccount)
        -> AppResult<AccountResponse>;

    async fn update_user_role(
        &self,
        actor: &Account,
        user_id: Uuid,
        role: UserRole,
    ) -> AppResult<AccountResponse>;

    async fn delete_user(&self, actor: &Account, user_id: Uuid) -> AppResult<()>;

    /// Change the actor's own display name
    async fn update_profile(
        &self,
        actor: &Account,
        full_name: Option<String>,
    ) -> AppResult<AccountResponse>;
}

pub struct AccountAdmin {
    accounts: Arc<dyn AccountRepository>,
    delegations: Arc<dyn DelegationRepository>,
}

impl AccountAdmin {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        delegations: Arc<dyn DelegationRepository>,
    ) -> Self {
        Self {
            accounts,
            delegations,
        }
    }

    fn require_admin(actor: &Account) -> AppResult<()> {
        if !actor.is_admin() {
            tracing::warn!(actor = %actor.id, role = %actor.role, "Admin action refused");
            return Err(AppError::Forbidden);
        }
        Ok(())
    }

    /// Staff accounts only come into existence through their owner's
    /// staff flow, which also writes the delegation link.
    fn reject_staff_role(role: UserRole) -> AppResult<()> {
        if role.is_staff() {
            return Err(AppError::validation(
                "Staff accounts are created by their owner",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AdminService for AccountAdmin {
    async fn get_users(&self, actor: &Account) -> AppResult<Vec<AccountResponse>> {
        Self::require_admin(actor)?;

        let accounts = self.accounts.list().await?;
        Ok(accounts.into_iter().map(AccountResponse::from).collect())
    }

    async fn create_user(
        &self,
        actor: &Account,
        request: CreateAccount,
    ) -> AppResult<AccountResponse> {
        Self::require_admin(actor)?;

        let email = request.email.trim().to_string();
        if email.is_empty() || request.password.is_empty() {
            return Err(AppError::validation("Email and password are required"));
        }

        let role = request.role.unwrap_or(UserRole::Owner);
        Self::reject_staff_role(role)?;

        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password = Password::new(&request.password)?;
        let account = self
            .accounts
            .create(NewAccount {
                email,
                password_hash: password.into_string(),
                full_name: request.full_name.filter(|n| !n.trim().is_empty()),
                role,
            })
            .await?;

        tracing::info!(admin = %actor.id, user_id = %account.id, role = %role, "Account created by admin");
        Ok(AccountResponse::from(account))
    }

    async fn update_user_role(
        &self,
        actor: &Account,
        user_id: Uuid,
        role: UserRole,
    ) -> AppResult<AccountResponse> {
        Self::require_admin(actor)?;
        Self::reject_staff_role(role)?;

        let target = self
            .accounts
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        // Promoting a linked staff account would leave a dangling link
        if self.delegations.find_by_user(target.id).await?.is_some() {
            return Err(AppError::validation(
                "Remove the staff link before changing this account's role",
            ));
        }

        let updated = self.accounts.update_role(target.id, role).await?;
        tracing::info!(admin = %actor.id, user_id = %updated.id, role = %role, "Role updated");
        Ok(AccountResponse::from(updated))
    }

    async fn delete_user(&self, actor: &Account, user_id: Uuid) -> AppResult<()> {
        Self::require_admin(actor)?;

        if actor.id == user_id {
            return Err(AppError::validation("You cannot delete your own account"));
        }

        let target = self
            .accounts
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if target.is_owner() && !self.delegations.list_by_owner(target.id).await?.is_empty() {
            return Err(AppError::validation(
                "Remove this owner's staff before deleting the account",
            ));
        }

        if let Some(link) = self.delegations.find_by_user(target.id).await? {
            self.delegations.delete(link.id).await?;
        }

        self.accounts.delete(target.id).await?;
        tracing::info!(admin = %actor.id, user_id = %target.id, "Account deleted by admin");
        Ok(())
    }

    async fn update_profile(
        &self,
        actor: &Account,
        full_name: Option<String>,
    ) -> AppResult<AccountResponse> {
        let full_name = full_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let updated = self.accounts.update_profile(actor.id, full_name).await?;
        Ok(AccountResponse::from(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockAccountRepository, MockDelegationRepository, Repositories};
    use domain::NewDelegationLink;

    fn account(role: UserRole) -> Account {
        Account::new(
            Uuid::new_v4(),
            format!("{}@example.com", role),
            "hash".to_string(),
            None,
            role,
        )
    }

    fn service() -> (AccountAdmin, Repositories) {
        let (repos, _store) = Repositories::in_memory();
        let admin = AccountAdmin::new(repos.accounts.clone(), repos.delegations.clone());
        (admin, repos)
    }

    fn request(email: &str, role: Option<UserRole>) -> CreateAccount {
        CreateAccount {
            email: email.to_string(),
            password: "secret123".to_string(),
            full_name: Some("Shop Owner".to_string()),
            role,
        }
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden_without_touching_store() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_list().times(0);
        let admin = AccountAdmin::new(Arc::new(accounts), Arc::new(MockDelegationRepository::new()));

        let result = admin.get_users(&account(UserRole::Owner)).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_create_user_defaults_to_owner() {
        let (admin, _) = service();
        let actor = account(UserRole::Admin);

        let created = admin
            .create_user(&actor, request("new@example.com", None))
            .await
            .unwrap();

        assert_eq!(created.role, UserRole::Owner);
        assert_eq!(created.full_name.as_deref(), Some("Shop Owner"));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email_conflicts() {
        let (admin, _) = service();
        let actor = account(UserRole::Admin);
        admin
            .create_user(&actor, request("dup@example.com", None))
            .await
            .unwrap();

        let result = admin
            .create_user(&actor, request("dup@example.com", Some(UserRole::Admin)))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_staff_role_cannot_be_assigned_directly() {
        let (admin, _) = service();
        let actor = account(UserRole::Admin);

        let result = admin
            .create_user(&actor, request("s@example.com", Some(UserRole::Staff)))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let owner = admin
            .create_user(&actor, request("o@example.com", None))
            .await
            .unwrap();
        let result = admin
            .update_user_role(&actor, owner.id, UserRole::Staff)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_linked_account_role_is_locked() {
        let (admin, repos) = service();
        let actor = account(UserRole::Admin);
        let owner = admin
            .create_user(&actor, request("owner@example.com", None))
            .await
            .unwrap();
        let staff = repos
            .accounts
            .create(NewAccount {
                email: "staff@example.com".to_string(),
                password_hash: "hash".to_string(),
                full_name: None,
                role: UserRole::Staff,
            })
            .await
            .unwrap();
        repos
            .delegations
            .create(NewDelegationLink {
                owner_id: owner.id,
                user_id: staff.id,
                staff_name: "Till".to_string(),
            })
            .await
            .unwrap();

        let result = admin.update_user_role(&actor, staff.id, UserRole::Owner).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = admin.delete_user(&actor, owner.id).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        admin.delete_user(&actor, staff.id).await.unwrap();
        assert!(repos.delegations.find_by_user(staff.id).await.unwrap().is_none());
        admin.delete_user(&actor, owner.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_admin_cannot_delete_self() {
        let (admin, _) = service();
        let actor = account(UserRole::Admin);

        let result = admin.delete_user(&actor, actor.id).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_unknown_user_is_not_found() {
        let (admin, _) = service();
        let result = admin
            .delete_user(&account(UserRole::Admin), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_profile_trims_and_clears_blank_name() {
        let (admin, repos) = service();
        let me = repos
            .accounts
            .create(NewAccount {
                email: "me@example.com".to_string(),
                password_hash: "hash".to_string(),
                full_name: Some("Old".to_string()),
                role: UserRole::Staff,
            })
            .await
            .unwrap();

        let updated = admin
            .update_profile(&me, Some("  New Name ".to_string()))
            .await
            .unwrap();
        assert_eq!(updated.full_name.as_deref(), Some("New Name"));

        let cleared = admin.update_profile(&me, Some("   ".to_string())).await.unwrap();
        assert_eq!(cleared.full_name, None);
    }
}
