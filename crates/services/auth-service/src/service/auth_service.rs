//! Authentication service - sign-up, sign-in and sign-out.
//!
//! There are no tokens: a successful call returns the account shape the
//! client keeps as its session, and every later request is re-verified
//! against the store by account id.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Account, AccountResponse, NewAccount, Password, UserRole};
use user_service_lib::repository::AccountRepository;

/// Self-service registration request
#[derive(Debug, Clone)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new owner account
    async fn sign_up(&self, request: SignUp) -> AppResult<AccountResponse>;

    /// Check credentials; both failure paths yield the same error value
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AccountResponse>;

    /// Nothing server-side to invalidate; recorded for the log only
    async fn sign_out(&self, account_id: Uuid) -> AppResult<()>;

    /// Reload an account for per-request re-verification
    async fn current_account(&self, id: Uuid) -> AppResult<Account>;
}

/// Concrete implementation of AuthService over the account store.
pub struct Authenticator {
    accounts: Arc<dyn AccountRepository>,
}

impl Authenticator {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }
}

fn required(email: &str, password: &str) -> AppResult<String> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }
    Ok(email.to_string())
}

#[async_trait]
impl AuthService for Authenticator {
    async fn sign_up(&self, request: SignUp) -> AppResult<AccountResponse> {
        let email = required(&request.email, &request.password)?;

        // Absence is the success path; lookup failures propagate
        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&request.password)?.into_string();

        // A concurrent sign-up that wins the race surfaces as a conflict
        // from the unique index
        let account = self
            .accounts
            .create(NewAccount {
                email,
                password_hash,
                full_name: request.full_name.filter(|n| !n.trim().is_empty()),
                role: UserRole::Owner,
            })
            .await?;

        tracing::info!(user_id = %account.id, "Account registered");
        Ok(AccountResponse::from(account))
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AccountResponse> {
        let email = required(email, password)?;
        let found = self.accounts.find_by_email(&email).await?;

        // Verify against a real hash even for unknown emails so both
        // failure paths cost the same
        let stored = match &found {
            Some(account) => Password::from_hash(account.password_hash.as_str()),
            None => Password::dummy(),
        };
        let password_valid = stored.verify(password);

        match found {
            Some(account) if password_valid => {
                tracing::info!(user_id = %account.id, role = %account.role, "Signed in");
                Ok(AccountResponse::from(account))
            }
            _ => {
                tracing::debug!("Sign-in rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    async fn sign_out(&self, account_id: Uuid) -> AppResult<()> {
        tracing::info!(user_id = %account_id, "Signed out");
        Ok(())
    }

    async fn current_account(&self, id: Uuid) -> AppResult<Account> {
        self.accounts
            .find_by_id(id)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}
