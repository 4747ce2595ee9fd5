//! Repository layer for data access.

mod account_repository;
mod delegation_repository;
pub mod entities;
mod expense_repository;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
mod subscription_repository;
mod transaction_repository;

use std::sync::Arc;

use sea_orm::{DatabaseConnection, DbErr, SqlErr};

use common::AppError;

pub use account_repository::{AccountRepository, AccountStore};
pub use delegation_repository::{DelegationRepository, DelegationStore};
pub use expense_repository::{FixedExpenseRepository, FixedExpenseStore};
pub use subscription_repository::{SubscriptionRepository, SubscriptionStore};
pub use transaction_repository::{TransactionRepository, TransactionStore};

#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use delegation_repository::MockDelegationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use expense_repository::MockFixedExpenseRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use subscription_repository::MockSubscriptionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use transaction_repository::MockTransactionRepository;

/// Every repository the services need, behind trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub accounts: Arc<dyn AccountRepository>,
    pub delegations: Arc<dyn DelegationRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub fixed_expenses: Arc<dyn FixedExpenseRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
}

impl Repositories {
    /// Postgres-backed repositories sharing one connection pool
    pub fn postgres(db: DatabaseConnection) -> Self {
        Self {
            accounts: Arc::new(AccountStore::new(db.clone())),
            delegations: Arc::new(DelegationStore::new(db.clone())),
            transactions: Arc::new(TransactionStore::new(db.clone())),
            fixed_expenses: Arc::new(FixedExpenseStore::new(db.clone())),
            subscriptions: Arc::new(SubscriptionStore::new(db)),
        }
    }

    /// Repositories over one shared in-memory store
    #[cfg(any(test, feature = "test-utils"))]
    pub fn in_memory() -> (Self, Arc<memory::InMemoryStore>) {
        let store = Arc::new(memory::InMemoryStore::default());
        let repos = Self {
            accounts: store.clone(),
            delegations: store.clone(),
            transactions: store.clone(),
            fixed_expenses: store.clone(),
            subscriptions: store.clone(),
        };
        (repos, store)
    }
}

/// Map an insert failure, turning unique violations into conflicts.
fn insert_error(err: DbErr, entity: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(entity),
        _ => AppError::from(err),
    }
}
