//! Shared fixtures: the full service stack over the in-memory store.

#![allow(dead_code)]

use std::sync::Arc;

use auth_service_lib::config::{AuthServiceConfig, OwnerIndexBackend};
use auth_service_lib::service::{LocalOwnerIndex, NewStaff, SignUp};
use auth_service_lib::Services;
use domain::{Account, DelegationLink, NewTransaction, TransactionType};
use rust_decimal::Decimal;
use user_service_lib::repository::memory::InMemoryStore;
use user_service_lib::repository::Repositories;

pub struct TestApp {
    pub services: Services,
    pub repos: Repositories,
    pub store: Arc<InMemoryStore>,
}

pub fn test_config() -> AuthServiceConfig {
    AuthServiceConfig {
        owner_index: OwnerIndexBackend::Memory,
        payment_secret: Some("test-payment-secret".to_string()),
        orphan_grace_seconds: 0,
        ..AuthServiceConfig::default()
    }
}

pub fn app() -> TestApp {
    let (repos, store) = Repositories::in_memory();
    let services = Services::new(
        repos.clone(),
        Arc::new(LocalOwnerIndex::new(300)),
        &test_config(),
    );
    TestApp {
        services,
        repos,
        store,
    }
}

impl TestApp {
    /// Sign up and return the server-side account
    pub async fn owner(&self, email: &str, password: &str, name: &str) -> Account {
        let response = self
            .services
            .auth
            .sign_up(SignUp {
                email: email.to_string(),
                password: password.to_string(),
                full_name: Some(name.to_string()),
            })
            .await
            .expect("sign up");
        self.account(response.id).await
    }

    pub async fn staff(&self, owner: &Account, email: &str, password: &str, name: &str) -> DelegationLink {
        self.services
            .staff
            .create(
                owner,
                NewStaff {
                    owner_id: owner.id,
                    email: email.to_string(),
                    password: password.to_string(),
                    staff_name: name.to_string(),
                },
            )
            .await
            .expect("create staff")
    }

    pub async fn account(&self, id: uuid::Uuid) -> Account {
        self.services
            .auth
            .current_account(id)
            .await
            .expect("account exists")
    }
}

pub fn sale(name: &str, amount: i64) -> NewTransaction {
    NewTransaction {
        name: name.to_string(),
        amount: Decimal::from(amount),
        cost_price: None,
        kind: TransactionType::Sale,
        occurred_at: None,
    }
}
