//! Auth Service Library
//!
//! Authentication, staff delegation, the staff directory, the ledger and
//! subscriptions, all running in-process over the user-service store.

pub mod config;
pub mod service;

use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use common::AppResult;
use user_service_lib::repository::Repositories;
use user_service_lib::service::{AccountAdmin, AdminService};

use crate::config::{AuthServiceConfig, OwnerIndexBackend};
use crate::service::{
    AuthService, Authenticator, DelegationResolver, Ledger, LedgerService,
    LocalOwnerIndex, OwnerIndex, OwnerResolver, RedisOwnerIndex, StaffDirectory, StaffManager,
    SubscriptionService, Subscriptions,
};

/// Every service the gateway calls, wired over one set of repositories.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub admin: Arc<dyn AdminService>,
    pub resolver: Arc<dyn DelegationResolver>,
    pub staff: Arc<dyn StaffDirectory>,
    pub ledger: Arc<dyn Ledger>,
    pub subscriptions: Arc<dyn SubscriptionService>,
    pub owner_index: Arc<dyn OwnerIndex>,
}

impl Services {
    /// Wire services over `repos` with an already-built owner index.
    pub fn new(
        repos: Repositories,
        owner_index: Arc<dyn OwnerIndex>,
        config: &AuthServiceConfig,
    ) -> Self {
        let resolver: Arc<dyn DelegationResolver> = Arc::new(OwnerResolver::new(
            owner_index.clone(),
            repos.delegations.clone(),
        ));

        Self {
            auth: Arc::new(Authenticator::new(repos.accounts.clone())),
            admin: Arc::new(AccountAdmin::new(
                repos.accounts.clone(),
                repos.delegations.clone(),
            )),
            staff: Arc::new(
                StaffManager::new(
                    repos.accounts.clone(),
                    repos.delegations.clone(),
                    owner_index.clone(),
                )
                .with_orphan_grace(Duration::seconds(config.orphan_grace_seconds)),
            ),
            ledger: Arc::new(LedgerService::new(
                resolver.clone(),
                repos.transactions.clone(),
                repos.fixed_expenses.clone(),
            )),
            subscriptions: Arc::new(Subscriptions::new(
                repos.subscriptions.clone(),
                config.payment_secret.clone(),
            )),
            resolver,
            owner_index,
        }
    }

    /// Build the configured owner index, then wire the services.
    pub async fn connect(repos: Repositories, config: &AuthServiceConfig) -> AppResult<Self> {
        let owner_index: Arc<dyn OwnerIndex> = match config.owner_index {
            OwnerIndexBackend::Redis => {
                let index =
                    RedisOwnerIndex::connect(&config.cache.url, config.owner_index_ttl_seconds())
                        .await?;
                info!("Owner index backed by Redis");
                Arc::new(index)
            }
            OwnerIndexBackend::Memory => {
                info!("Owner index held in process memory");
                Arc::new(LocalOwnerIndex::new(config.owner_index_ttl_seconds()))
            }
        };

        Ok(Self::new(repos, owner_index, config))
    }
}
