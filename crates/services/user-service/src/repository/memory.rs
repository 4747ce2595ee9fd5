//! In-memory store implementing every repository trait.
//!
//! Backs service and gateway tests without a database. Unique email and
//! unique staff `user_id` are enforced the same way the schema enforces them,
//! and individual operations can be told to fail to exercise recovery paths.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{
    AccountRepository, DelegationRepository, FixedExpenseRepository, SubscriptionRepository,
    TransactionRepository,
};
use common::{AppError, AppResult};
use domain::{
    Account, DateRange, DelegationLink, FixedExpense, NewAccount, NewDelegationLink,
    NewFixedExpense, NewPaymentLog, OrderStatus, PaymentLog, PaymentOrder, Subscription,
    SubscriptionPlan, Transaction, UserRole,
};

/// Store operations that can be made to fail on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    FindAccountByEmail,
    CreateAccount,
    DeleteAccount,
    FindLinkByUser,
    CreateLink,
    DeleteLink,
}

#[derive(Default)]
struct Tables {
    accounts: Vec<Account>,
    links: Vec<DelegationLink>,
    transactions: Vec<Transaction>,
    fixed_expenses: Vec<FixedExpense>,
    plans: Vec<SubscriptionPlan>,
    orders: Vec<PaymentOrder>,
    subscriptions: Vec<Subscription>,
    payments: Vec<PaymentLog>,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    failing: Mutex<HashSet<FailPoint>>,
}

impl InMemoryStore {
    /// Make every call through `point` fail until [`InMemoryStore::heal`].
    pub fn fail(&self, point: FailPoint) {
        lock(&self.failing).insert(point);
    }

    pub fn heal(&self, point: FailPoint) {
        lock(&self.failing).remove(&point);
    }

    pub fn add_plan(&self, plan: SubscriptionPlan) {
        lock(&self.tables).plans.push(plan);
    }

    pub fn accounts(&self) -> Vec<Account> {
        lock(&self.tables).accounts.clone()
    }

    pub fn links(&self) -> Vec<DelegationLink> {
        lock(&self.tables).links.clone()
    }

    pub fn payments(&self) -> Vec<PaymentLog> {
        lock(&self.tables).payments.clone()
    }

    pub fn subscriptions(&self) -> Vec<Subscription> {
        lock(&self.tables).subscriptions.clone()
    }

    fn check(&self, point: FailPoint) -> AppResult<()> {
        if lock(&self.failing).contains(&point) {
            return Err(AppError::internal(format!("injected failure at {:?}", point)));
        }
        Ok(())
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        lock(&self.tables)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.tables().accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        self.check(FailPoint::FindAccountByEmail)?;
        Ok(self
            .tables()
            .accounts
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Account>> {
        Ok(self
            .tables()
            .accounts
            .iter()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn list(&self) -> AppResult<Vec<Account>> {
        Ok(self.tables().accounts.iter().rev().cloned().collect())
    }

    async fn list_by_role(&self, role: UserRole) -> AppResult<Vec<Account>> {
        Ok(self
            .tables()
            .accounts
            .iter()
            .filter(|a| a.role == role)
            .cloned()
            .collect())
    }

    async fn create(&self, account: NewAccount) -> AppResult<Account> {
        self.check(FailPoint::CreateAccount)?;
        let mut tables = self.tables();
        if tables.accounts.iter().any(|a| a.email == account.email) {
            return Err(AppError::conflict("User"));
        }
        let created = Account::new(
            Uuid::new_v4(),
            account.email,
            account.password_hash,
            account.full_name,
            account.role,
        );
        tables.accounts.push(created.clone());
        Ok(created)
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<Account> {
        let mut tables = self.tables();
        let account = tables
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AppError::NotFound)?;
        account.update_role(role);
        Ok(account.clone())
    }

    async fn update_profile(&self, id: Uuid, full_name: Option<String>) -> AppResult<Account> {
        let mut tables = self.tables();
        let account = tables
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AppError::NotFound)?;
        account.update_full_name(full_name);
        Ok(account.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.check(FailPoint::DeleteAccount)?;
        let mut tables = self.tables();
        let before = tables.accounts.len();
        tables.accounts.retain(|a| a.id != id);
        if tables.accounts.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl DelegationRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DelegationLink>> {
        Ok(self.tables().links.iter().find(|l| l.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<DelegationLink>> {
        self.check(FailPoint::FindLinkByUser)?;
        Ok(self
            .tables()
            .links
            .iter()
            .find(|l| l.user_id == user_id)
            .cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<DelegationLink>> {
        Ok(self.tables().links.clone())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<DelegationLink>> {
        Ok(self
            .tables()
            .links
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn create(&self, link: NewDelegationLink) -> AppResult<DelegationLink> {
        self.check(FailPoint::CreateLink)?;
        let mut tables = self.tables();
        if tables.links.iter().any(|l| l.user_id == link.user_id) {
            return Err(AppError::conflict("Staff link"));
        }
        let created = DelegationLink {
            id: Uuid::new_v4(),
            owner_id: link.owner_id,
            user_id: link.user_id,
            staff_name: link.staff_name,
            created_at: Utc::now(),
        };
        tables.links.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.check(FailPoint::DeleteLink)?;
        let mut tables = self.tables();
        let before = tables.links.len();
        tables.links.retain(|l| l.id != id);
        if tables.links.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionRepository for InMemoryStore {
    async fn insert(&self, transaction: Transaction) -> AppResult<Transaction> {
        self.tables().transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        range: Option<DateRange>,
    ) -> AppResult<Vec<Transaction>> {
        let mut found: Vec<Transaction> = self
            .tables()
            .transactions
            .iter()
            .filter(|t| t.owner_user_id == owner_id)
            .filter(|t| range.map_or(true, |r| r.contains(t.occurred_at)))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(found)
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> AppResult<()> {
        let mut tables = self.tables();
        let before = tables.transactions.len();
        tables
            .transactions
            .retain(|t| !(t.id == id && t.owner_user_id == owner_id));
        if tables.transactions.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl FixedExpenseRepository for InMemoryStore {
    async fn insert(&self, expense: FixedExpense) -> AppResult<FixedExpense> {
        self.tables().fixed_expenses.push(expense.clone());
        Ok(expense)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<FixedExpense>> {
        Ok(self
            .tables()
            .fixed_expenses
            .iter()
            .filter(|e| e.owner_user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        changes: NewFixedExpense,
    ) -> AppResult<FixedExpense> {
        let mut tables = self.tables();
        let expense = tables
            .fixed_expenses
            .iter_mut()
            .find(|e| e.id == id && e.owner_user_id == owner_id)
            .ok_or(AppError::NotFound)?;
        expense.name = changes.name;
        expense.amount = changes.amount;
        expense.frequency = changes.frequency;
        Ok(expense.clone())
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> AppResult<()> {
        let mut tables = self.tables();
        let before = tables.fixed_expenses.len();
        tables
            .fixed_expenses
            .retain(|e| !(e.id == id && e.owner_user_id == owner_id));
        if tables.fixed_expenses.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn list_plans(&self) -> AppResult<Vec<SubscriptionPlan>> {
        let mut plans = self.tables().plans.clone();
        plans.sort_by(|a, b| a.price.cmp(&b.price));
        Ok(plans)
    }

    async fn find_plan(&self, id: Uuid) -> AppResult<Option<SubscriptionPlan>> {
        Ok(self.tables().plans.iter().find(|p| p.id == id).cloned())
    }

    async fn create_order(&self, order: PaymentOrder) -> AppResult<PaymentOrder> {
        let mut tables = self.tables();
        if tables.orders.iter().any(|o| o.id == order.id) {
            return Err(AppError::conflict("Order"));
        }
        tables.orders.push(order.clone());
        Ok(order)
    }

    async fn find_order(&self, order_id: &str) -> AppResult<Option<PaymentOrder>> {
        Ok(self.tables().orders.iter().find(|o| o.id == order_id).cloned())
    }

    async fn settle_order(&self, order_id: &str, payment_id: &str) -> AppResult<bool> {
        let mut tables = self.tables();
        if tables
            .orders
            .iter()
            .any(|o| o.payment_id.as_deref() == Some(payment_id))
        {
            return Err(AppError::conflict("Payment"));
        }
        match tables
            .orders
            .iter_mut()
            .find(|o| o.id == order_id && o.is_open())
        {
            Some(order) => {
                order.status = OrderStatus::Paid;
                order.payment_id = Some(payment_id.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn log_payment(&self, log: NewPaymentLog) -> AppResult<PaymentLog> {
        let entry = PaymentLog {
            id: Uuid::new_v4(),
            user_id: log.user_id,
            payment_id: log.payment_id,
            amount: log.amount,
            status: log.status,
            metadata: log.metadata,
            created_at: Utc::now(),
        };
        self.tables().payments.push(entry.clone());
        Ok(entry)
    }

    async fn create_subscription(&self, subscription: Subscription) -> AppResult<Subscription> {
        let mut tables = self.tables();
        if tables
            .subscriptions
            .iter()
            .any(|s| s.payment_id == subscription.payment_id)
        {
            return Err(AppError::conflict("Payment"));
        }
        tables.subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    async fn latest_for(&self, user_id: Uuid) -> AppResult<Option<Subscription>> {
        Ok(self
            .tables()
            .subscriptions
            .iter()
            .filter(|s| s.user_id == user_id)
            .max_by_key(|s| s.end_date)
            .cloned())
    }
}
