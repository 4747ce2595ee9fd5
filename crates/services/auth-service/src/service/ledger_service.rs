//! Ledger service - transactions, fixed expenses and reports.
//!
//! Every record is stored under the id `DelegationResolver::attribute`
//! returns, so staff writes land in their owner's books.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{
    Account, DateRange, FixedExpense, NewFixedExpense, NewTransaction, ReportSummary, Transaction,
};
use user_service_lib::repository::{FixedExpenseRepository, TransactionRepository};

use super::DelegationResolver;

#[async_trait]
pub trait Ledger: Send + Sync {
    async fn record_transaction(
        &self,
        actor: &Account,
        input: NewTransaction,
    ) -> AppResult<Transaction>;

    /// Newest first; all time when `range` is `None`
    async fn list_transactions(
        &self,
        actor: &Account,
        range: Option<DateRange>,
    ) -> AppResult<Vec<Transaction>>;

    async fn delete_transaction(&self, actor: &Account, id: Uuid) -> AppResult<()>;

    async fn create_fixed_expense(
        &self,
        actor: &Account,
        input: NewFixedExpense,
    ) -> AppResult<FixedExpense>;

    async fn list_fixed_expenses(&self, actor: &Account) -> AppResult<Vec<FixedExpense>>;

    async fn update_fixed_expense(
        &self,
        actor: &Account,
        id: Uuid,
        input: NewFixedExpense,
    ) -> AppResult<FixedExpense>;

    async fn delete_fixed_expense(&self, actor: &Account, id: Uuid) -> AppResult<()>;

    async fn report(&self, actor: &Account, range: DateRange) -> AppResult<ReportSummary>;
}

pub struct LedgerService {
    resolver: Arc<dyn DelegationResolver>,
    transactions: Arc<dyn TransactionRepository>,
    fixed_expenses: Arc<dyn FixedExpenseRepository>,
}

impl LedgerService {
    pub fn new(
        resolver: Arc<dyn DelegationResolver>,
        transactions: Arc<dyn TransactionRepository>,
        fixed_expenses: Arc<dyn FixedExpenseRepository>,
    ) -> Self {
        Self {
            resolver,
            transactions,
            fixed_expenses,
        }
    }

    /// Staff may add records but not remove them
    fn forbid_staff(actor: &Account) -> AppResult<()> {
        if actor.is_staff() {
            return Err(AppError::Forbidden);
        }
        Ok(())
    }
}

#[async_trait]
impl Ledger for LedgerService {
    async fn record_transaction(
        &self,
        actor: &Account,
        input: NewTransaction,
    ) -> AppResult<Transaction> {
        input.validate()?;
        let owner_user_id = self.resolver.attribute(actor).await?;

        let transaction = Transaction {
            id: Uuid::new_v4(),
            owner_user_id,
            name: input.name.trim().to_string(),
            amount: input.amount,
            cost_price: input.stored_cost_price(),
            profit_amount: input.profit(),
            kind: input.kind,
            occurred_at: input.occurred_at.unwrap_or_else(Utc::now),
        };

        let saved = self.transactions.insert(transaction).await?;
        tracing::info!(
            actor = %actor.id,
            owner_id = %saved.owner_user_id,
            kind = saved.kind.as_str(),
            "Transaction recorded"
        );
        Ok(saved)
    }

    async fn list_transactions(
        &self,
        actor: &Account,
        range: Option<DateRange>,
    ) -> AppResult<Vec<Transaction>> {
        let owner_id = self.resolver.attribute(actor).await?;
        self.transactions.list_by_owner(owner_id, range).await
    }

    async fn delete_transaction(&self, actor: &Account, id: Uuid) -> AppResult<()> {
        Self::forbid_staff(actor)?;
        self.transactions.delete(actor.id, id).await
    }

    async fn create_fixed_expense(
        &self,
        actor: &Account,
        input: NewFixedExpense,
    ) -> AppResult<FixedExpense> {
        input.validate()?;
        let owner_user_id = self.resolver.attribute(actor).await?;

        let expense = FixedExpense {
            id: Uuid::new_v4(),
            owner_user_id,
            name: input.name.trim().to_string(),
            amount: input.amount,
            frequency: input.frequency,
            created_at: Utc::now(),
        };
        self.fixed_expenses.insert(expense).await
    }

    async fn list_fixed_expenses(&self, actor: &Account) -> AppResult<Vec<FixedExpense>> {
        let owner_id = self.resolver.attribute(actor).await?;
        self.fixed_expenses.list_by_owner(owner_id).await
    }

    async fn update_fixed_expense(
        &self,
        actor: &Account,
        id: Uuid,
        input: NewFixedExpense,
    ) -> AppResult<FixedExpense> {
        input.validate()?;
        let owner_id = self.resolver.attribute(actor).await?;

        let changes = NewFixedExpense {
            name: input.name.trim().to_string(),
            ..input
        };
        self.fixed_expenses.update(owner_id, id, changes).await
    }

    async fn delete_fixed_expense(&self, actor: &Account, id: Uuid) -> AppResult<()> {
        Self::forbid_staff(actor)?;
        self.fixed_expenses.delete(actor.id, id).await
    }

    async fn report(&self, actor: &Account, range: DateRange) -> AppResult<ReportSummary> {
        let owner_id = self.resolver.attribute(actor).await?;

        let transactions = self.transactions.list_by_owner(owner_id, Some(range)).await?;
        let fixed = self.fixed_expenses.list_by_owner(owner_id).await?;

        Ok(ReportSummary::compute(range, &transactions, &fixed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{LocalOwnerIndex, OwnerResolver};
    use domain::{ExpenseFrequency, NewAccount, NewDelegationLink, TransactionType, UserRole};
    use rust_decimal::Decimal;
    use user_service_lib::repository::Repositories;

    struct Fixture {
        ledger: LedgerService,
        repos: Repositories,
        owner: Account,
        staff: Account,
    }

    async fn account(repos: &Repositories, email: &str, role: UserRole) -> Account {
        repos
            .accounts
            .create(NewAccount {
                email: email.to_string(),
                password_hash: "hash".to_string(),
                full_name: None,
                role,
            })
            .await
            .unwrap()
    }

    async fn fixture() -> Fixture {
        let (repos, _) = Repositories::in_memory();
        let owner = account(&repos, "alice@x.com", UserRole::Owner).await;
        let staff = account(&repos, "bob@x.com", UserRole::Staff).await;
        repos
            .delegations
            .create(NewDelegationLink {
                owner_id: owner.id,
                user_id: staff.id,
                staff_name: "Bob".to_string(),
            })
            .await
            .unwrap();

        let resolver = Arc::new(OwnerResolver::new(
            Arc::new(LocalOwnerIndex::new(300)),
            repos.delegations.clone(),
        ));
        let ledger = LedgerService::new(
            resolver,
            repos.transactions.clone(),
            repos.fixed_expenses.clone(),
        );
        Fixture {
            ledger,
            repos,
            owner,
            staff,
        }
    }

    fn sale(name: &str, amount: i64, cost: Option<i64>) -> NewTransaction {
        NewTransaction {
            name: name.to_string(),
            amount: Decimal::from(amount),
            cost_price: cost.map(Decimal::from),
            kind: TransactionType::Sale,
            occurred_at: None,
        }
    }

    fn rent() -> NewFixedExpense {
        NewFixedExpense {
            name: " Rent ".to_string(),
            amount: Decimal::from(700),
            frequency: ExpenseFrequency::Weekly,
        }
    }

    #[tokio::test]
    async fn test_staff_sale_is_stored_under_owner() {
        let f = fixture().await;

        let tx = f
            .ledger
            .record_transaction(&f.staff, sale("Case", 500, Some(350)))
            .await
            .unwrap();

        assert_eq!(tx.owner_user_id, f.owner.id);
        assert_eq!(tx.profit_amount, Some(Decimal::from(150)));

        let owner_view = f.ledger.list_transactions(&f.owner, None).await.unwrap();
        assert_eq!(owner_view.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_transaction_rejected_before_store() {
        let f = fixture().await;

        let result = f.ledger.record_transaction(&f.owner, sale("  ", 500, None)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(f
            .repos
            .transactions
            .list_by_owner(f.owner.id, None)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_staff_cannot_delete_records() {
        let f = fixture().await;
        let tx = f
            .ledger
            .record_transaction(&f.staff, sale("Case", 500, None))
            .await
            .unwrap();
        let expense = f.ledger.create_fixed_expense(&f.staff, rent()).await.unwrap();

        assert!(matches!(
            f.ledger.delete_transaction(&f.staff, tx.id).await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            f.ledger.delete_fixed_expense(&f.staff, expense.id).await,
            Err(AppError::Forbidden)
        ));

        f.ledger.delete_transaction(&f.owner, tx.id).await.unwrap();
        f.ledger.delete_fixed_expense(&f.owner, expense.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_owner_cannot_delete_another_owners_transaction() {
        let f = fixture().await;
        let other = account(&f.repos, "carol@x.com", UserRole::Owner).await;
        let tx = f
            .ledger
            .record_transaction(&f.owner, sale("Case", 500, None))
            .await
            .unwrap();

        let result = f.ledger.delete_transaction(&other, tx.id).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_fixed_expense_update_trims_name() {
        let f = fixture().await;
        let expense = f.ledger.create_fixed_expense(&f.owner, rent()).await.unwrap();
        assert_eq!(expense.name, "Rent");

        let mut changes = rent();
        changes.amount = Decimal::from(1400);
        let updated = f
            .ledger
            .update_fixed_expense(&f.staff, expense.id, changes)
            .await
            .unwrap();

        assert_eq!(updated.amount, Decimal::from(1400));
        assert_eq!(f.ledger.list_fixed_expenses(&f.owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_report_combines_transactions_and_fixed_costs() {
        let f = fixture().await;
        f.ledger
            .record_transaction(&f.staff, sale("Case", 500, Some(300)))
            .await
            .unwrap();
        f.ledger.create_fixed_expense(&f.owner, rent()).await.unwrap();

        let report = f
            .ledger
            .report(&f.owner, DateRange::last_days(7))
            .await
            .unwrap();

        assert_eq!(report.transaction_count, 1);
        assert_eq!(report.gross_profit, Decimal::from(200));
        assert_eq!(report.fixed_cost, Decimal::from(700));
        assert_eq!(report.net_profit, Decimal::from(-500));
    }
}
