//! Sales, expenses and fixed recurring costs recorded against an owner.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DAYS_PER_MONTH, DAYS_PER_WEEK};
use crate::error::{DomainError, DomainResult};

/// Kind of ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Sale,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Sale => "sale",
            TransactionType::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sale" => Ok(TransactionType::Sale),
            "expense" => Ok(TransactionType::Expense),
            other => Err(DomainError::validation(format!(
                "Invalid transaction type '{}'",
                other
            ))),
        }
    }
}

/// A recorded sale or expense.
///
/// `owner_user_id` always names the owning account, even when a staff
/// member recorded the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Transaction {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub amount: Decimal,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub cost_price: Option<Decimal>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub profit_amount: Option<Decimal>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub occurred_at: DateTime<Utc>,
}

/// Ledger entry submitted by a caller, before attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewTransaction {
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub amount: Decimal,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub cost_price: Option<Decimal>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,
}

impl NewTransaction {
    /// Check field-level rules before any store call.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Please enter an item name"));
        }
        if self.amount <= Decimal::ZERO {
            return Err(DomainError::validation("Amount must be greater than zero"));
        }
        if matches!(self.cost_price, Some(cost) if cost < Decimal::ZERO) {
            return Err(DomainError::validation("Cost price cannot be negative"));
        }
        Ok(())
    }

    /// Profit on a sale with a known cost; expenses never carry profit.
    pub fn profit(&self) -> Option<Decimal> {
        match (self.kind, self.cost_price) {
            (TransactionType::Sale, Some(cost)) => Some(self.amount - cost),
            _ => None,
        }
    }

    /// Cost price as stored: expenses drop it.
    pub fn stored_cost_price(&self) -> Option<Decimal> {
        match self.kind {
            TransactionType::Sale => self.cost_price,
            TransactionType::Expense => None,
        }
    }
}

/// How often a fixed expense recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ExpenseFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl ExpenseFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseFrequency::Daily => "daily",
            ExpenseFrequency::Weekly => "weekly",
            ExpenseFrequency::Monthly => "monthly",
        }
    }

    fn days(&self) -> u32 {
        match self {
            ExpenseFrequency::Daily => 1,
            ExpenseFrequency::Weekly => DAYS_PER_WEEK,
            ExpenseFrequency::Monthly => DAYS_PER_MONTH,
        }
    }
}

impl FromStr for ExpenseFrequency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(ExpenseFrequency::Daily),
            "weekly" => Ok(ExpenseFrequency::Weekly),
            "monthly" => Ok(ExpenseFrequency::Monthly),
            other => Err(DomainError::validation(format!(
                "Invalid frequency '{}'",
                other
            ))),
        }
    }
}

/// Recurring cost such as rent or salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FixedExpense {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub amount: Decimal,
    pub frequency: ExpenseFrequency,
    pub created_at: DateTime<Utc>,
}

impl FixedExpense {
    /// Cost of this expense spread over a single day
    pub fn daily_amount(&self) -> Decimal {
        self.amount / Decimal::from(self.frequency.days())
    }
}

/// Fixed expense submitted by a caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewFixedExpense {
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub amount: Decimal,
    pub frequency: ExpenseFrequency,
}

impl NewFixedExpense {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Please enter an expense name"));
        }
        if self.amount <= Decimal::ZERO {
            return Err(DomainError::validation("Amount must be greater than zero"));
        }
        Ok(())
    }
}

/// Half-open time window `[start, end)` for listings and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<Self> {
        if end < start {
            return Err(DomainError::validation("Range end must not precede its start"));
        }
        Ok(Self { start, end })
    }

    /// The `days` days ending now
    pub fn last_days(days: i64) -> Self {
        let end = Utc::now();
        Self {
            start: end - Duration::days(days),
            end,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }

    /// Whole days covered, counting a partial day as one.
    pub fn days(&self) -> u32 {
        let seconds = (self.end - self.start).num_seconds().max(0);
        let days = (seconds + 86_399) / 86_400;
        u32::try_from(days).unwrap_or(u32::MAX)
    }
}
