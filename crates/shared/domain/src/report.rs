//! Profit and loss summary over a date range.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{DateRange, FixedExpense, Transaction, TransactionType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReportSummary {
    pub range: DateRange,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub sales_total: Decimal,
    /// Cost price of sales that recorded one
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub cost_total: Decimal,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub gross_profit: Decimal,
    /// Expense-type transactions
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub expense_total: Decimal,
    /// Fixed expenses prorated over the range
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub fixed_cost: Decimal,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub net_profit: Decimal,
    pub transaction_count: usize,
}

impl ReportSummary {
    /// Summarize the transactions inside `range`; others are ignored.
    pub fn compute(
        range: DateRange,
        transactions: &[Transaction],
        fixed_expenses: &[FixedExpense],
    ) -> Self {
        let mut sales_total = Decimal::ZERO;
        let mut cost_total = Decimal::ZERO;
        let mut expense_total = Decimal::ZERO;
        let mut transaction_count = 0;

        for tx in transactions.iter().filter(|t| range.contains(t.occurred_at)) {
            transaction_count += 1;
            match tx.kind {
                TransactionType::Sale => {
                    sales_total += tx.amount;
                    cost_total += tx.cost_price.unwrap_or(Decimal::ZERO);
                }
                TransactionType::Expense => expense_total += tx.amount,
            }
        }

        let days = Decimal::from(range.days());
        let fixed_cost = fixed_expenses
            .iter()
            .map(|e| e.daily_amount() * days)
            .sum::<Decimal>()
            .round_dp(2);

        let gross_profit = sales_total - cost_total;
        Self {
            range,
            sales_total,
            cost_total,
            gross_profit,
            expense_total,
            fixed_cost,
            net_profit: gross_profit - expense_total - fixed_cost,
            transaction_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ExpenseFrequency;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn tx(kind: TransactionType, amount: i64, cost: Option<i64>, day: i64) -> Transaction {
        let cost_price = cost.map(Decimal::from);
        Transaction {
            id: Uuid::new_v4(),
            owner_user_id: Uuid::nil(),
            name: "item".to_string(),
            amount: Decimal::from(amount),
            cost_price,
            profit_amount: cost_price.map(|c| Decimal::from(amount) - c),
            kind,
            occurred_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::days(day),
        }
    }

    fn may() -> DateRange {
        DateRange::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 31, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_summary_totals() {
        let transactions = vec![
            tx(TransactionType::Sale, 500, Some(300), 0),
            tx(TransactionType::Sale, 200, None, 1),
            tx(TransactionType::Expense, 50, None, 2),
            tx(TransactionType::Sale, 999, Some(1), 90),
        ];
        let rent = FixedExpense {
            id: Uuid::new_v4(),
            owner_user_id: Uuid::nil(),
            name: "Rent".to_string(),
            amount: Decimal::from(3000),
            frequency: ExpenseFrequency::Monthly,
            created_at: Utc::now(),
        };

        let report = ReportSummary::compute(may(), &transactions, &[rent]);

        assert_eq!(report.transaction_count, 3);
        assert_eq!(report.sales_total, Decimal::from(700));
        assert_eq!(report.cost_total, Decimal::from(300));
        assert_eq!(report.gross_profit, Decimal::from(400));
        assert_eq!(report.expense_total, Decimal::from(50));
        assert_eq!(report.fixed_cost, Decimal::from(3000));
        assert_eq!(report.net_profit, Decimal::from(-2650));
    }

    #[test]
    fn test_empty_range_is_zero() {
        let report = ReportSummary::compute(may(), &[], &[]);
        assert_eq!(report.net_profit, Decimal::ZERO);
        assert_eq!(report.transaction_count, 0);
    }
}
