//! Sales, expenses, fixed costs and the profit report.

use axum::{
    extract::{Extension, State},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use common::{ActionResponse, AppResult};
use domain::{
    DateRange, ExpenseFrequency, FixedExpense, NewFixedExpense, NewTransaction, ReportSummary,
    Transaction, TransactionType,
};

use crate::extractors::{ActionJson, ActionRequest};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Report window when the request names none
const DEFAULT_REPORT_DAYS: i64 = 30;

/// Ledger function request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LedgerAction {
    CreateTransaction {
        name: String,
        #[schema(value_type = String, example = "120.00")]
        amount: Decimal,
        #[serde(default, alias = "costPrice")]
        #[schema(value_type = Option<String>)]
        cost_price: Option<Decimal>,
        #[serde(rename = "type")]
        kind: TransactionType,
        #[serde(default, alias = "occurredAt")]
        occurred_at: Option<DateTime<Utc>>,
    },
    ListTransactions {
        #[serde(default)]
        start: Option<DateTime<Utc>>,
        #[serde(default)]
        end: Option<DateTime<Utc>>,
    },
    DeleteTransaction {
        id: Uuid,
    },
    CreateFixedExpense {
        name: String,
        #[schema(value_type = String)]
        amount: Decimal,
        frequency: ExpenseFrequency,
    },
    ListFixedExpenses,
    UpdateFixedExpense {
        id: Uuid,
        name: String,
        #[schema(value_type = String)]
        amount: Decimal,
        frequency: ExpenseFrequency,
    },
    DeleteFixedExpense {
        id: Uuid,
    },
    Report {
        #[serde(default)]
        start: Option<DateTime<Utc>>,
        #[serde(default)]
        end: Option<DateTime<Utc>>,
    },
}

impl ActionRequest for LedgerAction {
    const ACTIONS: &'static [&'static str] = &[
        "create_transaction",
        "list_transactions",
        "delete_transaction",
        "create_fixed_expense",
        "list_fixed_expenses",
        "update_fixed_expense",
        "delete_fixed_expense",
        "report",
    ];
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionPayload {
    pub transaction: Transaction,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionsPayload {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExpensePayload {
    pub expense: FixedExpense,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExpensesPayload {
    pub expenses: Vec<FixedExpense>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportPayload {
    pub report: ReportSummary,
}

/// Listing window; unbounded on a side that is not given.
fn optional_range(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> AppResult<Option<DateRange>> {
    match (start, end) {
        (None, None) => Ok(None),
        (start, end) => {
            let end = end.unwrap_or_else(Utc::now);
            let start = start.unwrap_or(DateTime::<Utc>::MIN_UTC);
            Ok(Some(DateRange::new(start, end)?))
        }
    }
}

/// Report window: missing end is now, missing start is a month before the end.
fn report_range(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> AppResult<DateRange> {
    if start.is_none() && end.is_none() {
        return Ok(DateRange::last_days(DEFAULT_REPORT_DAYS));
    }
    let end = end.unwrap_or_else(Utc::now);
    let start = start.unwrap_or(end - Duration::days(DEFAULT_REPORT_DAYS));
    Ok(DateRange::new(start, end)?)
}

/// Ledger function. Staff writes are attributed to their owner.
#[utoipa::path(
    post,
    path = "/functions/ledger",
    tag = "Ledger",
    security(("user_id" = [])),
    request_body = LedgerAction,
    responses(
        (status = 200, description = "Action succeeded"),
        (status = 400, description = "Invalid action or record"),
        (status = 403, description = "Staff may not delete records"),
        (status = 404, description = "Record not found"),
        (status = 422, description = "Staff account has no owner")
    )
)]
pub async fn ledger_function(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    ActionJson(action): ActionJson<LedgerAction>,
) -> AppResult<Response> {
    let ledger = &state.services.ledger;

    let response = match action {
        LedgerAction::CreateTransaction {
            name,
            amount,
            cost_price,
            kind,
            occurred_at,
        } => {
            let transaction = ledger
                .record_transaction(
                    &actor,
                    NewTransaction {
                        name,
                        amount,
                        cost_price,
                        kind,
                        occurred_at,
                    },
                )
                .await?;
            ActionResponse::ok(TransactionPayload { transaction }).into_response()
        }
        LedgerAction::ListTransactions { start, end } => {
            let range = optional_range(start, end)?;
            let transactions = ledger.list_transactions(&actor, range).await?;
            ActionResponse::ok(TransactionsPayload { transactions }).into_response()
        }
        LedgerAction::DeleteTransaction { id } => {
            ledger.delete_transaction(&actor, id).await?;
            ActionResponse::done().into_response()
        }
        LedgerAction::CreateFixedExpense {
            name,
            amount,
            frequency,
        } => {
            let expense = ledger
                .create_fixed_expense(
                    &actor,
                    NewFixedExpense {
                        name,
                        amount,
                        frequency,
                    },
                )
                .await?;
            ActionResponse::ok(ExpensePayload { expense }).into_response()
        }
        LedgerAction::ListFixedExpenses => {
            let expenses = ledger.list_fixed_expenses(&actor).await?;
            ActionResponse::ok(ExpensesPayload { expenses }).into_response()
        }
        LedgerAction::UpdateFixedExpense {
            id,
            name,
            amount,
            frequency,
        } => {
            let expense = ledger
                .update_fixed_expense(
                    &actor,
                    id,
                    NewFixedExpense {
                        name,
                        amount,
                        frequency,
                    },
                )
                .await?;
            ActionResponse::ok(ExpensePayload { expense }).into_response()
        }
        LedgerAction::DeleteFixedExpense { id } => {
            ledger.delete_fixed_expense(&actor, id).await?;
            ActionResponse::done().into_response()
        }
        LedgerAction::Report { start, end } => {
            let range = report_range(start, end)?;
            let report = ledger.report(&actor, range).await?;
            ActionResponse::ok(ReportPayload { report }).into_response()
        }
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_bounds_means_all_time() {
        assert!(optional_range(None, None).unwrap().is_none());
    }

    #[test]
    fn test_open_end_closes_at_now() {
        let start = Utc::now() - Duration::days(2);
        let range = optional_range(Some(start), None).unwrap().unwrap();
        assert_eq!(range.start, start);
        assert!(range.end >= start);
    }

    #[test]
    fn test_report_defaults_to_last_month() {
        let range = report_range(None, None).unwrap();
        assert_eq!(range.days(), 30);

        let end = Utc::now() - Duration::days(10);
        let range = report_range(None, Some(end)).unwrap();
        assert_eq!(range.end, end);
        assert_eq!(range.start, end - Duration::days(30));
    }

    #[test]
    fn test_reversed_bounds_rejected() {
        let now = Utc::now();
        assert!(optional_range(Some(now), Some(now - Duration::days(1))).is_err());
    }
}
