//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Types here are shared by the store, the services, the gateway and the client.

pub mod account;
pub mod constants;
pub mod error;
pub mod ledger;
pub mod password;
pub mod report;
pub mod staff;
pub mod subscription;

pub use account::{Account, AccountResponse, NewAccount, UserRole};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use ledger::{
    DateRange, ExpenseFrequency, FixedExpense, NewFixedExpense, NewTransaction, Transaction,
    TransactionType,
};
pub use password::Password;
pub use report::ReportSummary;
pub use staff::{DelegationLink, NewDelegationLink, StaffMember};
pub use subscription::{
    NewPaymentLog, OrderStatus, PaymentLog, PaymentOrder, PaymentStatus, Subscription,
    SubscriptionPlan, SubscriptionStatus,
};
