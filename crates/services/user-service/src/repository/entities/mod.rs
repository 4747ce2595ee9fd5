//! SeaORM entities, one module per table.

pub mod fixed_expense;
pub mod payment_log;
pub mod payment_order;
pub mod staff;
pub mod subscription;
pub mod subscription_plan;
pub mod transaction;
pub mod user;
