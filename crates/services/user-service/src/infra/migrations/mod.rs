//! Database migrations.
//!
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_staff_table;
mod m20240115_000001_create_ledger_tables;
mod m20240201_000001_create_subscription_tables;
mod m20240301_000001_create_payment_orders_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_staff_table::Migration),
            Box::new(m20240115_000001_create_ledger_tables::Migration),
            Box::new(m20240201_000001_create_subscription_tables::Migration),
            Box::new(m20240301_000001_create_payment_orders_table::Migration),
        ]
    }
}
