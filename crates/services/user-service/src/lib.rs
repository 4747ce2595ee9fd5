//! User Service Library
//!
//! The account and ledger store: SeaORM entities, migrations, repositories,
//! and the admin account service. Embedded in the combined binary.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use tracing::info;

use crate::config::UserServiceConfig;
use crate::infra::Database;
use crate::repository::Repositories;

/// Connect to the store, apply migrations and build the repositories.
pub async fn connect(config: &UserServiceConfig) -> Result<(Database, Repositories), sea_orm::DbErr> {
    let db = Database::connect(&config.database).await?;
    let repos = Repositories::postgres(db.get_connection());
    Ok((db, repos))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = UserServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
