//! Migration: Create transactions and fixed_expenses tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::OwnerUserId).uuid().not_null())
                    .col(ColumnDef::new(Transactions::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Transactions::Amount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::CostPrice).decimal_len(12, 2).null())
                    .col(
                        ColumnDef::new(Transactions::ProfitAmount)
                            .decimal_len(12, 2)
                            .null(),
                    )
                    .col(ColumnDef::new(Transactions::Kind).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Transactions::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_owner")
                            .from(Transactions::Table, Transactions::OwnerUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_owner_occurred")
                    .table(Transactions::Table)
                    .col(Transactions::OwnerUserId)
                    .col(Transactions::OccurredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FixedExpenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FixedExpenses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FixedExpenses::OwnerUserId).uuid().not_null())
                    .col(ColumnDef::new(FixedExpenses::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(FixedExpenses::Amount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FixedExpenses::Frequency)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FixedExpenses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fixed_expenses_owner")
                            .from(FixedExpenses::Table, FixedExpenses::OwnerUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FixedExpenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    OwnerUserId,
    Name,
    Amount,
    CostPrice,
    ProfitAmount,
    Kind,
    OccurredAt,
}

#[derive(Iden)]
enum FixedExpenses {
    Table,
    Id,
    OwnerUserId,
    Name,
    Amount,
    Frequency,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
