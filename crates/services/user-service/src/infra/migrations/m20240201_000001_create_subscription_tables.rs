//! Migration: Create subscription plans, user subscriptions and payment logs.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SubscriptionPlans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubscriptionPlans::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlans::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlans::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlans::Price)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlans::Features)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlans::DurationDays)
                            .integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserSubscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserSubscriptions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserSubscriptions::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserSubscriptions::PlanId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserSubscriptions::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserSubscriptions::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserSubscriptions::PaymentId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserSubscriptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_subscriptions_user")
                            .from(UserSubscriptions::Table, UserSubscriptions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_subscriptions_plan")
                            .from(UserSubscriptions::Table, UserSubscriptions::PlanId)
                            .to(SubscriptionPlans::Table, SubscriptionPlans::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PaymentLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PaymentLogs::UserId).uuid().not_null())
                    .col(ColumnDef::new(PaymentLogs::PaymentId).string_len(255).not_null())
                    .col(ColumnDef::new(PaymentLogs::Amount).decimal_len(12, 2).not_null())
                    .col(ColumnDef::new(PaymentLogs::Status).string_len(16).not_null())
                    .col(ColumnDef::new(PaymentLogs::Metadata).json_binary().not_null())
                    .col(
                        ColumnDef::new(PaymentLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserSubscriptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubscriptionPlans::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SubscriptionPlans {
    Table,
    Id,
    Name,
    Description,
    Price,
    Features,
    DurationDays,
}

#[derive(Iden)]
enum UserSubscriptions {
    Table,
    Id,
    UserId,
    PlanId,
    Status,
    EndDate,
    PaymentId,
    CreatedAt,
}

#[derive(Iden)]
enum PaymentLogs {
    Table,
    Id,
    UserId,
    PaymentId,
    Amount,
    Status,
    Metadata,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
