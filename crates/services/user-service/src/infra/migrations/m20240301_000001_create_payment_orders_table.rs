//! Migration: Create payment orders and make payment ids single-use.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PaymentOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentOrders::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentOrders::UserId).uuid().not_null())
                    .col(ColumnDef::new(PaymentOrders::PlanId).uuid().not_null())
                    .col(
                        ColumnDef::new(PaymentOrders::Amount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentOrders::Status)
                            .string_len(16)
                            .not_null()
                            .default("created"),
                    )
                    .col(ColumnDef::new(PaymentOrders::PaymentId).string_len(255).null())
                    .col(
                        ColumnDef::new(PaymentOrders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_orders_user")
                            .from(PaymentOrders::Table, PaymentOrders::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_orders_plan")
                            .from(PaymentOrders::Table, PaymentOrders::PlanId)
                            .to(SubscriptionPlans::Table, SubscriptionPlans::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // A payment settles one order
        manager
            .create_index(
                Index::create()
                    .name("idx_payment_orders_payment_id")
                    .table(PaymentOrders::Table)
                    .col(PaymentOrders::PaymentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // and activates one subscription
        manager
            .create_index(
                Index::create()
                    .name("idx_user_subscriptions_payment_id")
                    .table(UserSubscriptions::Table)
                    .col(UserSubscriptions::PaymentId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_user_subscriptions_payment_id")
                    .table(UserSubscriptions::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentOrders::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PaymentOrders {
    Table,
    Id,
    UserId,
    PlanId,
    Amount,
    Status,
    PaymentId,
    CreatedAt,
}

#[derive(Iden)]
enum UserSubscriptions {
    Table,
    PaymentId,
}

#[derive(Iden)]
enum SubscriptionPlans {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
