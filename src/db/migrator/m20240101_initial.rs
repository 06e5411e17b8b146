use crate::entities::prelude::*;
use crate::entities::{coin_transactions, purchases};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Items)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Purchases)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(CoinTransactions)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // History lookups filter on these columns
        manager
            .create_index(
                Index::create()
                    .name("idx_purchases_user_id")
                    .table(Purchases)
                    .col(purchases::Column::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_coin_transactions_from_user_id")
                    .table(CoinTransactions)
                    .col(coin_transactions::Column::FromUserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_coin_transactions_to_user_id")
                    .table(CoinTransactions)
                    .col(coin_transactions::Column::ToUserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CoinTransactions).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Purchases).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Items).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}
