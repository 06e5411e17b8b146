use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait, sea_query::Expr,
};

use super::item::Item;
use crate::entities::{coin_transactions, prelude::*, purchases, users};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRecord {
    pub id: i32,
    pub user_id: i32,
    pub item_name: String,
    pub price: i64,
    pub created_at: String,
}

impl From<purchases::Model> for PurchaseRecord {
    fn from(model: purchases::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            item_name: model.item_name,
            price: model.price,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub id: i32,
    pub from_user_id: i32,
    pub to_user_id: i32,
    pub amount: i64,
    pub created_at: String,
}

impl From<coin_transactions::Model> for TransactionRecord {
    fn from(model: coin_transactions::Model) -> Self {
        Self {
            id: model.id,
            from_user_id: model.from_user_id,
            to_user_id: model.to_user_id,
            amount: model.amount,
            created_at: model.created_at,
        }
    }
}

/// Result of a balance-changing unit of work that may be refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebitOutcome {
    Committed,
    InsufficientFunds,
}

/// Repository for balance mutations and the purchase / transfer history.
pub struct LedgerRepository {
    conn: DatabaseConnection,
}

impl LedgerRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_purchases(&self, user_id: i32) -> Result<Vec<PurchaseRecord>> {
        let rows = Purchases::find()
            .filter(purchases::Column::UserId.eq(user_id))
            .order_by_asc(purchases::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list purchases")?;

        Ok(rows.into_iter().map(PurchaseRecord::from).collect())
    }

    pub async fn list_sent_transactions(&self, user_id: i32) -> Result<Vec<TransactionRecord>> {
        self.list_transactions(coin_transactions::Column::FromUserId, user_id)
            .await
    }

    pub async fn list_received_transactions(
        &self,
        user_id: i32,
    ) -> Result<Vec<TransactionRecord>> {
        self.list_transactions(coin_transactions::Column::ToUserId, user_id)
            .await
    }

    async fn list_transactions(
        &self,
        column: coin_transactions::Column,
        user_id: i32,
    ) -> Result<Vec<TransactionRecord>> {
        let rows = CoinTransactions::find()
            .filter(column.eq(user_id))
            .order_by_asc(coin_transactions::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list coin transactions")?;

        Ok(rows.into_iter().map(TransactionRecord::from).collect())
    }

    /// Moves `amount` coins between two users and records the transaction,
    /// all in one database transaction. Sender and receiver may be the same user.
    pub async fn transfer(
        &self,
        from_user_id: i32,
        to_user_id: i32,
        amount: i64,
    ) -> Result<DebitOutcome> {
        let txn = self.conn.begin().await?;

        if !debit(&txn, from_user_id, amount).await? {
            txn.rollback().await?;
            return Ok(DebitOutcome::InsufficientFunds);
        }

        Users::update_many()
            .col_expr(
                users::Column::Balance,
                Expr::col(users::Column::Balance).add(amount),
            )
            .filter(users::Column::Id.eq(to_user_id))
            .exec(&txn)
            .await
            .context("Failed to credit receiver")?;

        CoinTransactions::insert(coin_transactions::ActiveModel {
            from_user_id: Set(from_user_id),
            to_user_id: Set(to_user_id),
            amount: Set(amount),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        })
        .exec(&txn)
        .await
        .context("Failed to record coin transaction")?;

        txn.commit().await?;
        Ok(DebitOutcome::Committed)
    }

    /// Charges the item's current price and records one unit of it.
    pub async fn purchase(&self, user_id: i32, item: &Item) -> Result<DebitOutcome> {
        let txn = self.conn.begin().await?;

        if !debit(&txn, user_id, item.price).await? {
            txn.rollback().await?;
            return Ok(DebitOutcome::InsufficientFunds);
        }

        Purchases::insert(purchases::ActiveModel {
            user_id: Set(user_id),
            item_name: Set(item.name.clone()),
            price: Set(item.price),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        })
        .exec(&txn)
        .await
        .context("Failed to record purchase")?;

        txn.commit().await?;
        Ok(DebitOutcome::Committed)
    }
}

/// Guarded decrement: only applies while the balance covers `amount`,
/// so concurrent writers can never drive it below zero.
async fn debit(txn: &DatabaseTransaction, user_id: i32, amount: i64) -> Result<bool> {
    let result = Users::update_many()
        .col_expr(
            users::Column::Balance,
            Expr::col(users::Column::Balance).sub(amount),
        )
        .filter(users::Column::Id.eq(user_id))
        .filter(users::Column::Balance.gte(amount))
        .exec(txn)
        .await
        .context("Failed to debit balance")?;

    Ok(result.rows_affected == 1)
}
