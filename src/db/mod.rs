use anyhow::{Context, Result};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Statement,
    TransactionTrait,
};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::prelude::*;

pub mod migrator;
pub mod repositories;

pub use repositories::item::Item;
pub use repositories::ledger::{DebitOutcome, PurchaseRecord, TransactionRecord};
pub use repositories::user::User;

/// Handle to the relational store. Cheap to clone; constructed once and passed in.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
        let in_memory = path_str.starts_with(":memory:");

        if !in_memory {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file: {path_str}"))?;
            }
        }

        let opt = connect_options(db_url, in_memory, max_connections, min_connections);
        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            in_memory,
            "Database connected & migrations applied (pool: {}-{})",
            min_connections,
            max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn item_repo(&self) -> repositories::item::ItemRepository {
        repositories::item::ItemRepository::new(self.conn.clone())
    }

    fn ledger_repo(&self) -> repositories::ledger::LedgerRepository {
        repositories::ledger::LedgerRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_username_with_password(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>> {
        self.user_repo()
            .get_by_username_with_password(username)
            .await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn create_user(&self, username: &str, password_hash: String) -> Result<Option<User>> {
        self.user_repo().create(username, password_hash).await
    }

    pub async fn usernames_by_ids(&self, ids: &[i32]) -> Result<HashMap<i32, String>> {
        self.user_repo().usernames_by_ids(ids).await
    }

    // ========== Catalog ==========

    pub async fn get_item(&self, name: &str) -> Result<Option<Item>> {
        self.item_repo().get_by_name(name).await
    }

    pub async fn list_items(&self) -> Result<Vec<Item>> {
        self.item_repo().list().await
    }

    pub async fn count_items(&self) -> Result<u64> {
        self.item_repo().count().await
    }

    pub async fn seed_catalog(&self) -> Result<u64> {
        self.item_repo().seed_catalog().await
    }

    // ========== Ledger ==========

    pub async fn list_purchases(&self, user_id: i32) -> Result<Vec<PurchaseRecord>> {
        self.ledger_repo().list_purchases(user_id).await
    }

    pub async fn list_sent_transactions(&self, user_id: i32) -> Result<Vec<TransactionRecord>> {
        self.ledger_repo().list_sent_transactions(user_id).await
    }

    pub async fn list_received_transactions(
        &self,
        user_id: i32,
    ) -> Result<Vec<TransactionRecord>> {
        self.ledger_repo().list_received_transactions(user_id).await
    }

    pub async fn transfer_coins(
        &self,
        from_user_id: i32,
        to_user_id: i32,
        amount: i64,
    ) -> Result<DebitOutcome> {
        self.ledger_repo()
            .transfer(from_user_id, to_user_id, amount)
            .await
    }

    pub async fn purchase_item(&self, user_id: i32, item: &Item) -> Result<DebitOutcome> {
        self.ledger_repo().purchase(user_id, item).await
    }

    // ========== Maintenance ==========

    /// Wipes every table and reseeds the catalog in a single transaction.
    pub async fn reset(&self) -> Result<()> {
        let txn = self.conn.begin().await?;

        Purchases::delete_many().exec(&txn).await?;
        CoinTransactions::delete_many().exec(&txn).await?;
        Users::delete_many().exec(&txn).await?;
        Items::delete_many().exec(&txn).await?;

        repositories::item::seed_catalog(&txn).await?;

        txn.commit().await?;
        info!("Database reset");
        Ok(())
    }
}

fn connect_options(
    db_url: &str,
    in_memory: bool,
    max_connections: u32,
    min_connections: u32,
) -> ConnectOptions {
    let mut opt = ConnectOptions::new(db_url.to_string());
    opt.connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    if in_memory {
        // Each pooled connection to :memory: is its own database, and recycling
        // the only one would swap in an empty, unmigrated database.
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600));
    }

    opt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::catalog;

    async fn memory_store() -> Store {
        Store::new("sqlite::memory:").await.unwrap()
    }

    #[test]
    fn in_memory_pool_is_never_recycled() {
        let opt = connect_options("sqlite::memory:", true, 5, 1);
        assert_eq!(opt.get_max_connections(), Some(1));
        assert_eq!(opt.get_idle_timeout(), None);
        assert_eq!(opt.get_max_lifetime(), None);

        let opt = connect_options("sqlite:data/coinshop.db", false, 5, 1);
        assert_eq!(opt.get_max_connections(), Some(5));
        assert_eq!(opt.get_max_lifetime(), Some(Duration::from_secs(600)));
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = memory_store().await;

        assert_eq!(store.seed_catalog().await.unwrap(), catalog::ITEMS.len() as u64);
        assert_eq!(store.seed_catalog().await.unwrap(), 0);
        assert_eq!(store.count_items().await.unwrap(), catalog::ITEMS.len() as u64);

        let pen = store.get_item("pen").await.unwrap().unwrap();
        assert_eq!(pen.price, 10);
    }

    #[tokio::test]
    async fn duplicate_username_is_not_inserted() {
        let store = memory_store().await;

        let first = store.create_user("alice", "hash".to_string()).await.unwrap();
        assert!(first.is_some());
        assert_eq!(first.unwrap().balance, 1000);

        let second = store.create_user("alice", "other".to_string()).await.unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn transfer_moves_coins_and_records_history() {
        let store = memory_store().await;
        let alice = store.create_user("alice", "h".to_string()).await.unwrap().unwrap();
        let bob = store.create_user("bob", "h".to_string()).await.unwrap().unwrap();

        let outcome = store.transfer_coins(alice.id, bob.id, 100).await.unwrap();
        assert_eq!(outcome, DebitOutcome::Committed);

        assert_eq!(store.get_user(alice.id).await.unwrap().unwrap().balance, 900);
        assert_eq!(store.get_user(bob.id).await.unwrap().unwrap().balance, 1100);

        let sent = store.list_sent_transactions(alice.id).await.unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to_user_id, bob.id);
        assert_eq!(sent[0].amount, 100);

        let received = store.list_received_transactions(bob.id).await.unwrap();
        assert_eq!(received, sent);
    }

    #[tokio::test]
    async fn overdraft_is_refused_without_side_effects() {
        let store = memory_store().await;
        let alice = store.create_user("alice", "h".to_string()).await.unwrap().unwrap();
        let bob = store.create_user("bob", "h".to_string()).await.unwrap().unwrap();

        let outcome = store.transfer_coins(alice.id, bob.id, 1001).await.unwrap();
        assert_eq!(outcome, DebitOutcome::InsufficientFunds);

        assert_eq!(store.get_user(alice.id).await.unwrap().unwrap().balance, 1000);
        assert_eq!(store.get_user(bob.id).await.unwrap().unwrap().balance, 1000);
        assert!(store.list_sent_transactions(alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn self_transfer_nets_to_zero() {
        let store = memory_store().await;
        let alice = store.create_user("alice", "h".to_string()).await.unwrap().unwrap();

        let outcome = store.transfer_coins(alice.id, alice.id, 250).await.unwrap();
        assert_eq!(outcome, DebitOutcome::Committed);
        assert_eq!(store.get_user(alice.id).await.unwrap().unwrap().balance, 1000);
        assert_eq!(store.list_sent_transactions(alice.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn purchase_is_a_coin_sink() {
        let store = memory_store().await;
        store.seed_catalog().await.unwrap();
        let alice = store.create_user("alice", "h".to_string()).await.unwrap().unwrap();
        let hoody = store.get_item("pink-hoody").await.unwrap().unwrap();

        assert_eq!(
            store.purchase_item(alice.id, &hoody).await.unwrap(),
            DebitOutcome::Committed
        );
        assert_eq!(
            store.purchase_item(alice.id, &hoody).await.unwrap(),
            DebitOutcome::Committed
        );
        assert_eq!(
            store.purchase_item(alice.id, &hoody).await.unwrap(),
            DebitOutcome::InsufficientFunds
        );

        assert_eq!(store.get_user(alice.id).await.unwrap().unwrap().balance, 0);

        let purchases = store.list_purchases(alice.id).await.unwrap();
        assert_eq!(purchases.len(), 2);
        assert!(purchases.iter().all(|p| p.item_name == "pink-hoody" && p.price == 500));
    }

    #[tokio::test]
    async fn reset_wipes_users_and_reseeds() {
        let store = memory_store().await;
        store.seed_catalog().await.unwrap();
        store.create_user("alice", "h".to_string()).await.unwrap();

        store.reset().await.unwrap();

        assert!(store.get_user_by_username("alice").await.unwrap().is_none());
        assert_eq!(store.count_items().await.unwrap(), catalog::ITEMS.len() as u64);
    }
}
