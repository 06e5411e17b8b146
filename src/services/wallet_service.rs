//! Domain service for balances, coin transfers and purchases.

use serde::Serialize;
use thiserror::Error;

use crate::db::Item;

/// Errors specific to wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("User not found")]
    UserNotFound,

    #[error("Recipient not found")]
    RecipientNotFound,

    #[error("Item not available")]
    ItemNotAvailable,

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Insufficient funds to send")]
    InsufficientFundsToSend,

    #[error("Insufficient funds to buy")]
    InsufficientFundsToBuy,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for WalletError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for WalletError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryEntry {
    #[serde(rename = "type")]
    pub item_type: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedCoins {
    pub from_user: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentCoins {
    pub to_user: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoinHistory {
    pub received: Vec<ReceivedCoins>,
    pub sent: Vec<SentCoins>,
}

/// Everything `GET /api/info` reports about a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletInfo {
    pub coins: i64,
    pub inventory: Vec<InventoryEntry>,
    pub coin_history: CoinHistory,
}

/// Domain service trait for the coin economy.
#[async_trait::async_trait]
pub trait WalletService: Send + Sync {
    /// Balance, inventory and coin history of a user.
    async fn info(&self, username: &str) -> Result<WalletInfo, WalletError>;

    /// Moves coins from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Checks run in order: amount, recipient, sender, balance.
    async fn send_coins(&self, from: &str, to: &str, amount: i64) -> Result<(), WalletError>;

    /// Buys one unit of a catalog item.
    async fn buy(&self, username: &str, item_name: &str) -> Result<(), WalletError>;

    /// The full catalog, in seeding order.
    async fn catalog(&self) -> Result<Vec<Item>, WalletError>;
}
