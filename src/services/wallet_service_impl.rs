//! `SeaORM` implementation of the `WalletService` trait.

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::info;

use crate::constants::UNKNOWN_USERNAME;
use crate::db::{DebitOutcome, Item, PurchaseRecord, Store};
use crate::services::wallet_service::{
    CoinHistory, InventoryEntry, ReceivedCoins, SentCoins, WalletError, WalletInfo,
    WalletService,
};

pub struct SeaOrmWalletService {
    store: Store,
}

impl SeaOrmWalletService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Counts purchases per item name, keeping the order in which items were first bought.
#[must_use]
pub fn group_inventory(purchases: &[PurchaseRecord]) -> Vec<InventoryEntry> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut inventory: Vec<InventoryEntry> = Vec::new();

    for purchase in purchases {
        if let Some(&idx) = positions.get(purchase.item_name.as_str()) {
            inventory[idx].quantity += 1;
        } else {
            positions.insert(&purchase.item_name, inventory.len());
            inventory.push(InventoryEntry {
                item_type: purchase.item_name.clone(),
                quantity: 1,
            });
        }
    }

    inventory
}

fn counterpart_name(names: &HashMap<i32, String>, id: i32) -> String {
    names
        .get(&id)
        .cloned()
        .unwrap_or_else(|| UNKNOWN_USERNAME.to_string())
}

#[async_trait]
impl WalletService for SeaOrmWalletService {
    async fn info(&self, username: &str) -> Result<WalletInfo, WalletError> {
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(WalletError::UserNotFound)?;

        let purchases = self.store.list_purchases(user.id).await?;
        let received = self.store.list_received_transactions(user.id).await?;
        let sent = self.store.list_sent_transactions(user.id).await?;

        let mut counterpart_ids: Vec<i32> = received
            .iter()
            .map(|tx| tx.from_user_id)
            .chain(sent.iter().map(|tx| tx.to_user_id))
            .collect();
        counterpart_ids.sort_unstable();
        counterpart_ids.dedup();

        let names = self.store.usernames_by_ids(&counterpart_ids).await?;

        let received = received
            .iter()
            .map(|tx| ReceivedCoins {
                from_user: counterpart_name(&names, tx.from_user_id),
                amount: tx.amount,
            })
            .collect();

        let sent = sent
            .iter()
            .map(|tx| SentCoins {
                to_user: counterpart_name(&names, tx.to_user_id),
                amount: tx.amount,
            })
            .collect();

        Ok(WalletInfo {
            coins: user.balance,
            inventory: group_inventory(&purchases),
            coin_history: CoinHistory { received, sent },
        })
    }

    async fn send_coins(&self, from: &str, to: &str, amount: i64) -> Result<(), WalletError> {
        if amount <= 0 {
            return Err(WalletError::InvalidAmount);
        }

        let receiver = self
            .store
            .get_user_by_username(to)
            .await?
            .ok_or(WalletError::RecipientNotFound)?;

        let sender = self
            .store
            .get_user_by_username(from)
            .await?
            .ok_or(WalletError::UserNotFound)?;

        if sender.balance < amount {
            return Err(WalletError::InsufficientFundsToSend);
        }

        // The balance may have moved since the read above; the store re-checks it atomically.
        match self
            .store
            .transfer_coins(sender.id, receiver.id, amount)
            .await?
        {
            DebitOutcome::Committed => {
                metrics::counter!("coin_transfers_total").increment(1);
                metrics::counter!("coins_transferred_total").increment(amount.unsigned_abs());
                info!(from = %from, to = %to, amount, "Coins sent");
                Ok(())
            }
            DebitOutcome::InsufficientFunds => Err(WalletError::InsufficientFundsToSend),
        }
    }

    async fn buy(&self, username: &str, item_name: &str) -> Result<(), WalletError> {
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(WalletError::UserNotFound)?;

        let item = self
            .store
            .get_item(item_name)
            .await?
            .ok_or(WalletError::ItemNotAvailable)?;

        if user.balance < item.price {
            return Err(WalletError::InsufficientFundsToBuy);
        }

        match self.store.purchase_item(user.id, &item).await? {
            DebitOutcome::Committed => {
                metrics::counter!("purchases_total", "item" => item.name.clone()).increment(1);
                info!(user = %username, item = %item.name, price = item.price, "Item purchased");
                Ok(())
            }
            DebitOutcome::InsufficientFunds => Err(WalletError::InsufficientFundsToBuy),
        }
    }

    async fn catalog(&self) -> Result<Vec<Item>, WalletError> {
        Ok(self.store.list_items().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purchase(id: i32, name: &str) -> PurchaseRecord {
        PurchaseRecord {
            id,
            user_id: 1,
            item_name: name.to_string(),
            price: 10,
            created_at: String::new(),
        }
    }

    #[test]
    fn inventory_groups_by_name_in_first_seen_order() {
        let purchases = vec![
            purchase(1, "cup"),
            purchase(2, "pen"),
            purchase(3, "cup"),
            purchase(4, "cup"),
        ];

        let inventory = group_inventory(&purchases);
        assert_eq!(
            inventory,
            vec![
                InventoryEntry {
                    item_type: "cup".to_string(),
                    quantity: 3
                },
                InventoryEntry {
                    item_type: "pen".to_string(),
                    quantity: 1
                },
            ]
        );
    }

    #[test]
    fn empty_purchases_give_empty_inventory() {
        assert!(group_inventory(&[]).is_empty());
    }

    #[test]
    fn inventory_serializes_with_type_key() {
        let entry = InventoryEntry {
            item_type: "book".to_string(),
            quantity: 2,
        };
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            serde_json::json!({"type": "book", "quantity": 2})
        );
    }

    #[tokio::test]
    async fn unknown_recipient_wins_over_balance_check() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        store.create_user("alice", "h".to_string()).await.unwrap();
        let wallet = SeaOrmWalletService::new(store);

        let err = wallet.send_coins("alice", "nobody", 5000).await.unwrap_err();
        assert!(matches!(err, WalletError::RecipientNotFound));
    }

    #[tokio::test]
    async fn history_names_counterparts() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        store.create_user("alice", "h".to_string()).await.unwrap();
        store.create_user("bob", "h".to_string()).await.unwrap();
        let wallet = SeaOrmWalletService::new(store);

        wallet.send_coins("alice", "bob", 30).await.unwrap();
        wallet.send_coins("bob", "alice", 5).await.unwrap();

        let info = wallet.info("alice").await.unwrap();
        assert_eq!(info.coins, 975);
        assert_eq!(
            info.coin_history.sent,
            vec![SentCoins {
                to_user: "bob".to_string(),
                amount: 30
            }]
        );
        assert_eq!(
            info.coin_history.received,
            vec![ReceivedCoins {
                from_user: "bob".to_string(),
                amount: 5
            }]
        );
    }
}
