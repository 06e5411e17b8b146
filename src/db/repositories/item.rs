use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, sea_query::OnConflict,
};
use tracing::info;

use crate::constants::catalog;
use crate::entities::{items, prelude::*};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub price: i64,
}

impl From<items::Model> for Item {
    fn from(model: items::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
        }
    }
}

/// Repository for the purchasable catalog
pub struct ItemRepository {
    conn: DatabaseConnection,
}

impl ItemRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Item>> {
        let item = Items::find()
            .filter(items::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("Failed to query item by name")?;

        Ok(item.map(Item::from))
    }

    pub async fn list(&self) -> Result<Vec<Item>> {
        let rows = Items::find()
            .order_by_asc(items::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list items")?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        Items::find()
            .count(&self.conn)
            .await
            .context("Failed to count items")
    }

    /// Inserts the fixed catalog when the table is empty.
    /// Returns the number of rows inserted.
    pub async fn seed_catalog(&self) -> Result<u64> {
        seed_catalog(&self.conn).await
    }
}

/// Runs on any connection so the reset path can reseed inside its transaction.
pub async fn seed_catalog<C: ConnectionTrait>(conn: &C) -> Result<u64> {
    let existing = Items::find()
        .count(conn)
        .await
        .context("Failed to count items")?;

    if existing > 0 {
        return Ok(0);
    }

    let models = catalog::ITEMS.iter().map(|(name, price)| items::ActiveModel {
        name: Set((*name).to_string()),
        price: Set(*price),
        ..Default::default()
    });

    let inserted = Items::insert_many(models)
        .on_conflict(OnConflict::column(items::Column::Name).do_nothing().to_owned())
        .exec_without_returning(conn)
        .await
        .context("Failed to seed catalog")?;

    info!("Seeded catalog with {} items", inserted);
    Ok(inserted)
}
