//! Item Repository

use super::{BaseRepository, RepoResult};
use crate::db::models::{Item, Product};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct ItemRepository {
    base: BaseRepository,
}

impl ItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find item by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Item>> {
        let item: Option<Item> = self.base.db().select(id.clone()).await?;
        Ok(item)
    }

    /// Find the item's active products
    pub async fn find_products(&self, item: &RecordId) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE item = $item AND is_active = true")
            .bind(("item", item.clone()))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Stock numbers of the item's active products
    pub async fn product_stock_numbers(&self, item: &RecordId) -> RepoResult<Vec<i64>> {
        let stock: Vec<i64> = self
            .base
            .db()
            .query("SELECT VALUE stock_number FROM product WHERE item = $item AND is_active = true")
            .bind(("item", item.clone()))
            .await?
            .take(0)?;
        Ok(stock)
    }

    /// Write the aggregated stock total
    pub async fn set_stock_total(&self, item: &RecordId, total: i64) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $item SET products_stock_number = $total")
            .bind(("item", item.clone()))
            .bind(("total", total))
            .await?
            .check()?;
        Ok(())
    }
}
