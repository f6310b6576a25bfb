//! Product Repository
//!
//! The engine's only write path for product rows: the conditional
//! transactional price update and manual-override clearing. Catalog CRUD
//! lives in the surrounding application.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{FieldWrite, PricePoint, ProductPriceUpdate};
use shared::types::PriceKind;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const HISTORY_TABLE: &str = "price_history";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Apply the pending writes for one item's products in a single
    /// transaction
    ///
    /// Only fields present in the updates are touched; every price-field
    /// write also stamps its `*_updated_at` with `now_millis`. History
    /// points ride in the same transaction so a rollback leaves no stray
    /// price points behind.
    pub async fn apply_price_updates(
        &self,
        updates: &[ProductPriceUpdate],
        history: &[PricePoint],
        now_millis: i64,
    ) -> RepoResult<()> {
        let updates: Vec<&ProductPriceUpdate> =
            updates.iter().filter(|update| !update.is_empty()).collect();
        if updates.is_empty() && history.is_empty() {
            return Ok(());
        }

        let mut statements: Vec<String> = vec!["BEGIN TRANSACTION".into()];
        let mut id_binds: Vec<(String, RecordId)> = Vec::new();
        let mut value_binds: Vec<(String, i64)> = Vec::new();
        let mut string_binds: Vec<(String, String)> = Vec::new();
        let mut kind_binds: Vec<(String, PriceKind)> = Vec::new();

        for (idx, update) in updates.iter().enumerate() {
            let mut sets: Vec<String> = Vec::new();

            if let Some(write) = update.sell_price {
                push_write(&mut sets, &mut value_binds, idx, "sell_price", write);
                sets.push("sell_price_updated_at = $now".into());
            }
            if let Some(write) = update.buy_price {
                push_write(&mut sets, &mut value_binds, idx, "buy_price", write);
                sets.push("buy_price_updated_at = $now".into());
            }
            if let Some(write) = update.ec_sell_price {
                push_write(&mut sets, &mut value_binds, idx, "ec_sell_price", write);
                sets.push("ec_sell_price_updated_at = $now".into());
            }
            if let Some(write) = update.actual_sell_price {
                push_write(&mut sets, &mut value_binds, idx, "actual_sell_price", write);
            }
            if let Some(write) = update.actual_buy_price {
                push_write(&mut sets, &mut value_binds, idx, "actual_buy_price", write);
            }

            let target = format!("p{idx}");
            statements.push(format!("UPDATE ${target} SET {}", sets.join(", ")));
            id_binds.push((target, update.product.clone()));
        }

        for (idx, point) in history.iter().enumerate() {
            let key = format!("{}_{}_{}", point.product.key(), point.date, point.kind);
            let target = format!("h{idx}");
            statements.push(format!(
                "UPSERT ${target} SET product = ${target}_product, date = ${target}_date, \
                 kind = ${target}_kind, price = ${target}_price"
            ));
            id_binds.push((target.clone(), RecordId::from_table_key(HISTORY_TABLE, key)));
            id_binds.push((format!("{target}_product"), point.product.clone()));
            string_binds.push((format!("{target}_date"), point.date.clone()));
            kind_binds.push((format!("{target}_kind"), point.kind));
            value_binds.push((format!("{target}_price"), point.price));
        }

        statements.push("COMMIT TRANSACTION".into());

        let mut query = self
            .base
            .db()
            .query(statements.join(";\n"))
            .bind(("now", now_millis));
        for bind in id_binds {
            query = query.bind(bind);
        }
        for bind in value_binds {
            query = query.bind(bind);
        }
        for bind in string_binds {
            query = query.bind(bind);
        }
        for bind in kind_binds {
            query = query.bind(bind);
        }

        query.await?.check()?;
        Ok(())
    }

    /// Clear manual overrides for products opted into auto adjustment
    ///
    /// Returns the number of products cleared. Only products whose
    /// `allow_*_price_auto_adjustment` flag is set are touched.
    pub async fn clear_auto_overrides(
        &self,
        item: &RecordId,
        kind: PriceKind,
    ) -> RepoResult<u64> {
        let (field, flag) = match kind {
            PriceKind::Sell => ("specific_sell_price", "allow_sell_price_auto_adjustment"),
            PriceKind::Buy => ("specific_buy_price", "allow_buy_price_auto_adjustment"),
            PriceKind::Ec => {
                return Err(RepoError::Validation(
                    "EC prices have no manual override".into(),
                ));
            }
        };

        let mut result = self
            .base
            .db()
            .query(format!(
                "UPDATE product SET {field} = NONE \
                 WHERE item = $item AND {field} != NONE AND {flag} = true \
                 RETURN BEFORE"
            ))
            .bind(("item", item.clone()))
            .await?;
        let cleared: Vec<serde_json::Value> = result.take(0)?;
        Ok(cleared.len() as u64)
    }
}

fn push_write(
    sets: &mut Vec<String>,
    value_binds: &mut Vec<(String, i64)>,
    idx: usize,
    column: &str,
    write: FieldWrite,
) {
    match write {
        FieldWrite::Set(value) => {
            let name = format!("p{idx}_{column}");
            sets.push(format!("{column} = ${name}"));
            value_binds.push((name, value));
        }
        FieldWrite::Clear => sets.push(format!("{column} = NONE")),
    }
}
