//! Batch Recompute Orchestrator
//!
//! Drives the read → resolve → calculate → conditional-write cycle for one
//! item at a time, plus the stock aggregator sharing its trigger path.
//!
//! # Concurrency model
//!
//! Different items recompute fully in parallel; recomputes for the same
//! item serialize on a per-item async mutex held across the whole cycle, so
//! two near-simultaneous triggers cannot interleave their read-resolve-write
//! cycles and lose an update. The write is a single transaction, retried
//! with backoff; because the calculator and resolver are pure functions of
//! current rule state, re-running after any failure converges to the same
//! result.

use crate::common::{AppError, AppResult};
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::{FieldWrite, PricePoint, Product, ProductPriceUpdate};
use crate::db::repository::{
    ItemRepository, ProductRepository, RateRepository, StoreRepository, record_id,
};
use crate::pricing::calculator::{adjusted_price, ec_adjusted_price};
use crate::pricing::context::{PricingContext, parse_adjustment};
use crate::pricing::resolver::resolve_rate;
use dashmap::DashMap;
use futures::StreamExt;
use shared::recompute::{FieldError, FieldErrorKind, RecomputeResult, StockTotal};
use shared::types::{Adjustment, PriceKind};
use std::sync::Arc;
use std::time::Duration;
use surrealdb::RecordId;
use tokio::sync::Mutex;

const ITEM_TABLE: &str = "item";

/// Price adjustment engine
///
/// Stateless per invocation apart from the per-item lock table; cheap to
/// clone and share across the application.
#[derive(Clone)]
pub struct PriceEngine {
    items: ItemRepository,
    products: ProductRepository,
    rates: RateRepository,
    stores: StoreRepository,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
    config: Config,
}

impl std::fmt::Debug for PriceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceEngine")
            .field("config", &self.config)
            .finish()
    }
}

/// Computed targets for one product, before diffing against the snapshot
struct ComputedPrices {
    /// None = unresolvable, stored value kept
    sell: Option<i64>,
    /// None = buy price must be NULL (absence preserved)
    buy: Option<i64>,
    /// None = no marketplace, or sell unresolved without an override
    ec: Option<i64>,
}

impl PriceEngine {
    pub fn new(db: &DbService, config: Config) -> Self {
        Self {
            items: ItemRepository::new(db.db.clone()),
            products: ProductRepository::new(db.db.clone()),
            rates: RateRepository::new(db.db.clone()),
            stores: StoreRepository::new(db.db.clone()),
            locks: Arc::new(DashMap::new()),
            config,
        }
    }

    /// Per-item lock; recomputes for the same item serialize on it
    fn item_lock(&self, item_id: &RecordId) -> Arc<Mutex<()>> {
        self.locks
            .entry(item_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Recompute all computed prices for one item
    ///
    /// `is_update` distinguishes a re-price of an existing item from the
    /// initial pricing on creation; it controls the buy-price NULL rule.
    /// Accepts `"item:xyz"` or a bare record key.
    pub async fn recompute_prices(
        &self,
        item_id: &str,
        is_update: bool,
    ) -> AppResult<RecomputeResult> {
        let item_id = record_id(ITEM_TABLE, item_id);
        let lock = self.item_lock(&item_id);

        let timeout = Duration::from_millis(self.config.recompute_timeout_ms);
        tokio::time::timeout(timeout, async {
            let _guard = lock.lock().await;
            self.recompute_locked(&item_id, is_update).await
        })
        .await
        .map_err(|_| AppError::Timeout(self.config.recompute_timeout_ms))?
    }

    /// Recompute a set of items with bounded parallelism
    ///
    /// Items fail independently; results come back in input order so the
    /// caller can re-queue retryable failures.
    pub async fn recompute_batch(
        &self,
        item_ids: &[String],
        is_update: bool,
    ) -> Vec<AppResult<RecomputeResult>> {
        futures::stream::iter(
            item_ids
                .iter()
                .map(|item_id| self.recompute_prices(item_id, is_update)),
        )
        .buffered(self.config.batch_workers.max(1))
        .collect()
        .await
    }

    /// Recompute the item's aggregate stock from its active products
    ///
    /// Independent of price recompute and safe to run concurrently with it;
    /// the side effect is limited to the item's stock total.
    pub async fn recompute_stock(&self, item_id: &str) -> AppResult<StockTotal> {
        let item_id = record_id(ITEM_TABLE, item_id);

        if self.items.find_by_id(&item_id).await?.is_none() {
            return Err(AppError::item_not_found(item_id.to_string()));
        }

        let new_total: i64 = self
            .items
            .product_stock_numbers(&item_id)
            .await?
            .into_iter()
            .sum();
        self.items.set_stock_total(&item_id, new_total).await?;

        tracing::debug!(item = %item_id, new_total, "Stock total recomputed");
        Ok(StockTotal {
            item_id: item_id.to_string(),
            new_total,
        })
    }

    /// Clear manual overrides for products opted into auto adjustment
    ///
    /// Invoked by the catalog layer when an item's raw sell/buy price
    /// changes, ahead of the recompute that change triggers. Returns the
    /// number of products cleared.
    pub async fn clear_auto_overrides(&self, item_id: &str, kind: PriceKind) -> AppResult<u64> {
        let item_id = record_id(ITEM_TABLE, item_id);
        let lock = self.item_lock(&item_id);
        let _guard = lock.lock().await;

        let cleared = self.products.clear_auto_overrides(&item_id, kind).await?;
        if cleared > 0 {
            tracing::info!(item = %item_id, %kind, cleared, "Cleared manual overrides");
        }
        Ok(cleared)
    }

    // ==================== Recompute cycle ====================

    async fn recompute_locked(
        &self,
        item_id: &RecordId,
        is_update: bool,
    ) -> AppResult<RecomputeResult> {
        let mut ctx =
            PricingContext::load(&self.items, &self.stores, &self.rates, item_id).await?;

        let mut result = RecomputeResult {
            item_id: item_id.to_string(),
            fields_changed: 0,
            errors: std::mem::take(&mut ctx.warnings),
        };

        let now = chrono::Utc::now();
        let now_millis = now.timestamp_millis();
        let today = now.format("%Y-%m-%d").to_string();

        let mut updates: Vec<ProductPriceUpdate> = Vec::new();
        let mut history: Vec<PricePoint> = Vec::new();

        for product in &ctx.products {
            let Some(product_id) = product.id.clone() else {
                continue;
            };

            let computed = self.compute_product(&ctx, product, &product_id, is_update, &mut result.errors);
            let update = diff_product(product, &product_id, &computed, &today, &mut history);
            result.fields_changed += update.fields_changed();
            updates.push(update);
        }

        self.write_with_retry(&updates, &history, now_millis).await?;

        tracing::info!(
            item = %item_id,
            fields_changed = result.fields_changed,
            errors = result.errors.len(),
            "Recompute finished"
        );
        Ok(result)
    }

    /// Resolve the rate and run the calculator for one product
    fn compute_product(
        &self,
        ctx: &PricingContext,
        product: &Product,
        product_id: &RecordId,
        is_update: bool,
        errors: &mut Vec<FieldError>,
    ) -> ComputedPrices {
        let resolution = resolve_rate(
            &ctx.rates,
            product.condition_option.as_ref(),
            ctx.item.group_id,
            ctx.item.genre_id,
        );

        if resolution.ambiguous
            && let Some(winner) = resolution.winner
        {
            tracing::warn!(
                product = %product_id,
                rate = %winner.id_string(),
                "Multiple override rates matched at identical specificity"
            );
            errors.push(FieldError {
                subject_id: product_id.to_string(),
                field: PriceKind::Sell,
                kind: FieldErrorKind::AmbiguousRateConflict,
                message: format!(
                    "multiple rates share scope (genre {:?}, group {:?}); kept {}",
                    winner.genre_id,
                    winner.group_id,
                    winner.id_string()
                ),
            });
        }

        let (sell_adjust, buy_adjust): (Option<Adjustment>, Option<Adjustment>) =
            match resolution.winner {
                Some(rate) => {
                    let rate_id = rate.id_string();
                    (
                        parse_adjustment(
                            rate.auto_sell_price_adjustment.as_deref(),
                            &rate_id,
                            PriceKind::Sell,
                            errors,
                        ),
                        parse_adjustment(
                            rate.auto_buy_price_adjustment.as_deref(),
                            &rate_id,
                            PriceKind::Buy,
                            errors,
                        ),
                    )
                }
                None => (None, None),
            };

        let store = &ctx.store;

        // Sell: unresolvable when the raw price and the override are both
        // absent; the stored value is kept and the gap surfaced.
        let sell = if ctx.item.sell_price.is_none() && product.specific_sell_price.is_none() {
            errors.push(FieldError {
                subject_id: product_id.to_string(),
                field: PriceKind::Sell,
                kind: FieldErrorKind::MissingBasePrice,
                message: "item has no raw sell price and product has no manual override".into(),
            });
            None
        } else {
            Some(adjusted_price(
                ctx.item.sell_price,
                sell_adjust.as_ref(),
                store.price_adjustment_round_rule,
                store.price_adjustment_round_rank,
                product.allow_round,
                ctx.stage2_adjust.as_ref(),
            ))
        };

        // Buy: absence is preserved on update, never zero-filled
        let buy = if is_update
            && product.specific_buy_price.is_none()
            && ctx.item.buy_price.is_none()
        {
            None
        } else {
            Some(adjusted_price(
                ctx.item.buy_price,
                buy_adjust.as_ref(),
                store.price_adjustment_round_rule,
                store.price_adjustment_round_rank,
                product.allow_round,
                ctx.stage2_adjust.as_ref(),
            ))
        };

        // EC: always from the effective sell price, never the raw base
        let effective_sell = product.specific_sell_price.or(sell);
        let ec = match (&ctx.ec_setting, effective_sell) {
            (Some(ec_setting), Some(effective)) => Some(ec_adjusted_price(
                Some(effective),
                ec_setting.auto_sell_price_adjustment,
                ec_setting.price_adjustment_round_rule,
                ec_setting.price_adjustment_round_rank,
                store.tax_rate,
                store.tax_mode,
            )),
            _ => None,
        };

        ComputedPrices { sell, buy, ec }
    }

    /// Commit the transactional write, retrying with backoff
    async fn write_with_retry(
        &self,
        updates: &[ProductPriceUpdate],
        history: &[PricePoint],
        now_millis: i64,
    ) -> AppResult<()> {
        let mut attempt: u32 = 0;
        loop {
            match self
                .products
                .apply_price_updates(updates, history, now_millis)
                .await
            {
                Ok(()) => return Ok(()),
                Err(err) if attempt < self.config.write_retry_max => {
                    attempt += 1;
                    let backoff =
                        self.config.write_retry_backoff_ms << attempt.min(6);
                    tracing::warn!(attempt, backoff_ms = backoff, error = %err, "Price write failed; retrying");
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                }
                Err(err) => return Err(AppError::write_conflict(err.to_string())),
            }
        }
    }
}

/// Diff computed targets against the stored snapshot
///
/// Produces only the writes whose value actually differs, so unchanged
/// fields never churn their timestamps, and collects history points for
/// effective-price changes.
fn diff_product(
    product: &Product,
    product_id: &RecordId,
    computed: &ComputedPrices,
    today: &str,
    history: &mut Vec<PricePoint>,
) -> ProductPriceUpdate {
    let mut update = ProductPriceUpdate::new(product_id.clone());

    if let Some(new_sell) = computed.sell
        && product.sell_price != Some(new_sell)
    {
        update.sell_price = Some(FieldWrite::Set(new_sell));
    }

    match computed.buy {
        Some(new_buy) if product.buy_price != Some(new_buy) => {
            update.buy_price = Some(FieldWrite::Set(new_buy));
        }
        None if product.buy_price.is_some() => {
            update.buy_price = Some(FieldWrite::Clear);
        }
        _ => {}
    }

    if let Some(new_ec) = computed.ec
        && product.ec_sell_price != Some(new_ec)
    {
        update.ec_sell_price = Some(FieldWrite::Set(new_ec));
        history.push(PricePoint {
            product: product_id.clone(),
            date: today.to_string(),
            kind: PriceKind::Ec,
            price: new_ec,
        });
    }

    // Effective prices: override if set, else the computed value (falling
    // back to the stored one when the sell price was unresolvable)
    let new_actual_sell = product
        .specific_sell_price
        .or(computed.sell.or(product.sell_price));
    if new_actual_sell != product.actual_sell_price {
        update.actual_sell_price = Some(match new_actual_sell {
            Some(value) => FieldWrite::Set(value),
            None => FieldWrite::Clear,
        });
        if let Some(value) = new_actual_sell {
            history.push(PricePoint {
                product: product_id.clone(),
                date: today.to_string(),
                kind: PriceKind::Sell,
                price: value,
            });
        }
    }

    let new_actual_buy = product.specific_buy_price.or(computed.buy);
    if new_actual_buy != product.actual_buy_price {
        update.actual_buy_price = Some(match new_actual_buy {
            Some(value) => FieldWrite::Set(value),
            None => FieldWrite::Clear,
        });
        if let Some(value) = new_actual_buy {
            history.push(PricePoint {
                product: product_id.clone(),
                date: today.to_string(),
                kind: PriceKind::Buy,
                price: value,
            });
        }
    }

    update
}
