//! Pricing Context Loader
//!
//! Assembles the consistent per-item snapshot the orchestrator computes
//! from. Loading runs under the per-item lock, so the snapshot cannot
//! interleave with another recompute of the same item; rule and store
//! settings are read-only inputs and never written back.

use crate::common::{AppError, AppResult};
use crate::db::models::{EcSetting, Item, OverrideRate, Product, Store};
use crate::db::repository::{ItemRepository, RateRepository, StoreRepository};
use shared::recompute::{FieldError, FieldErrorKind};
use shared::types::{Adjustment, PriceKind};
use surrealdb::RecordId;

/// Snapshot of everything one item's recompute needs
#[derive(Debug)]
pub struct PricingContext {
    pub item: Item,
    pub products: Vec<Product>,
    pub store: Store,
    /// Present only when the store has marketplace selling enabled
    pub ec_setting: Option<EcSetting>,
    /// Candidate rates for the item's category; narrowed per product by the
    /// resolver
    pub rates: Vec<OverrideRate>,
    /// Stage-2 adjustment parsed from the store, shared by sell and buy
    pub stage2_adjust: Option<Adjustment>,
    /// Parse warnings collected while assembling the snapshot
    pub warnings: Vec<FieldError>,
}

impl PricingContext {
    /// Load the snapshot for one item
    pub async fn load(
        items: &ItemRepository,
        stores: &StoreRepository,
        rates: &RateRepository,
        item_id: &RecordId,
    ) -> AppResult<Self> {
        let item = items
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::item_not_found(item_id.to_string()))?;

        let products = items.find_products(item_id).await?;

        let store = stores.find_by_id(&item.store).await?.ok_or_else(|| {
            AppError::database(format!("store {} missing for item {item_id}", item.store))
        })?;

        let ec_setting = stores
            .find_ec_setting(&item.store)
            .await?
            .filter(|setting| setting.enabled);

        let rates = rates.find_for_category(&item.category).await?;

        let mut warnings = Vec::new();
        let stage2_adjust = parse_adjustment(
            store.specific_auto_sell_price_adjustment.as_deref(),
            &store
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "store:?".into()),
            PriceKind::Sell,
            &mut warnings,
        );

        Ok(Self {
            item,
            products,
            store,
            ec_setting,
            rates,
            stage2_adjust,
            warnings,
        })
    }
}

/// Parse an optional adjustment expression, degrading to "no adjustment"
/// with a surfaced warning on malformed input
pub fn parse_adjustment(
    raw: Option<&str>,
    subject_id: &str,
    field: PriceKind,
    warnings: &mut Vec<FieldError>,
) -> Option<Adjustment> {
    match Adjustment::parse_opt(raw) {
        Ok(adjust) => adjust,
        Err(err) => {
            tracing::warn!(
                subject = %subject_id,
                %field,
                error = %err,
                "Malformed adjustment expression; treated as no adjustment"
            );
            warnings.push(FieldError {
                subject_id: subject_id.to_string(),
                field,
                kind: FieldErrorKind::InvalidAdjustment,
                message: err.to_string(),
            });
            None
        }
    }
}
