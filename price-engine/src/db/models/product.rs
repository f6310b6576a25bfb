//! Product Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Product entity — one sellable variant of an item under a condition option
///
/// `sell_price` / `buy_price` / `ec_sell_price` are computed fields owned by
/// the engine. `specific_*` are staff-entered manual overrides; when set,
/// the override defines the effective price for that field and the computed
/// value keeps ticking along underneath. `actual_*` materialize the
/// effective price (override if set, else computed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub item: RecordId,
    pub store: RecordId,
    /// Condition option this variant is sold under (null = no condition axis)
    #[serde(default)]
    pub condition_option: Option<RecordId>,

    // Computed prices (engine-owned)
    #[serde(default)]
    pub sell_price: Option<i64>,
    #[serde(default)]
    pub buy_price: Option<i64>,
    #[serde(default)]
    pub ec_sell_price: Option<i64>,

    // Manual overrides
    #[serde(default)]
    pub specific_sell_price: Option<i64>,
    #[serde(default)]
    pub specific_buy_price: Option<i64>,

    // Effective prices (engine-maintained)
    #[serde(default)]
    pub actual_sell_price: Option<i64>,
    #[serde(default)]
    pub actual_buy_price: Option<i64>,

    /// Whether the store rounding policy applies to this product
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub allow_round: bool,
    /// Whether a raw-sell-price change clears the manual sell override
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub allow_sell_price_auto_adjustment: bool,
    /// Whether a raw-buy-price change clears the manual buy override
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub allow_buy_price_auto_adjustment: bool,

    // Field change timestamps (Unix millis), bumped only on value change
    #[serde(default)]
    pub sell_price_updated_at: Option<i64>,
    #[serde(default)]
    pub buy_price_updated_at: Option<i64>,
    #[serde(default)]
    pub ec_sell_price_updated_at: Option<i64>,

    #[serde(default)]
    pub stock_number: i64,
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

/// A single pending field write, distinguishing "set to a value" from
/// "set to NULL"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWrite {
    Set(i64),
    Clear,
}

/// Pending conditional writes for one product
///
/// Built by the orchestrator after diffing computed values against the
/// stored snapshot: a `None` field is left untouched, so an unchanged field
/// never churns its timestamp. Price-field writes stamp their
/// `*_updated_at`; the `actual_*` effective-price writes do not.
#[derive(Debug, Clone)]
pub struct ProductPriceUpdate {
    pub product: RecordId,
    pub sell_price: Option<FieldWrite>,
    pub buy_price: Option<FieldWrite>,
    pub ec_sell_price: Option<FieldWrite>,
    pub actual_sell_price: Option<FieldWrite>,
    pub actual_buy_price: Option<FieldWrite>,
}

impl ProductPriceUpdate {
    pub fn new(product: RecordId) -> Self {
        Self {
            product,
            sell_price: None,
            buy_price: None,
            ec_sell_price: None,
            actual_sell_price: None,
            actual_buy_price: None,
        }
    }

    /// Count of price fields written (sell/buy/ec), for the result summary
    pub fn fields_changed(&self) -> u32 {
        [self.sell_price, self.buy_price, self.ec_sell_price]
            .iter()
            .filter(|write| write.is_some())
            .count() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.sell_price.is_none()
            && self.buy_price.is_none()
            && self.ec_sell_price.is_none()
            && self.actual_sell_price.is_none()
            && self.actual_buy_price.is_none()
    }
}
