//! Store and EC Setting Models

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::types::{RoundRule, TaxMode};
use surrealdb::RecordId;

/// Store entity — rounding/tax policy and the blanket stage-2 adjustment
///
/// The stage-2 slot (`specific_auto_sell_price_adjustment`) is shared by
/// sell and buy computation; there is deliberately only one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    /// Rounding policy for computed prices
    #[serde(default)]
    pub price_adjustment_round_rule: Option<RoundRule>,
    /// Rounding granularity (e.g. 10, 100)
    #[serde(default)]
    pub price_adjustment_round_rank: Option<i64>,
    /// Tax rate as a fraction (0.1 = 10%)
    #[serde(default)]
    pub tax_rate: Option<f64>,
    #[serde(default)]
    pub tax_mode: TaxMode,
    /// Blanket stage-2 adjustment expression applied after the rate's stage-1
    #[serde(default)]
    pub specific_auto_sell_price_adjustment: Option<String>,
}

/// EC (marketplace) setting entity — per store, sell price only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcSetting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub store: RecordId,
    /// Adjustment percentage applied to the effective sell price (null = 100)
    #[serde(default)]
    pub auto_sell_price_adjustment: Option<i64>,
    #[serde(default)]
    pub price_adjustment_round_rule: Option<RoundRule>,
    #[serde(default)]
    pub price_adjustment_round_rank: Option<i64>,
    /// Marketplace selling enabled for this store
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub enabled: bool,
}
