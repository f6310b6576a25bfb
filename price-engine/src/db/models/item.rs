//! Item Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Catalog item entity — one entry per sellable title
///
/// Carries the raw base prices the engine adjusts from. `group_id` and
/// `genre_id` are the raw numeric identifiers the legacy rate tie-break
/// orders by; null means the item has no group / genre.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub display_name: String,
    /// Owning category
    pub category: RecordId,
    /// Owning store
    pub store: RecordId,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub genre_id: Option<i64>,
    /// Raw sell price in currency minor units (null = not priced yet)
    #[serde(default)]
    pub sell_price: Option<i64>,
    /// Raw buy price in currency minor units (null = not bought back)
    #[serde(default)]
    pub buy_price: Option<i64>,
    /// Aggregate stock over the item's products, maintained by the engine
    #[serde(default)]
    pub products_stock_number: i64,
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}
