//! Condition Option and Override Rate Models

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Condition option entity — one point on a category's condition axis
/// (e.g. a grading tier)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Parent category
    pub category: RecordId,
    pub name: String,
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

/// Override rate entity — a candidate pricing rule
///
/// Scoped to a condition option and optionally narrowed to an item group
/// and/or genre; a null group/genre is a wildcard. The adjustment
/// expressions are stored as strings ("120%" or "-50") and parsed at load
/// time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideRate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub condition_option: RecordId,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub genre_id: Option<i64>,
    /// Stage-1 sell adjustment expression
    #[serde(default)]
    pub auto_sell_price_adjustment: Option<String>,
    /// Stage-1 buy adjustment expression
    #[serde(default)]
    pub auto_buy_price_adjustment: Option<String>,
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

impl OverrideRate {
    /// Stable identifier for logs and warnings
    pub fn id_string(&self) -> String {
        self.id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "condition_option_rate:?".to_string())
    }
}
