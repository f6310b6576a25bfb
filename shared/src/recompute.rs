//! Recompute result DTOs
//!
//! Returned by the engine's public operations and consumed by the
//! scheduling/catalog layer.

use crate::types::PriceKind;
use serde::{Deserialize, Serialize};

/// Per-field error kind collected during a recompute
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldErrorKind {
    /// The item's raw price is null and no manual override exists; the
    /// stored field keeps its prior value
    MissingBasePrice,
    /// An adjustment expression failed to parse; that stage was treated as
    /// "no adjustment"
    InvalidAdjustment,
    /// More than one override rate matched at identical specificity; the
    /// deterministic tie-break still picked one
    AmbiguousRateConflict,
}

/// A skipped or degraded computation, surfaced rather than silently dropped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// The product (or rate/store for scope-level warnings) involved
    pub subject_id: String,
    pub field: PriceKind,
    pub kind: FieldErrorKind,
    pub message: String,
}

/// Summary returned by `recompute_prices`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecomputeResult {
    pub item_id: String,
    /// Price fields actually written (sell/buy/ec across all products)
    pub fields_changed: u32,
    pub errors: Vec<FieldError>,
}

/// Summary returned by `recompute_stock`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockTotal {
    pub item_id: String,
    pub new_total: i64,
}
