//! Price History Model

use serde::{Deserialize, Serialize};
use shared::types::PriceKind;
use surrealdb::RecordId;

/// One effective-price point per (product, day, kind)
///
/// Written whenever an effective price actually changes; repeated changes
/// within a day collapse to the last value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub product: RecordId,
    /// Calendar day (UTC), `YYYY-MM-DD`
    pub date: String,
    pub kind: PriceKind,
    pub price: i64,
}
