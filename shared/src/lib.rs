//! Shared vocabulary for the price adjustment engine
//!
//! Pure types used by the engine and the surrounding back-office
//! application: adjustment expressions, rounding and tax policy enums,
//! recompute result DTOs, and the application error type. No I/O and no
//! storage types live here.

pub mod error;
pub mod recompute;
pub mod types;

// Re-exports
pub use error::{AppError, AppResult};
pub use recompute::{FieldError, FieldErrorKind, RecomputeResult, StockTotal};
pub use types::{Adjustment, AdjustmentParseError, PriceKind, RoundRule, TaxMode};
