//! Price adjustment engine for the retail back office
//!
//! Deterministic recomputation of product sell, buy and marketplace (EC)
//! prices from a layered set of pricing rules, plus the stock aggregator
//! that shares its trigger path. Invoked in-process by the catalog and
//! scheduling layers; there is no network or CLI surface here.
//!
//! # Module structure
//!
//! ```text
//! price-engine/src/
//! ├── core/          # configuration
//! ├── common/        # errors, logging
//! ├── db/            # embedded database, models, repositories
//! └── pricing/       # calculator, resolver, context, orchestrator
//! ```
//!
//! # Recompute cycle
//!
//! ```text
//! recompute_prices(item_id, is_update)
//!     ├─ 1. Acquire the per-item lock (serializes same-item runs)
//!     ├─ 2. Load the pricing context snapshot
//!     ├─ 3. Resolve the override rate per product
//!     ├─ 4. Compute sell / buy / EC prices
//!     ├─ 5. Diff against stored values (anti-churn)
//!     ├─ 6. Commit changed fields + timestamps + history in one transaction
//!     └─ 7. Return the change summary and collected per-product errors
//! ```

pub mod common;
pub mod core;
pub mod db;
pub mod pricing;

// Re-export public types
pub use common::{AppError, AppResult};
pub use core::Config;
pub use db::DbService;
pub use pricing::PriceEngine;

// Re-export logger functions
pub use common::logger::{init_logger, init_logger_with_file};
