//! Pricing Module
//!
//! The price adjustment core: pure calculator, rate resolver, context
//! snapshot loading and the batch recompute orchestrator.

pub mod calculator;
pub mod context;
pub mod engine;
pub mod resolver;

pub use calculator::{adjusted_price, ec_adjusted_price};
pub use context::PricingContext;
pub use engine::PriceEngine;
pub use resolver::{RateResolution, matches_scope, resolve_rate};
