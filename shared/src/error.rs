//! Unified error handling
//!
//! Application-level error type for the price adjustment engine.
//!
//! # Error classes
//!
//! | Class | Variants | Handling |
//! |-------|----------|----------|
//! | Per-item | `ItemNotFound`, `WriteConflict`, `Timeout` | abort the item, nothing written |
//! | System | `Validation`, `Database`, `Internal` | surfaced to the caller |
//!
//! Per-product degradations (missing base price, malformed adjustment,
//! ambiguous rate) are not errors at this level; they are collected in
//! [`crate::recompute::RecomputeResult::errors`] so a single bad product
//! never aborts its siblings.

use thiserror::Error;

/// Application error enum
#[derive(Debug, Error)]
pub enum AppError {
    // ========== Per-item errors ==========
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// The transactional write failed after retries; nothing was applied
    #[error("Write conflict: {0}")]
    WriteConflict(String),

    /// The per-item recompute timed out; nothing was applied
    #[error("Recompute timed out after {0} ms")]
    Timeout(u64),

    // ========== System errors ==========
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn item_not_found(id: impl Into<String>) -> Self {
        Self::ItemNotFound(id.into())
    }

    pub fn write_conflict(message: impl Into<String>) -> Self {
        Self::WriteConflict(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether re-running the operation can succeed without operator action
    ///
    /// Recomputes are pure functions of current rule state, so anything that
    /// failed before committing is safe to retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::WriteConflict(_) | AppError::Timeout(_))
    }
}

/// Application-level Result type
pub type AppResult<T> = Result<T, AppError>;
