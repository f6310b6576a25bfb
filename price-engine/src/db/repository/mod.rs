//! Repository Module
//!
//! Read/write access to the catalog tables. Rates, store settings and EC
//! settings are read-only inputs here; the only write paths are the
//! conditional product price update, the item stock total and the
//! manual-override clearing.

pub mod item;
pub mod product;
pub mod rate;
pub mod store;

// Re-exports
pub use item::ItemRepository;
pub use product::ProductRepository;
pub use rate::RateRepository;
pub use store::StoreRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse an id that may or may not carry its table prefix into a `RecordId`
///
/// Accepts both `"item:abc"` and `"abc"`.
pub fn record_id(table: &str, id: &str) -> RecordId {
    match id.split_once(':') {
        Some((tb, key)) if tb == table => RecordId::from_table_key(table, key),
        _ => RecordId::from_table_key(table, id),
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
