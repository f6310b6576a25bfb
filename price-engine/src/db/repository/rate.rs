//! Override Rate Repository

use super::{BaseRepository, RepoResult};
use crate::db::models::OverrideRate;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct RateRepository {
    base: BaseRepository,
}

impl RateRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find active candidate rates for a category
    ///
    /// Candidates are every rate attached to one of the category's condition
    /// options; per-product narrowing (option match, group/genre wildcards)
    /// happens in the resolver.
    pub async fn find_for_category(&self, category: &RecordId) -> RepoResult<Vec<OverrideRate>> {
        let rates: Vec<OverrideRate> = self
            .base
            .db()
            .query(
                "SELECT * FROM condition_option_rate \
                 WHERE is_active = true AND condition_option.category = $category",
            )
            .bind(("category", category.clone()))
            .await?
            .take(0)?;
        Ok(rates)
    }

    /// Find active rates scoped to one condition option
    pub async fn find_for_condition_option(
        &self,
        option: &RecordId,
    ) -> RepoResult<Vec<OverrideRate>> {
        let rates: Vec<OverrideRate> = self
            .base
            .db()
            .query(
                "SELECT * FROM condition_option_rate \
                 WHERE is_active = true AND condition_option = $option",
            )
            .bind(("option", option.clone()))
            .await?
            .take(0)?;
        Ok(rates)
    }
}
