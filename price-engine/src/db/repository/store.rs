//! Store Repository

use super::{BaseRepository, RepoResult};
use crate::db::models::{EcSetting, Store};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct StoreRepository {
    base: BaseRepository,
}

impl StoreRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find store settings by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Store>> {
        let store: Option<Store> = self.base.db().select(id.clone()).await?;
        Ok(store)
    }

    /// Find the store's marketplace setting, if any
    pub async fn find_ec_setting(&self, store: &RecordId) -> RepoResult<Option<EcSetting>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM ec_setting WHERE store = $store LIMIT 1")
            .bind(("store", store.clone()))
            .await?;
        let settings: Vec<EcSetting> = result.take(0)?;
        Ok(settings.into_iter().next())
    }
}
