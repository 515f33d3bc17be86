use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use super::{normalize_limit, StoreRepository};
use crate::error::StoreError;
use crate::geo::{GeoCalculator, Haversine};
use crate::model::{Store, StoreId};
use crate::pipeline::StoreFilter;
use crate::search::{SearchDefaults, SearchRequest};

/// Stores held in process memory, in insertion order.
///
/// Cloning yields another handle to the same collection. Searches hold the
/// read lock for the whole filter pass and mutations hold the write lock, so
/// a search never observes a half-applied upsert.
#[derive(Debug, Clone)]
pub struct InMemoryStoreRepository<G = Haversine> {
    stores: Arc<RwLock<Vec<Store>>>,
    defaults: SearchDefaults,
    calculator: G,
}

impl InMemoryStoreRepository<Haversine> {
    #[must_use]
    pub fn new(defaults: SearchDefaults) -> Self {
        Self::with_calculator(defaults, Haversine)
    }

    /// A repository pre-populated with `stores`; later duplicates by id
    /// replace earlier ones.
    #[must_use]
    pub fn from_stores(defaults: SearchDefaults, stores: impl IntoIterator<Item = Store>) -> Self {
        let mut unique: Vec<Store> = Vec::new();
        for store in stores {
            match unique.iter().position(|s| s.store_id() == store.store_id()) {
                Some(idx) => unique[idx] = store,
                None => unique.push(store),
            }
        }
        Self {
            stores: Arc::new(RwLock::new(unique)),
            defaults,
            calculator: Haversine,
        }
    }
}

impl<G> InMemoryStoreRepository<G> {
    /// An empty repository measuring distances with `calculator`.
    #[must_use]
    pub fn with_calculator(defaults: SearchDefaults, calculator: G) -> Self {
        Self {
            stores: Arc::new(RwLock::new(Vec::new())),
            defaults,
            calculator,
        }
    }

    #[must_use]
    pub fn defaults(&self) -> &SearchDefaults {
        &self.defaults
    }
}

impl<G> StoreRepository for InMemoryStoreRepository<G>
where
    G: GeoCalculator + Send + Sync,
{
    async fn get_all_stores(&self, limit: i64) -> Result<Vec<Store>, StoreError> {
        let cap = normalize_limit(limit)?.unwrap_or(usize::MAX);
        let stores = self.stores.read().await;
        Ok(stores.iter().take(cap).cloned().collect())
    }

    async fn add_store(&self, store: Store) -> Result<(), StoreError> {
        let mut stores = self.stores.write().await;
        let id = store.store_id();
        if stores.iter().any(|s| s.store_id() == id) {
            return Err(StoreError::AlreadyExists { id });
        }
        debug!(store_id = %id, name = store.name(), "adding store");
        stores.push(store);
        Ok(())
    }

    async fn contains_store(&self, id: StoreId) -> Result<bool, StoreError> {
        let stores = self.stores.read().await;
        Ok(stores.iter().any(|s| s.store_id() == id))
    }

    async fn get_store(&self, id: StoreId) -> Result<Store, StoreError> {
        let stores = self.stores.read().await;
        stores
            .iter()
            .find(|s| s.store_id() == id)
            .cloned()
            .ok_or(StoreError::DoesNotExist { id })
    }

    async fn search_for_stores(&self, request: &SearchRequest) -> Result<Vec<Store>, StoreError> {
        let filter = StoreFilter::new(request, &self.defaults, &self.calculator);
        let stores = self.stores.read().await;
        let results = filter.apply_ref(stores.iter());
        debug!(
            candidates = stores.len(),
            results = results.len(),
            "in-memory store search"
        );
        Ok(results)
    }

    async fn update_store(&self, store: Store) -> Result<bool, StoreError> {
        let mut stores = self.stores.write().await;
        let id = store.store_id();
        if let Some(existing) = stores.iter_mut().find(|s| s.store_id() == id) {
            debug!(store_id = %id, "replacing store");
            *existing = store;
            Ok(false)
        } else {
            debug!(store_id = %id, "upsert inserting new store");
            stores.push(store);
            Ok(true)
        }
    }

    async fn delete_store(&self, id: StoreId) -> Result<(), StoreError> {
        let mut stores = self.stores.write().await;
        let idx = stores
            .iter()
            .position(|s| s.store_id() == id)
            .ok_or(StoreError::DoesNotExist { id })?;
        stores.remove(idx);
        debug!(store_id = %id, "deleted store");
        Ok(())
    }

    async fn count_stores(&self) -> Result<usize, StoreError> {
        Ok(self.stores.read().await.len())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
