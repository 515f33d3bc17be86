//! Database operations for the `stores` table, and the Postgres
//! [`StoreRepository`].

mod read;
mod types;
mod write;

use sqlx::PgPool;
use storefinder_core::{
    normalize_limit, Haversine, SearchDefaults, SearchRequest, Store, StoreError, StoreFilter,
    StoreId, StoreRepository,
};
use tracing::debug;

pub use read::{
    contains_pattern, count_stores, get_store, list_stores, search_store_candidates, store_exists,
    CandidateQuery,
};
pub use types::StoreRow;
pub use write::{delete_store, insert_store, upsert_store};

/// [`StoreRepository`] over a Postgres pool.
///
/// Searches push the folded name, zip code and bounding box into SQL, then
/// run the shared exact filter over the returned rows.
#[derive(Debug, Clone)]
pub struct PgStoreRepository {
    pool: PgPool,
    defaults: SearchDefaults,
    calculator: Haversine,
}

impl PgStoreRepository {
    #[must_use]
    pub fn new(pool: PgPool, defaults: SearchDefaults) -> Self {
        Self {
            pool,
            defaults,
            calculator: Haversine,
        }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn failed(operation: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| {
        tracing::error!(error = %e, operation, "store query failed");
        StoreError::operation_failed(operation, e)
    }
}

fn decode_row(row: StoreRow) -> Result<Store, StoreError> {
    Store::try_from(row).map_err(|e| StoreError::operation_failed("decode store row", e))
}

fn decode_rows(rows: Vec<StoreRow>) -> Result<Vec<Store>, StoreError> {
    rows.into_iter().map(decode_row).collect()
}

impl StoreRepository for PgStoreRepository {
    async fn get_all_stores(&self, limit: i64) -> Result<Vec<Store>, StoreError> {
        let limit = normalize_limit(limit)?.map(|n| i64::try_from(n).unwrap_or(i64::MAX));
        let rows = list_stores(&self.pool, limit)
            .await
            .map_err(failed("list stores"))?;
        decode_rows(rows)
    }

    async fn add_store(&self, store: Store) -> Result<(), StoreError> {
        let inserted = insert_store(&self.pool, &store)
            .await
            .map_err(failed("add store"))?;
        if inserted {
            debug!(store_id = %store.store_id(), "inserted store");
            Ok(())
        } else {
            Err(StoreError::AlreadyExists {
                id: store.store_id(),
            })
        }
    }

    async fn contains_store(&self, id: StoreId) -> Result<bool, StoreError> {
        store_exists(&self.pool, *id.as_uuid())
            .await
            .map_err(failed("check store"))
    }

    async fn get_store(&self, id: StoreId) -> Result<Store, StoreError> {
        let row = get_store(&self.pool, *id.as_uuid())
            .await
            .map_err(failed("get store"))?
            .ok_or(StoreError::DoesNotExist { id })?;
        decode_row(row)
    }

    async fn search_for_stores(&self, request: &SearchRequest) -> Result<Vec<Store>, StoreError> {
        let query = CandidateQuery::from_request(request, &self.defaults, &self.calculator)?;
        let rows = search_store_candidates(&self.pool, &query)
            .await
            .map_err(failed("search stores"))?;
        let candidates = decode_rows(rows)?;
        let candidate_count = candidates.len();

        let results = StoreFilter::new(request, &self.defaults, &self.calculator).apply(candidates);
        debug!(
            candidates = candidate_count,
            results = results.len(),
            bbox = ?query.bbox,
            "postgres store search"
        );
        Ok(results)
    }

    async fn update_store(&self, store: Store) -> Result<bool, StoreError> {
        let is_new = upsert_store(&self.pool, &store)
            .await
            .map_err(failed("update store"))?;
        debug!(store_id = %store.store_id(), is_new, "upserted store");
        Ok(is_new)
    }

    async fn delete_store(&self, id: StoreId) -> Result<(), StoreError> {
        let removed = delete_store(&self.pool, *id.as_uuid())
            .await
            .map_err(failed("delete store"))?;
        if removed == 0 {
            return Err(StoreError::DoesNotExist { id });
        }
        debug!(store_id = %id, "deleted store");
        Ok(())
    }

    async fn count_stores(&self) -> Result<usize, StoreError> {
        let count = count_stores(&self.pool)
            .await
            .map_err(failed("count stores"))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
