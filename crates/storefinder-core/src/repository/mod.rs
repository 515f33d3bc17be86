//! The storage abstraction every backend implements.

mod memory;

use std::future::Future;

pub use memory::InMemoryStoreRepository;

use crate::error::{StoreError, ValidationError};
use crate::model::{Store, StoreId};
use crate::search::SearchRequest;

/// A searchable, mutable collection of [`Store`]s.
///
/// Backends are chosen at construction time; callers are generic over this
/// trait. Result order is backend order; no sort is guaranteed.
pub trait StoreRepository: Send + Sync {
    /// Every store, capped at `limit`. A limit of `0` means unbounded.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidArgument`] for a negative limit;
    /// [`StoreError::OperationFailed`] if the backend fails.
    fn get_all_stores(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<Store>, StoreError>> + Send;

    /// Insert a store that does not exist yet.
    ///
    /// # Errors
    ///
    /// [`StoreError::AlreadyExists`] if a store with the same id is present.
    fn add_store(&self, store: Store) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn contains_store(&self, id: StoreId) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// # Errors
    ///
    /// [`StoreError::DoesNotExist`] if no store has this id.
    fn get_store(&self, id: StoreId) -> impl Future<Output = Result<Store, StoreError>> + Send;

    /// Run a search: candidate selection, exact filtering, then the limit.
    fn search_for_stores(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<Vec<Store>, StoreError>> + Send;

    /// Insert `store`, or overwrite every field of the existing store with the
    /// same id. Returns `true` when the store was newly inserted.
    fn update_store(&self, store: Store) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// # Errors
    ///
    /// [`StoreError::DoesNotExist`] if no store has this id.
    fn delete_store(&self, id: StoreId) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn count_stores(&self) -> impl Future<Output = Result<usize, StoreError>> + Send;

    /// [`StoreRepository::delete_store`] keyed by an existing value.
    fn remove_store(&self, store: &Store) -> impl Future<Output = Result<(), StoreError>> + Send {
        self.delete_store(store.store_id())
    }
}

/// Convert a public `i64` limit into a cap, where `None` is unbounded.
///
/// Shared by [`StoreRepository::get_all_stores`] and
/// [`SearchRequest::set_limit`].
///
/// # Errors
///
/// Returns [`ValidationError::InvalidField`] for negative values.
pub fn normalize_limit(limit: i64) -> Result<Option<usize>, ValidationError> {
    let limit = usize::try_from(limit).map_err(|_| {
        ValidationError::invalid("limit", format!("must not be negative, got {limit}"))
    })?;
    Ok((limit > 0).then_some(limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_limit_zero_is_unbounded() {
        assert_eq!(normalize_limit(0), Ok(None));
        assert_eq!(normalize_limit(7), Ok(Some(7)));
        assert!(normalize_limit(-1).is_err());
    }
}
