//! Persistence ports for catalog records.
//!
//! Listings exclude soft-deleted records; direct lookups by id return them so
//! existing inventory and sales keep resolving their part and store.

use std::sync::Arc;

use partstock_core::{PartId, RepositoryResult, StoreId};

use crate::part::Part;
use crate::store::Store;

pub trait PartRepository: Send + Sync {
    fn get(&self, id: PartId) -> RepositoryResult<Option<Part>>;
    fn find_by_sku(&self, sku: &str) -> RepositoryResult<Option<Part>>;
    fn list(&self) -> RepositoryResult<Vec<Part>>;
    /// Fails with `Duplicate` when the SKU is already taken.
    fn insert(&self, part: Part) -> RepositoryResult<()>;
    /// Fails with `NotFound` when no part has this id.
    fn update(&self, part: Part) -> RepositoryResult<()>;
}

pub trait StoreRepository: Send + Sync {
    fn get(&self, id: StoreId) -> RepositoryResult<Option<Store>>;
    fn find_by_number(&self, store_number: &str) -> RepositoryResult<Option<Store>>;
    fn list(&self) -> RepositoryResult<Vec<Store>>;
    /// Fails with `Duplicate` when the store number is already taken.
    fn insert(&self, store: Store) -> RepositoryResult<()>;
    fn update(&self, store: Store) -> RepositoryResult<()>;
}

impl<S> PartRepository for Arc<S>
where
    S: PartRepository + ?Sized,
{
    fn get(&self, id: PartId) -> RepositoryResult<Option<Part>> {
        (**self).get(id)
    }

    fn find_by_sku(&self, sku: &str) -> RepositoryResult<Option<Part>> {
        (**self).find_by_sku(sku)
    }

    fn list(&self) -> RepositoryResult<Vec<Part>> {
        (**self).list()
    }

    fn insert(&self, part: Part) -> RepositoryResult<()> {
        (**self).insert(part)
    }

    fn update(&self, part: Part) -> RepositoryResult<()> {
        (**self).update(part)
    }
}

impl<S> StoreRepository for Arc<S>
where
    S: StoreRepository + ?Sized,
{
    fn get(&self, id: StoreId) -> RepositoryResult<Option<Store>> {
        (**self).get(id)
    }

    fn find_by_number(&self, store_number: &str) -> RepositoryResult<Option<Store>> {
        (**self).find_by_number(store_number)
    }

    fn list(&self) -> RepositoryResult<Vec<Store>> {
        (**self).list()
    }

    fn insert(&self, store: Store) -> RepositoryResult<()> {
        (**self).insert(store)
    }

    fn update(&self, store: Store) -> RepositoryResult<()> {
        (**self).update(store)
    }
}
