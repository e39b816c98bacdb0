use partstock_catalog::{Part, PartRepository, Store, StoreRepository};
use partstock_core::{PartId, RepositoryResult, StoreId};

use crate::store::RecordStore;

/// Parts keyed by id, unique by SKU. Listings are ordered by SKU.
#[derive(Debug, Default)]
pub struct InMemoryPartRepository {
    parts: RecordStore<Part>,
}

impl InMemoryPartRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PartRepository for InMemoryPartRepository {
    fn get(&self, id: PartId) -> RepositoryResult<Option<Part>> {
        self.parts.get(id)
    }

    fn find_by_sku(&self, sku: &str) -> RepositoryResult<Option<Part>> {
        self.parts.find(|p| p.sku == sku)
    }

    fn list(&self) -> RepositoryResult<Vec<Part>> {
        let mut parts = self.parts.list()?;
        parts.sort_by(|a, b| a.sku.cmp(&b.sku));
        Ok(parts)
    }

    fn insert(&self, part: Part) -> RepositoryResult<()> {
        self.parts
            .insert_unique(part, |a, b| a.sku == b.sku, |p| format!("sku {}", p.sku))
    }

    fn update(&self, part: Part) -> RepositoryResult<()> {
        self.parts.replace(part)
    }
}

/// Stores keyed by id, unique by store number. Listings are ordered by number.
#[derive(Debug, Default)]
pub struct InMemoryStoreRepository {
    stores: RecordStore<Store>,
}

impl InMemoryStoreRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> RepositoryResult<bool> {
        self.stores.is_empty()
    }
}

impl StoreRepository for InMemoryStoreRepository {
    fn get(&self, id: StoreId) -> RepositoryResult<Option<Store>> {
        self.stores.get(id)
    }

    fn find_by_number(&self, store_number: &str) -> RepositoryResult<Option<Store>> {
        self.stores.find(|s| s.store_number == store_number)
    }

    fn list(&self) -> RepositoryResult<Vec<Store>> {
        let mut stores = self.stores.list()?;
        stores.sort_by(|a, b| a.store_number.cmp(&b.store_number));
        Ok(stores)
    }

    fn insert(&self, store: Store) -> RepositoryResult<()> {
        self.stores.insert_unique(
            store,
            |a, b| a.store_number == b.store_number,
            |s| format!("store number {}", s.store_number),
        )
    }

    fn update(&self, store: Store) -> RepositoryResult<()> {
        self.stores.replace(store)
    }
}
