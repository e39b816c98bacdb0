//! Catalog use cases on top of the repository ports.

use thiserror::Error;

use partstock_core::{DomainError, PartId, RepositoryError, StoreId};

use crate::part::{NewPart, Part, PartCategory, PartUpdate};
use crate::repository::{PartRepository, StoreRepository};
use crate::store::{NewStore, Store, StoreUpdate};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Part lookups and maintenance.
#[derive(Debug, Clone)]
pub struct PartCatalog<P> {
    parts: P,
}

impl<P: PartRepository> PartCatalog<P> {
    pub fn new(parts: P) -> Self {
        Self { parts }
    }

    pub fn list(&self) -> CatalogResult<Vec<Part>> {
        Ok(self.parts.list()?)
    }

    pub fn get(&self, id: PartId) -> CatalogResult<Option<Part>> {
        Ok(self.parts.get(id)?)
    }

    pub fn by_sku(&self, sku: &str) -> CatalogResult<Option<Part>> {
        Ok(self.parts.find_by_sku(sku)?)
    }

    pub fn by_category(&self, category: PartCategory) -> CatalogResult<Vec<Part>> {
        Ok(self
            .parts
            .list()?
            .into_iter()
            .filter(|p| p.category == category)
            .collect())
    }

    pub fn search_by_name(&self, term: &str) -> CatalogResult<Vec<Part>> {
        Ok(self
            .parts
            .list()?
            .into_iter()
            .filter(|p| p.name_contains(term))
            .collect())
    }

    pub fn create(&self, new: NewPart) -> CatalogResult<Part> {
        let part = Part::create(PartId::new(), new)?;
        if self.parts.find_by_sku(&part.sku)?.is_some() {
            return Err(DomainError::conflict(format!(
                "Part with SKU {} already exists",
                part.sku
            ))
            .into());
        }
        self.parts.insert(part.clone())?;
        tracing::info!(sku = %part.sku, part_id = %part.id, "part created");
        Ok(part)
    }

    pub fn update(&self, id: PartId, update: PartUpdate) -> CatalogResult<Part> {
        let mut part = self.parts.get(id)?.ok_or(DomainError::NotFound)?;
        part.apply_update(update)?;
        self.parts.update(part.clone())?;
        Ok(part)
    }

    /// Soft delete. Unknown ids are ignored.
    pub fn delete(&self, id: PartId) -> CatalogResult<()> {
        if let Some(mut part) = self.parts.get(id)? {
            part.deleted = true;
            self.parts.update(part)?;
        }
        Ok(())
    }
}

/// Store lookups and maintenance.
#[derive(Debug, Clone)]
pub struct StoreDirectory<S> {
    stores: S,
}

impl<S: StoreRepository> StoreDirectory<S> {
    pub fn new(stores: S) -> Self {
        Self { stores }
    }

    pub fn list(&self) -> CatalogResult<Vec<Store>> {
        Ok(self.stores.list()?)
    }

    pub fn get(&self, id: StoreId) -> CatalogResult<Option<Store>> {
        Ok(self.stores.get(id)?)
    }

    pub fn by_number(&self, store_number: &str) -> CatalogResult<Option<Store>> {
        Ok(self.stores.find_by_number(store_number)?)
    }

    pub fn create(&self, new: NewStore) -> CatalogResult<Store> {
        let store = Store::create(StoreId::new(), new)?;
        if self.stores.find_by_number(&store.store_number)?.is_some() {
            return Err(DomainError::conflict(format!(
                "Store with number {} already exists",
                store.store_number
            ))
            .into());
        }
        self.stores.insert(store.clone())?;
        tracing::info!(store_number = %store.store_number, store_id = %store.id, "store created");
        Ok(store)
    }

    pub fn update(&self, id: StoreId, update: StoreUpdate) -> CatalogResult<Store> {
        let mut store = self.stores.get(id)?.ok_or(DomainError::NotFound)?;
        store.apply_update(update)?;
        self.stores.update(store.clone())?;
        Ok(store)
    }

    /// Soft delete. Unknown ids are ignored.
    pub fn delete(&self, id: StoreId) -> CatalogResult<()> {
        if let Some(mut store) = self.stores.get(id)? {
            store.deleted = true;
            self.stores.update(store)?;
        }
        Ok(())
    }
}
