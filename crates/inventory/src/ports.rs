//! Capabilities the inventory module needs from its collaborators.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use partstock_core::{ExpectedVersion, InventoryId, PartId, RepositoryResult, StoreId};

use crate::record::InventoryRecord;

/// Read access to the sales ledger.
pub trait SalesQuery: Send + Sync {
    /// Units of `part_id` sold at `store_id` in `[start, end)`.
    ///
    /// Returns `Ok(0)` when nothing matches; errors only when the ledger
    /// cannot be read.
    fn total_quantity_sold(
        &self,
        part_id: PartId,
        store_id: StoreId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepositoryResult<u64>;
}

/// Storage for inventory records, unique per (part, store).
pub trait InventoryRepository: Send + Sync {
    fn get(&self, id: InventoryId) -> RepositoryResult<Option<InventoryRecord>>;
    fn find_by_part_and_store(
        &self,
        part_id: PartId,
        store_id: StoreId,
    ) -> RepositoryResult<Option<InventoryRecord>>;
    /// Every record that is not soft-deleted.
    fn list(&self) -> RepositoryResult<Vec<InventoryRecord>>;
    /// Fails with `Duplicate` when the (part, store) pair already has a record.
    fn insert(&self, record: InventoryRecord) -> RepositoryResult<()>;
    /// Atomic compare-and-swap write.
    ///
    /// The stored version must satisfy `expected`; on success the stored copy
    /// gets the next version and is returned.
    fn save(
        &self,
        record: InventoryRecord,
        expected: ExpectedVersion,
    ) -> RepositoryResult<InventoryRecord>;
}

/// Raised when a sale leaves a record at or below its reorder quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReorderAlert {
    pub inventory_id: InventoryId,
    pub part_id: PartId,
    pub store_id: StoreId,
    pub sku: String,
    pub store_number: String,
    pub quantity: u32,
    pub reorder_point: u32,
    pub reorder_quantity: u32,
}

/// Observability channel for reorder alerts.
pub trait AlertSink: Send + Sync {
    fn reorder_alert(&self, alert: &ReorderAlert);
}

impl<S> SalesQuery for Arc<S>
where
    S: SalesQuery + ?Sized,
{
    fn total_quantity_sold(
        &self,
        part_id: PartId,
        store_id: StoreId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepositoryResult<u64> {
        (**self).total_quantity_sold(part_id, store_id, start, end)
    }
}

impl<S> InventoryRepository for Arc<S>
where
    S: InventoryRepository + ?Sized,
{
    fn get(&self, id: InventoryId) -> RepositoryResult<Option<InventoryRecord>> {
        (**self).get(id)
    }

    fn find_by_part_and_store(
        &self,
        part_id: PartId,
        store_id: StoreId,
    ) -> RepositoryResult<Option<InventoryRecord>> {
        (**self).find_by_part_and_store(part_id, store_id)
    }

    fn list(&self) -> RepositoryResult<Vec<InventoryRecord>> {
        (**self).list()
    }

    fn insert(&self, record: InventoryRecord) -> RepositoryResult<()> {
        (**self).insert(record)
    }

    fn save(
        &self,
        record: InventoryRecord,
        expected: ExpectedVersion,
    ) -> RepositoryResult<InventoryRecord> {
        (**self).save(record, expected)
    }
}
