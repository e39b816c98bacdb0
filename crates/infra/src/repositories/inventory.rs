use partstock_core::{ExpectedVersion, InventoryId, PartId, RepositoryError, RepositoryResult, StoreId};
use partstock_inventory::{InventoryRecord, InventoryRepository};

use crate::store::RecordStore;

/// Inventory records, unique per (part, store), with versioned saves.
#[derive(Debug, Default)]
pub struct InMemoryInventoryRepository {
    records: RecordStore<InventoryRecord>,
}

impl InMemoryInventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InventoryRepository for InMemoryInventoryRepository {
    fn get(&self, id: InventoryId) -> RepositoryResult<Option<InventoryRecord>> {
        self.records.get(id)
    }

    fn find_by_part_and_store(
        &self,
        part_id: PartId,
        store_id: StoreId,
    ) -> RepositoryResult<Option<InventoryRecord>> {
        self.records
            .find(|r| r.part_id == part_id && r.store_id == store_id)
    }

    fn list(&self) -> RepositoryResult<Vec<InventoryRecord>> {
        let mut records = self.records.list()?;
        records.sort_by_key(|r| (r.store_id, r.part_id));
        Ok(records)
    }

    fn insert(&self, record: InventoryRecord) -> RepositoryResult<()> {
        self.records.insert_unique(
            record,
            |a, b| a.part_id == b.part_id && a.store_id == b.store_id,
            |r| format!("inventory for part {} at store {}", r.part_id, r.store_id),
        )
    }

    fn save(
        &self,
        mut record: InventoryRecord,
        expected: ExpectedVersion,
    ) -> RepositoryResult<InventoryRecord> {
        let mut map = self.records.write()?;
        let current = map.get(&record.id).ok_or(RepositoryError::NotFound)?;
        expected.check(current.version)?;
        if current.part_id != record.part_id || current.store_id != record.store_id {
            return Err(RepositoryError::Conflict(
                "inventory (part, store) pair cannot change".to_string(),
            ));
        }
        record.version = current.version + 1;
        map.insert(record.id, record.clone());
        Ok(record)
    }
}
