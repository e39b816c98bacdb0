//! In-memory fakes for the inventory ports.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use partstock_catalog::{
    NewPart, NewStore, Part, PartCategory, PartRepository, Store, StoreRepository, StoreType,
};
use partstock_core::{
    ExpectedVersion, InventoryId, Money, PartId, RepositoryError, RepositoryResult, StoreId,
};

use crate::ports::{AlertSink, InventoryRepository, ReorderAlert, SalesQuery};
use crate::record::InventoryRecord;
use crate::service::InventoryService;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

pub fn part_with_lead_time(days: u32) -> Part {
    Part::create(
        PartId::new(),
        NewPart {
            sku: "NGK-3403".to_string(),
            name: "NGK Spark Plug".to_string(),
            description: None,
            category: PartCategory::EngineParts,
            cost: Money::from_cents(450),
            price: Money::from_cents(899),
            manufacturer: Some("NGK".to_string()),
            supplier_name: None,
            supplier_lead_time_days: Some(days),
        },
    )
    .unwrap()
}

pub fn store(number: &str) -> Store {
    Store::create(
        StoreId::new(),
        NewStore {
            store_number: number.to_string(),
            name: format!("Store {number}"),
            address: "1 Main St".to_string(),
            city: "Memphis".to_string(),
            state: "TN".to_string(),
            zip_code: "38118".to_string(),
            phone: None,
            store_type: StoreType::Standard,
        },
    )
    .unwrap()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesCall {
    pub part_id: PartId,
    pub store_id: StoreId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Answers by window length: 30, 60 or 90 days. Records every call.
pub struct StaticSales {
    sold_30: u64,
    sold_60: u64,
    sold_90: u64,
    calls: Mutex<Vec<SalesCall>>,
}

impl StaticSales {
    pub fn new(sold_30: u64, sold_60: u64, sold_90: u64) -> Self {
        Self {
            sold_30,
            sold_60,
            sold_90,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SalesCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl SalesQuery for StaticSales {
    fn total_quantity_sold(
        &self,
        part_id: PartId,
        store_id: StoreId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepositoryResult<u64> {
        self.calls.lock().unwrap().push(SalesCall {
            part_id,
            store_id,
            start,
            end,
        });
        Ok(match (end - start).num_days() {
            30 => self.sold_30,
            60 => self.sold_60,
            90 => self.sold_90,
            _ => 0,
        })
    }
}

/// A ledger that can never be read.
pub struct UnreadableSales;

impl SalesQuery for UnreadableSales {
    fn total_quantity_sold(
        &self,
        _part_id: PartId,
        _store_id: StoreId,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> RepositoryResult<u64> {
        Err(RepositoryError::unavailable("ledger lock poisoned"))
    }
}

#[derive(Default)]
pub struct MemoryInventory {
    records: Mutex<HashMap<InventoryId, InventoryRecord>>,
}

impl InventoryRepository for MemoryInventory {
    fn get(&self, id: InventoryId) -> RepositoryResult<Option<InventoryRecord>> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    fn find_by_part_and_store(
        &self,
        part_id: PartId,
        store_id: StoreId,
    ) -> RepositoryResult<Option<InventoryRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .find(|r| r.part_id == part_id && r.store_id == store_id)
            .cloned())
    }

    fn list(&self) -> RepositoryResult<Vec<InventoryRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| !r.deleted)
            .cloned()
            .collect())
    }

    fn insert(&self, record: InventoryRecord) -> RepositoryResult<()> {
        let mut records = self.records.lock().unwrap();
        if records
            .values()
            .any(|r| r.part_id == record.part_id && r.store_id == record.store_id)
        {
            return Err(RepositoryError::duplicate("inventory pair exists"));
        }
        records.insert(record.id, record);
        Ok(())
    }

    fn save(
        &self,
        mut record: InventoryRecord,
        expected: ExpectedVersion,
    ) -> RepositoryResult<InventoryRecord> {
        let mut records = self.records.lock().unwrap();
        let current = records.get(&record.id).ok_or(RepositoryError::NotFound)?;
        expected.check(current.version)?;
        record.version = current.version + 1;
        records.insert(record.id, record.clone());
        Ok(record)
    }
}

/// Wraps [`MemoryInventory`] and refuses every save of one record.
pub struct FailingSaveInventory {
    inner: MemoryInventory,
    failing: InventoryId,
}

impl FailingSaveInventory {
    pub fn new(inner: MemoryInventory, failing: InventoryId) -> Self {
        Self { inner, failing }
    }

    pub fn reorder_point(&self, id: InventoryId) -> u32 {
        self.inner.get(id).unwrap().unwrap().reorder_point
    }
}

impl InventoryRepository for FailingSaveInventory {
    fn get(&self, id: InventoryId) -> RepositoryResult<Option<InventoryRecord>> {
        self.inner.get(id)
    }

    fn find_by_part_and_store(
        &self,
        part_id: PartId,
        store_id: StoreId,
    ) -> RepositoryResult<Option<InventoryRecord>> {
        self.inner.find_by_part_and_store(part_id, store_id)
    }

    fn list(&self) -> RepositoryResult<Vec<InventoryRecord>> {
        self.inner.list()
    }

    fn insert(&self, record: InventoryRecord) -> RepositoryResult<()> {
        self.inner.insert(record)
    }

    fn save(
        &self,
        record: InventoryRecord,
        expected: ExpectedVersion,
    ) -> RepositoryResult<InventoryRecord> {
        if record.id == self.failing {
            return Err(RepositoryError::unavailable("disk full"));
        }
        self.inner.save(record, expected)
    }
}

/// Wraps [`MemoryInventory`] and loses the first `conflicts` saves to a
/// concurrent writer.
pub struct ConflictingSaveInventory {
    inner: MemoryInventory,
    conflicts: usize,
    attempts: AtomicUsize,
}

impl ConflictingSaveInventory {
    pub fn new(inner: MemoryInventory, conflicts: usize) -> Self {
        Self {
            inner,
            conflicts,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn save_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl InventoryRepository for ConflictingSaveInventory {
    fn get(&self, id: InventoryId) -> RepositoryResult<Option<InventoryRecord>> {
        self.inner.get(id)
    }

    fn find_by_part_and_store(
        &self,
        part_id: PartId,
        store_id: StoreId,
    ) -> RepositoryResult<Option<InventoryRecord>> {
        self.inner.find_by_part_and_store(part_id, store_id)
    }

    fn list(&self) -> RepositoryResult<Vec<InventoryRecord>> {
        self.inner.list()
    }

    fn insert(&self, record: InventoryRecord) -> RepositoryResult<()> {
        self.inner.insert(record)
    }

    fn save(
        &self,
        record: InventoryRecord,
        expected: ExpectedVersion,
    ) -> RepositoryResult<InventoryRecord> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.conflicts {
            return Err(RepositoryError::Conflict("record changed underneath".to_string()));
        }
        self.inner.save(record, expected)
    }
}

#[derive(Default)]
pub struct MemoryParts(Mutex<HashMap<PartId, Part>>);

impl MemoryParts {
    pub fn add(&self, part: Part) {
        self.0.lock().unwrap().insert(part.id, part);
    }
}

impl PartRepository for MemoryParts {
    fn get(&self, id: PartId) -> RepositoryResult<Option<Part>> {
        Ok(self.0.lock().unwrap().get(&id).cloned())
    }

    fn find_by_sku(&self, sku: &str) -> RepositoryResult<Option<Part>> {
        Ok(self.0.lock().unwrap().values().find(|p| p.sku == sku).cloned())
    }

    fn list(&self) -> RepositoryResult<Vec<Part>> {
        Ok(self.0.lock().unwrap().values().cloned().collect())
    }

    fn insert(&self, part: Part) -> RepositoryResult<()> {
        self.add(part);
        Ok(())
    }

    fn update(&self, part: Part) -> RepositoryResult<()> {
        self.add(part);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStores(Mutex<HashMap<StoreId, Store>>);

impl MemoryStores {
    pub fn add(&self, store: Store) {
        self.0.lock().unwrap().insert(store.id, store);
    }
}

impl StoreRepository for MemoryStores {
    fn get(&self, id: StoreId) -> RepositoryResult<Option<Store>> {
        Ok(self.0.lock().unwrap().get(&id).cloned())
    }

    fn find_by_number(&self, store_number: &str) -> RepositoryResult<Option<Store>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .values()
            .find(|s| s.store_number == store_number)
            .cloned())
    }

    fn list(&self) -> RepositoryResult<Vec<Store>> {
        Ok(self.0.lock().unwrap().values().cloned().collect())
    }

    fn insert(&self, store: Store) -> RepositoryResult<()> {
        self.add(store);
        Ok(())
    }

    fn update(&self, store: Store) -> RepositoryResult<()> {
        self.add(store);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingAlerts(Mutex<Vec<ReorderAlert>>);

impl RecordingAlerts {
    pub fn received(&self) -> Vec<ReorderAlert> {
        self.0.lock().unwrap().clone()
    }
}

impl AlertSink for RecordingAlerts {
    fn reorder_alert(&self, alert: &ReorderAlert) {
        self.0.lock().unwrap().push(alert.clone());
    }
}

/// A service wired to fakes, with one part (lead time 3) and one store.
pub struct Fixture {
    pub service: InventoryService,
    pub part: Part,
    pub store: Store,
    pub inventory: Arc<dyn InventoryRepository>,
    pub parts: Arc<MemoryParts>,
    pub stores: Arc<MemoryStores>,
    pub alerts: Arc<RecordingAlerts>,
}

impl Fixture {
    pub fn new(sales: StaticSales) -> Self {
        Self::with_inventory(
            part_with_lead_time(3),
            vec![store("5421")],
            Arc::new(MemoryInventory::default()),
            sales,
        )
    }

    pub fn with_inventory(
        part: Part,
        stores: Vec<Store>,
        inventory: Arc<dyn InventoryRepository>,
        sales: impl SalesQuery + 'static,
    ) -> Self {
        let parts = Arc::new(MemoryParts::default());
        parts.add(part.clone());
        let store_repo = Arc::new(MemoryStores::default());
        for s in &stores {
            store_repo.add(s.clone());
        }
        let alerts = Arc::new(RecordingAlerts::default());

        let service = InventoryService::new(
            inventory.clone(),
            parts.clone(),
            store_repo.clone(),
            Arc::new(sales),
            alerts.clone(),
        );

        Self {
            service,
            part,
            store: stores[0].clone(),
            inventory,
            parts,
            stores: store_repo,
            alerts,
        }
    }
}
