use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use partstock_catalog::{Part, PartRepository, Store, StoreRepository};
use partstock_core::{ExpectedVersion, InventoryId, PartId, RepositoryError, StoreId};

use crate::error::{InventoryError, InventoryResult};
use crate::ports::{AlertSink, InventoryRepository, ReorderAlert, SalesQuery};
use crate::record::{InventoryRecord, NewInventory};
use crate::reorder::{compute_optimal_reorder_point, compute_optimal_reorder_quantity};

/// Attempts at a sale's read-modify-write before a version conflict is returned.
const SALE_WRITE_ATTEMPTS: usize = 3;

/// Result of applying a sale to stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaleOutcome {
    /// Stock was decremented.
    Applied {
        record: InventoryRecord,
        reorder_alert: Option<ReorderAlert>,
    },
    /// The (part, store) pair has no inventory record; nothing changed.
    Untracked,
}

impl SaleOutcome {
    pub fn is_tracked(&self) -> bool {
        matches!(self, SaleOutcome::Applied { .. })
    }
}

/// One record the reorder-point sweep could not refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReorderRefreshFailure {
    pub inventory_id: InventoryId,
    pub part_id: PartId,
    pub store_id: StoreId,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReorderRefreshReport {
    pub updated: usize,
    pub failures: Vec<ReorderRefreshFailure>,
}

/// Stock levels, the sale path, and reorder planning over injected ports.
#[derive(Clone)]
pub struct InventoryService {
    inventory: Arc<dyn InventoryRepository>,
    parts: Arc<dyn PartRepository>,
    stores: Arc<dyn StoreRepository>,
    sales: Arc<dyn SalesQuery>,
    alerts: Arc<dyn AlertSink>,
}

impl InventoryService {
    pub fn new(
        inventory: Arc<dyn InventoryRepository>,
        parts: Arc<dyn PartRepository>,
        stores: Arc<dyn StoreRepository>,
        sales: Arc<dyn SalesQuery>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            inventory,
            parts,
            stores,
            sales,
            alerts,
        }
    }

    pub fn list_all(&self) -> InventoryResult<Vec<InventoryRecord>> {
        Ok(self.inventory.list()?)
    }

    pub fn get(&self, id: InventoryId) -> InventoryResult<InventoryRecord> {
        self.inventory
            .get(id)?
            .filter(|r| !r.deleted)
            .ok_or(InventoryError::RecordNotFound)
    }

    pub fn by_part_and_store(
        &self,
        part_id: PartId,
        store_id: StoreId,
    ) -> InventoryResult<InventoryRecord> {
        self.inventory
            .find_by_part_and_store(part_id, store_id)?
            .filter(|r| !r.deleted)
            .ok_or(InventoryError::RecordNotFound)
    }

    pub fn by_store(&self, store_id: StoreId) -> InventoryResult<Vec<InventoryRecord>> {
        Ok(self.filtered(|r| r.store_id == store_id)?)
    }

    /// Records at or below their reorder point.
    pub fn needing_reorder(&self) -> InventoryResult<Vec<InventoryRecord>> {
        Ok(self.filtered(InventoryRecord::needs_reorder)?)
    }

    pub fn needing_reorder_for_store(
        &self,
        store_id: StoreId,
    ) -> InventoryResult<Vec<InventoryRecord>> {
        Ok(self.filtered(|r| r.store_id == store_id && r.needs_reorder())?)
    }

    /// Records under a fifth of their shelf capacity.
    pub fn low_stock(&self) -> InventoryResult<Vec<InventoryRecord>> {
        Ok(self.filtered(InventoryRecord::is_low_stock)?)
    }

    fn filtered(
        &self,
        keep: impl Fn(&InventoryRecord) -> bool,
    ) -> Result<Vec<InventoryRecord>, RepositoryError> {
        Ok(self.inventory.list()?.into_iter().filter(|r| keep(r)).collect())
    }

    /// Create the record for a (part, store) pair, or overwrite its levels.
    ///
    /// A soft-deleted record for the pair is revived. The part and store must
    /// both be live.
    pub fn upsert(&self, new: NewInventory) -> InventoryResult<InventoryRecord> {
        self.live_part(new.part_id)?;
        self.live_store(new.store_id)?;

        match self
            .inventory
            .find_by_part_and_store(new.part_id, new.store_id)?
        {
            Some(mut existing) => {
                let expected = ExpectedVersion::Exact(existing.version);
                existing.replace_levels(new)?;
                let saved = self.inventory.save(existing, expected)?;
                tracing::info!(inventory_id = %saved.id, quantity = saved.quantity, "inventory updated");
                Ok(saved)
            }
            None => {
                let record = InventoryRecord::create(InventoryId::new(), new)?;
                self.inventory.insert(record.clone())?;
                tracing::info!(
                    inventory_id = %record.id,
                    part_id = %record.part_id,
                    store_id = %record.store_id,
                    "inventory created"
                );
                Ok(record)
            }
        }
    }

    /// Soft delete.
    pub fn delete(&self, id: InventoryId) -> InventoryResult<()> {
        let mut record = self.get(id)?;
        let expected = ExpectedVersion::Exact(record.version);
        record.deleted = true;
        self.inventory.save(record, expected)?;
        tracing::info!(inventory_id = %id, "inventory deleted");
        Ok(())
    }

    /// Recommended reorder point for a record. Nothing is persisted.
    pub fn calculate_reorder_point(&self, id: InventoryId, now: DateTime<Utc>) -> InventoryResult<u32> {
        let record = self.get(id)?;
        let part = self.part(record.part_id)?;
        Ok(compute_optimal_reorder_point(
            &part,
            record.store_id,
            self.sales.as_ref(),
            now,
        )?)
    }

    /// Recommended order size for a record. Zero or negative means do not order.
    pub fn calculate_reorder_quantity(
        &self,
        id: InventoryId,
        now: DateTime<Utc>,
    ) -> InventoryResult<i64> {
        let record = self.get(id)?;
        let part = self.part(record.part_id)?;
        Ok(compute_optimal_reorder_quantity(
            &part,
            record.store_id,
            &record,
            self.sales.as_ref(),
            now,
        )?)
    }

    /// Recompute and persist the reorder point of every live record.
    ///
    /// Each record is refreshed independently; a failure is recorded in the
    /// report and the sweep moves on. Only failing to list the records aborts.
    pub fn update_all_reorder_points(
        &self,
        now: DateTime<Utc>,
    ) -> InventoryResult<ReorderRefreshReport> {
        let records = self.inventory.list()?;
        let mut report = ReorderRefreshReport::default();

        for record in records {
            let (inventory_id, part_id, store_id) = (record.id, record.part_id, record.store_id);
            match self.refresh_reorder_point(record, now) {
                Ok(saved) => {
                    tracing::info!(
                        inventory_id = %saved.id,
                        reorder_point = saved.reorder_point,
                        "reorder point updated"
                    );
                    report.updated += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        inventory_id = %inventory_id,
                        error = %err,
                        "reorder point refresh failed"
                    );
                    report.failures.push(ReorderRefreshFailure {
                        inventory_id,
                        part_id,
                        store_id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            updated = report.updated,
            failed = report.failures.len(),
            "reorder point sweep finished"
        );
        Ok(report)
    }

    fn refresh_reorder_point(
        &self,
        mut record: InventoryRecord,
        now: DateTime<Utc>,
    ) -> InventoryResult<InventoryRecord> {
        let part = self.part(record.part_id)?;
        self.store(record.store_id)?;
        let expected = ExpectedVersion::Exact(record.version);
        record.reorder_point =
            compute_optimal_reorder_point(&part, record.store_id, self.sales.as_ref(), now)?;
        Ok(self.inventory.save(record, expected)?)
    }

    /// Take `quantity` units of `part` off the shelf at `store`.
    ///
    /// Rejects with `InsufficientInventory` and leaves stock untouched when
    /// fewer units are on hand. Raises a reorder alert when the new quantity is
    /// at or below the record's reorder quantity.
    pub fn apply_sale(
        &self,
        part: &Part,
        store: &Store,
        quantity: u32,
    ) -> InventoryResult<SaleOutcome> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let Some(mut record) = self
                .inventory
                .find_by_part_and_store(part.id, store.id)?
                .filter(|r| !r.deleted)
            else {
                tracing::warn!(
                    sku = %part.sku,
                    store_number = %store.store_number,
                    quantity,
                    "sale for untracked part and store; inventory unchanged"
                );
                return Ok(SaleOutcome::Untracked);
            };

            let remaining = record.quantity.checked_sub(quantity).ok_or(
                InventoryError::InsufficientInventory {
                    requested: quantity,
                    available: record.quantity,
                },
            )?;

            let expected = ExpectedVersion::Exact(record.version);
            record.quantity = remaining;
            match self.inventory.save(record, expected) {
                Ok(saved) => return Ok(self.after_sale(part, store, quantity, saved)),
                Err(RepositoryError::Conflict(reason)) if attempt < SALE_WRITE_ATTEMPTS => {
                    tracing::debug!(sku = %part.sku, attempt, %reason, "sale write raced; retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn after_sale(
        &self,
        part: &Part,
        store: &Store,
        quantity: u32,
        record: InventoryRecord,
    ) -> SaleOutcome {
        tracing::info!(
            sku = %part.sku,
            store_number = %store.store_number,
            quantity,
            new_quantity = record.quantity,
            "sale applied to inventory"
        );

        let reorder_alert = (record.quantity <= record.reorder_quantity).then(|| ReorderAlert {
            inventory_id: record.id,
            part_id: part.id,
            store_id: store.id,
            sku: part.sku.clone(),
            store_number: store.store_number.clone(),
            quantity: record.quantity,
            reorder_point: record.reorder_point,
            reorder_quantity: record.reorder_quantity,
        });
        if let Some(alert) = &reorder_alert {
            tracing::warn!(
                sku = %alert.sku,
                store_number = %alert.store_number,
                quantity = alert.quantity,
                reorder_quantity = alert.reorder_quantity,
                "reorder alert"
            );
            self.alerts.reorder_alert(alert);
        }

        SaleOutcome::Applied {
            record,
            reorder_alert,
        }
    }

    fn part(&self, id: PartId) -> InventoryResult<Part> {
        self.parts.get(id)?.ok_or(InventoryError::UnknownPart(id))
    }

    fn store(&self, id: StoreId) -> InventoryResult<Store> {
        self.stores.get(id)?.ok_or(InventoryError::UnknownStore(id))
    }

    fn live_part(&self, id: PartId) -> InventoryResult<Part> {
        Some(self.part(id)?)
            .filter(|p| !p.deleted)
            .ok_or(InventoryError::UnknownPart(id))
    }

    fn live_store(&self, id: StoreId) -> InventoryResult<Store> {
        Some(self.store(id)?)
            .filter(|s| !s.deleted)
            .ok_or(InventoryError::UnknownStore(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        fixed_now, part_with_lead_time, store, ConflictingSaveInventory, FailingSaveInventory,
        Fixture, MemoryInventory, StaticSales, UnreadableSales,
    };

    fn stocked(fx: &Fixture, quantity: u32) -> InventoryRecord {
        let mut new = NewInventory::new(fx.part.id, fx.store.id);
        new.quantity = quantity;
        new.reorder_point = 10;
        new.reorder_quantity = 50;
        fx.service.upsert(new).unwrap()
    }

    #[test]
    fn sale_larger_than_stock_is_rejected_without_mutation() {
        let fx = Fixture::new(StaticSales::new(0, 0, 0));
        let record = stocked(&fx, 3);

        let err = fx.service.apply_sale(&fx.part, &fx.store, 5).unwrap_err();

        assert_eq!(
            err,
            InventoryError::InsufficientInventory {
                requested: 5,
                available: 3
            }
        );
        let after = fx.service.get(record.id).unwrap();
        assert_eq!(after.quantity, 3);
        assert_eq!(after.version, record.version);
        assert!(fx.alerts.received().is_empty());
    }

    #[test]
    fn sale_decrements_and_bumps_version() {
        let fx = Fixture::new(StaticSales::new(0, 0, 0));
        let record = stocked(&fx, 120);

        let outcome = fx.service.apply_sale(&fx.part, &fx.store, 20).unwrap();

        let SaleOutcome::Applied { record: saved, reorder_alert } = outcome else {
            panic!("expected sale to be applied");
        };
        assert_eq!(saved.quantity, 100);
        assert_eq!(saved.version, record.version + 1);
        assert_eq!(reorder_alert, None);
    }

    #[test]
    fn selling_the_last_unit_is_allowed() {
        let fx = Fixture::new(StaticSales::new(0, 0, 0));
        stocked(&fx, 4);

        let outcome = fx.service.apply_sale(&fx.part, &fx.store, 4).unwrap();

        assert!(matches!(outcome, SaleOutcome::Applied { ref record, .. } if record.quantity == 0));
    }

    #[test]
    fn alert_fires_against_reorder_quantity_not_reorder_point() {
        let fx = Fixture::new(StaticSales::new(0, 0, 0));
        // reorder point 10, reorder quantity 50: 45 is above the point but below the quantity
        stocked(&fx, 60);

        let outcome = fx.service.apply_sale(&fx.part, &fx.store, 15).unwrap();

        let SaleOutcome::Applied { record, reorder_alert } = outcome else {
            panic!("expected sale to be applied");
        };
        assert_eq!(record.quantity, 45);
        assert!(!record.needs_reorder());
        let alert = reorder_alert.expect("alert");
        assert_eq!(alert.quantity, 45);
        assert_eq!(alert.reorder_quantity, 50);
        assert_eq!(alert.sku, fx.part.sku);
        assert_eq!(fx.alerts.received(), vec![alert]);
    }

    #[test]
    fn alert_threshold_is_inclusive() {
        let fx = Fixture::new(StaticSales::new(0, 0, 0));
        stocked(&fx, 51);

        let first = fx.service.apply_sale(&fx.part, &fx.store, 0).unwrap();
        let second = fx.service.apply_sale(&fx.part, &fx.store, 1).unwrap();

        assert!(matches!(first, SaleOutcome::Applied { reorder_alert: None, .. }));
        assert!(matches!(second, SaleOutcome::Applied { reorder_alert: Some(_), .. }));
    }

    #[test]
    fn sale_without_inventory_record_is_untracked() {
        let fx = Fixture::new(StaticSales::new(0, 0, 0));

        let outcome = fx.service.apply_sale(&fx.part, &fx.store, 2).unwrap();

        assert_eq!(outcome, SaleOutcome::Untracked);
        assert!(!outcome.is_tracked());
        assert!(fx.service.list_all().unwrap().is_empty());
    }

    #[test]
    fn deleted_record_does_not_take_sales() {
        let fx = Fixture::new(StaticSales::new(0, 0, 0));
        let record = stocked(&fx, 30);
        fx.service.delete(record.id).unwrap();

        assert_eq!(
            fx.service.apply_sale(&fx.part, &fx.store, 1).unwrap(),
            SaleOutcome::Untracked
        );
        assert_eq!(fx.service.get(record.id), Err(InventoryError::RecordNotFound));
    }

    #[test]
    fn upsert_overwrites_existing_pair() {
        let fx = Fixture::new(StaticSales::new(0, 0, 0));
        let first = stocked(&fx, 30);
        let second = stocked(&fx, 75);

        assert_eq!(first.id, second.id);
        assert_eq!(second.quantity, 75);
        assert_eq!(fx.service.list_all().unwrap().len(), 1);
    }

    #[test]
    fn sale_retries_after_a_version_conflict_and_decrements_once() {
        let part = part_with_lead_time(3);
        let shop = store("5421");
        let inner = MemoryInventory::default();
        let mut new = NewInventory::new(part.id, shop.id);
        new.quantity = 100;
        let record = InventoryRecord::create(InventoryId::new(), new).unwrap();
        inner.insert(record.clone()).unwrap();
        let inventory = Arc::new(ConflictingSaveInventory::new(inner, 1));
        let fx = Fixture::with_inventory(part, vec![shop], inventory.clone(), StaticSales::new(0, 0, 0));

        let outcome = fx.service.apply_sale(&fx.part, &fx.store, 7).unwrap();

        let SaleOutcome::Applied { record: saved, .. } = outcome else {
            panic!("expected sale to be applied");
        };
        assert_eq!(saved.quantity, 93);
        assert_eq!(saved.version, record.version + 1);
        assert_eq!(inventory.save_attempts(), 2);
        assert_eq!(fx.service.get(record.id).unwrap().quantity, 93);
    }

    #[test]
    fn sale_gives_up_after_repeated_conflicts_and_leaves_stock_alone() {
        let part = part_with_lead_time(3);
        let shop = store("5421");
        let inner = MemoryInventory::default();
        let mut new = NewInventory::new(part.id, shop.id);
        new.quantity = 100;
        let record = InventoryRecord::create(InventoryId::new(), new).unwrap();
        inner.insert(record.clone()).unwrap();
        let inventory = Arc::new(ConflictingSaveInventory::new(inner, usize::MAX));
        let fx = Fixture::with_inventory(part, vec![shop], inventory.clone(), StaticSales::new(0, 0, 0));

        let err = fx.service.apply_sale(&fx.part, &fx.store, 7).unwrap_err();

        assert!(matches!(err, InventoryError::Repository(RepositoryError::Conflict(_))));
        assert_eq!(inventory.save_attempts(), SALE_WRITE_ATTEMPTS);
        let after = fx.service.get(record.id).unwrap();
        assert_eq!(after.quantity, 100);
        assert_eq!(after.version, record.version);
        assert!(fx.alerts.received().is_empty());
    }

    #[test]
    fn upsert_rejects_deleted_part_and_store() {
        let fx = Fixture::new(StaticSales::new(0, 0, 0));
        let mut gone_part = fx.part.clone();
        gone_part.deleted = true;
        fx.parts.add(gone_part);

        let err = fx.service.upsert(NewInventory::new(fx.part.id, fx.store.id)).unwrap_err();
        assert_eq!(err, InventoryError::UnknownPart(fx.part.id));

        let live_part = part_with_lead_time(5);
        fx.parts.add(live_part.clone());
        let mut closed = fx.store.clone();
        closed.deleted = true;
        fx.stores.add(closed);

        let err = fx.service.upsert(NewInventory::new(live_part.id, fx.store.id)).unwrap_err();
        assert_eq!(err, InventoryError::UnknownStore(fx.store.id));
        assert!(fx.service.list_all().unwrap().is_empty());
    }

    #[test]
    fn upsert_rejects_unknown_part() {
        let fx = Fixture::new(StaticSales::new(0, 0, 0));
        let missing = PartId::new();

        let err = fx.service.upsert(NewInventory::new(missing, fx.store.id)).unwrap_err();

        assert_eq!(err, InventoryError::UnknownPart(missing));
    }

    #[test]
    fn reorder_and_low_stock_views() {
        let fx = Fixture::new(StaticSales::new(0, 0, 0));
        let other = store("5422");
        fx.stores.add(other.clone());

        let mut low = NewInventory::new(fx.part.id, fx.store.id);
        low.quantity = 8;
        fx.service.upsert(low).unwrap();
        let mut healthy = NewInventory::new(fx.part.id, other.id);
        healthy.quantity = 150;
        fx.service.upsert(healthy).unwrap();

        assert_eq!(fx.service.needing_reorder().unwrap().len(), 1);
        assert_eq!(fx.service.needing_reorder_for_store(other.id).unwrap().len(), 0);
        assert_eq!(fx.service.low_stock().unwrap().len(), 1);
        assert_eq!(fx.service.by_store(other.id).unwrap().len(), 1);
    }

    #[test]
    fn calculations_do_not_persist() {
        let fx = Fixture::new(StaticSales::new(60, 90, 90));
        let record = stocked(&fx, 180);

        let rp = fx.service.calculate_reorder_point(record.id, fixed_now()).unwrap();
        let qty = fx.service.calculate_reorder_quantity(record.id, fixed_now()).unwrap();

        // part lead time is 3 in the fixture
        assert_eq!(rp, 17);
        assert_eq!(qty, 20);
        assert_eq!(fx.service.get(record.id).unwrap(), record);
    }

    #[test]
    fn sweep_refreshes_every_record() {
        let fx = Fixture::new(StaticSales::new(60, 90, 90));
        let record = stocked(&fx, 40);

        let report = fx.service.update_all_reorder_points(fixed_now()).unwrap();

        assert_eq!(report.updated, 1);
        assert!(report.failures.is_empty());
        assert_eq!(fx.service.get(record.id).unwrap().reorder_point, 17);
    }

    #[test]
    fn sweep_isolates_a_failing_write() {
        let part = part_with_lead_time(3);
        let stores: Vec<Store> = ["5421", "5001", "5422"].into_iter().map(store).collect();
        let inner = MemoryInventory::default();
        let ids: Vec<InventoryId> = stores
            .iter()
            .map(|s| {
                let record =
                    InventoryRecord::create(InventoryId::new(), NewInventory::new(part.id, s.id))
                        .unwrap();
                inner.insert(record.clone()).unwrap();
                record.id
            })
            .collect();
        let inventory = Arc::new(FailingSaveInventory::new(inner, ids[1]));
        let fx = Fixture::with_inventory(
            part,
            stores,
            inventory.clone(),
            StaticSales::new(60, 90, 90),
        );

        let report = fx.service.update_all_reorder_points(fixed_now()).unwrap();

        assert_eq!(report.updated, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].inventory_id, ids[1]);
        assert_eq!(inventory.reorder_point(ids[0]), 17);
        assert_eq!(inventory.reorder_point(ids[1]), NewInventory::DEFAULT_REORDER_POINT);
        assert_eq!(inventory.reorder_point(ids[2]), 17);
    }

    #[test]
    fn sweep_reports_unreadable_sales_instead_of_flooring() {
        let fx = Fixture::with_inventory(
            part_with_lead_time(3),
            vec![store("5421")],
            Arc::new(MemoryInventory::default()),
            UnreadableSales,
        );
        let mut new = NewInventory::new(fx.part.id, fx.store.id);
        new.reorder_point = 42;
        let record = fx.service.upsert(new).unwrap();

        let report = fx.service.update_all_reorder_points(fixed_now()).unwrap();

        assert_eq!(report.updated, 0);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].inventory_id, record.id);
        assert_eq!(fx.service.get(record.id).unwrap().reorder_point, 42);
        assert!(matches!(
            fx.service.calculate_reorder_point(record.id, fixed_now()),
            Err(InventoryError::Repository(RepositoryError::Unavailable(_)))
        ));
    }

    #[test]
    fn sweep_reports_records_whose_part_is_gone() {
        let fx = Fixture::new(StaticSales::new(0, 0, 0));
        let orphan = InventoryRecord::create(
            InventoryId::new(),
            NewInventory::new(PartId::new(), fx.store.id),
        )
        .unwrap();
        fx.inventory.insert(orphan.clone()).unwrap();
        stocked(&fx, 10);

        let report = fx.service.update_all_reorder_points(fixed_now()).unwrap();

        assert_eq!(report.updated, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].part_id, orphan.part_id);
        assert!(report.failures[0].reason.contains("not found"));
    }
}
