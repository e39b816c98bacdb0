use chrono::{DateTime, Utc};

use partstock_core::{PartId, RepositoryResult, StoreId};
use partstock_inventory::SalesQuery;
use partstock_sales::{Sale, SaleLedger};

use crate::store::RecordStore;

/// Append-only sales ledger. Listings are ordered by sale date.
#[derive(Debug, Default)]
pub struct InMemorySaleLedger {
    sales: RecordStore<Sale>,
}

impl InMemorySaleLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(&self, pred: impl Fn(&Sale) -> bool) -> RepositoryResult<Vec<Sale>> {
        let mut sales = self.sales.list_where(pred)?;
        sales.sort_by_key(|s| (s.sale_date, s.id));
        Ok(sales)
    }
}

impl SaleLedger for InMemorySaleLedger {
    fn append(&self, sale: Sale) -> RepositoryResult<()> {
        self.sales.push(sale)
    }

    fn list(&self) -> RepositoryResult<Vec<Sale>> {
        self.sorted(|_| true)
    }

    fn by_store(&self, store_id: StoreId) -> RepositoryResult<Vec<Sale>> {
        self.sorted(|s| s.store_id == store_id)
    }

    fn by_part(&self, part_id: PartId) -> RepositoryResult<Vec<Sale>> {
        self.sorted(|s| s.part_id == part_id)
    }

    fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> RepositoryResult<Vec<Sale>> {
        self.sorted(|s| s.within(start, end))
    }
}

impl SalesQuery for InMemorySaleLedger {
    fn total_quantity_sold(
        &self,
        part_id: PartId,
        store_id: StoreId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepositoryResult<u64> {
        let map = self.sales.read()?;
        Ok(map
            .values()
            .filter(|s| s.part_id == part_id && s.store_id == store_id && s.within(start, end))
            .map(|s| u64::from(s.quantity_sold))
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use partstock_core::{Money, SaleId};
    use partstock_sales::NewSale;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
    }

    fn sale(part_id: PartId, store_id: StoreId, quantity: u32, at: DateTime<Utc>) -> Sale {
        Sale::record(
            SaleId::new(),
            NewSale {
                part_id,
                store_id,
                quantity,
                unit_price: Money::from_cents(1299),
                sale_date: at,
                sold_by: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn totals_respect_pair_and_half_open_window() {
        let ledger = InMemorySaleLedger::new();
        let (part, store) = (PartId::new(), StoreId::new());
        let start = now() - Duration::days(30);

        ledger.append(sale(part, store, 2, start)).unwrap();
        ledger.append(sale(part, store, 3, now() - Duration::seconds(1))).unwrap();
        ledger.append(sale(part, store, 7, now())).unwrap();
        ledger.append(sale(part, store, 11, start - Duration::seconds(1))).unwrap();
        ledger.append(sale(part, StoreId::new(), 13, now() - Duration::days(1))).unwrap();
        ledger.append(sale(PartId::new(), store, 17, now() - Duration::days(1))).unwrap();

        assert_eq!(ledger.total_quantity_sold(part, store, start, now()).unwrap(), 5);
    }

    #[test]
    fn no_sales_is_zero() {
        let ledger = InMemorySaleLedger::new();
        assert_eq!(
            ledger
                .total_quantity_sold(PartId::new(), StoreId::new(), now() - Duration::days(90), now())
                .unwrap(),
            0
        );
    }

    #[test]
    fn poisoned_ledger_is_an_error_not_zero_demand() {
        let ledger = InMemorySaleLedger::new();
        let (part, store) = (PartId::new(), StoreId::new());
        ledger.append(sale(part, store, 4, now() - Duration::days(1))).unwrap();

        let writer = std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = ledger.sales.write().unwrap();
                panic!("writer died holding the lock");
            })
            .join()
        });
        assert!(writer.is_err());

        let err = ledger
            .total_quantity_sold(part, store, now() - Duration::days(30), now())
            .unwrap_err();
        assert!(matches!(err, partstock_core::RepositoryError::Unavailable(_)));
    }

    #[test]
    fn listings_are_filtered_and_date_ordered() {
        let ledger = InMemorySaleLedger::new();
        let (part, store) = (PartId::new(), StoreId::new());
        ledger.append(sale(part, store, 1, now())).unwrap();
        ledger.append(sale(part, store, 1, now() - Duration::days(2))).unwrap();
        ledger.append(sale(PartId::new(), StoreId::new(), 1, now())).unwrap();

        let by_part = ledger.by_part(part).unwrap();
        assert_eq!(by_part.len(), 2);
        assert!(by_part[0].sale_date < by_part[1].sale_date);
        assert_eq!(ledger.by_store(store).unwrap().len(), 2);
        assert_eq!(ledger.list().unwrap().len(), 3);
        assert_eq!(
            ledger.between(now() - Duration::days(1), now() + Duration::days(1)).unwrap().len(),
            2
        );
    }
}
