//! Ledger port and aggregations over recorded sales.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use partstock_core::{PartId, RepositoryResult, StoreId};

use crate::sale::Sale;

pub const DEFAULT_TOP_SELLING_LIMIT: usize = 10;

/// Append-only store of sales.
pub trait SaleLedger: Send + Sync {
    fn append(&self, sale: Sale) -> RepositoryResult<()>;
    fn list(&self) -> RepositoryResult<Vec<Sale>>;
    fn by_store(&self, store_id: StoreId) -> RepositoryResult<Vec<Sale>>;
    fn by_part(&self, part_id: PartId) -> RepositoryResult<Vec<Sale>>;
    /// Sales dated in `[start, end)`.
    fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> RepositoryResult<Vec<Sale>>;
}

impl<S> SaleLedger for Arc<S>
where
    S: SaleLedger + ?Sized,
{
    fn append(&self, sale: Sale) -> RepositoryResult<()> {
        (**self).append(sale)
    }

    fn list(&self) -> RepositoryResult<Vec<Sale>> {
        (**self).list()
    }

    fn by_store(&self, store_id: StoreId) -> RepositoryResult<Vec<Sale>> {
        (**self).by_store(store_id)
    }

    fn by_part(&self, part_id: PartId) -> RepositoryResult<Vec<Sale>> {
        (**self).by_part(part_id)
    }

    fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> RepositoryResult<Vec<Sale>> {
        (**self).between(start, end)
    }
}

/// Units sold of one part across the sales considered.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct PartSalesTotal {
    pub part_id: PartId,
    pub total_quantity: u64,
}

/// Best sellers by units, descending; ties ordered by part id.
pub fn top_selling<'a>(sales: impl IntoIterator<Item = &'a Sale>, limit: usize) -> Vec<PartSalesTotal> {
    let mut totals: HashMap<PartId, u64> = HashMap::new();
    for sale in sales {
        *totals.entry(sale.part_id).or_insert(0) += u64::from(sale.quantity_sold);
    }

    let mut rows: Vec<PartSalesTotal> = totals
        .into_iter()
        .map(|(part_id, total_quantity)| PartSalesTotal { part_id, total_quantity })
        .collect();
    rows.sort_by(|a, b| {
        b.total_quantity
            .cmp(&a.total_quantity)
            .then_with(|| a.part_id.cmp(&b.part_id))
    });
    rows.truncate(limit);
    rows
}
