//! Inventory module: per-store stock levels and reorder planning.
//!
//! The reorder calculator is a pure function of recent sales, the part's
//! supplier lead time, and an injected `now`. Storage and the sales ledger are
//! reached only through the ports in [`ports`].

pub mod error;
pub mod ports;
pub mod record;
pub mod reorder;
pub mod service;

#[cfg(test)]
mod test_support;

pub use error::{InventoryError, InventoryResult};
pub use ports::{AlertSink, InventoryRepository, ReorderAlert, SalesQuery};
pub use record::{InventoryRecord, NewInventory};
pub use reorder::{
    compute_optimal_reorder_point, compute_optimal_reorder_quantity, SalesVelocity,
    MIN_REORDER_POINT, SAFETY_STOCK_DAYS, TARGET_COVERAGE_DAYS,
};
pub use service::{InventoryService, ReorderRefreshFailure, ReorderRefreshReport, SaleOutcome};
