//! Sales ledger module.
//!
//! Sales are immutable once recorded. The ledger answers range and
//! aggregation queries; it never mutates inventory itself.

pub mod ledger;
pub mod sale;

pub use ledger::{top_selling, PartSalesTotal, SaleLedger, DEFAULT_TOP_SELLING_LIMIT};
pub use sale::{NewSale, Sale};
