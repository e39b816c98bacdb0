//! Catalog module: the parts a chain sells and the stores that sell them.
//!
//! Plain records plus validation and the repository ports the rest of the
//! system reads them through.

pub mod part;
pub mod repository;
pub mod service;
pub mod store;

pub use part::{NewPart, Part, PartCategory, PartUpdate, DEFAULT_LEAD_TIME_DAYS};
pub use repository::{PartRepository, StoreRepository};
pub use service::{CatalogError, CatalogResult, PartCatalog, StoreDirectory};
pub use store::{NewStore, Store, StoreType, StoreUpdate};
