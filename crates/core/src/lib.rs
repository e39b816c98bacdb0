//! `partstock-core` — shared building blocks for the inventory tracker.
//!
//! Identifiers, error types, and small value objects. No IO lives here.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;
pub mod version;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, RepositoryError, RepositoryResult};
pub use id::{InventoryId, PartId, SaleId, StoreId, UserId};
pub use money::Money;
pub use value_object::ValueObject;
pub use version::ExpectedVersion;
