//! In-memory implementations of the domain repository ports.

pub mod catalog;
pub mod inventory;
pub mod sales;
pub mod users;

pub use catalog::{InMemoryPartRepository, InMemoryStoreRepository};
pub use inventory::InMemoryInventoryRepository;
pub use sales::InMemorySaleLedger;
pub use users::InMemoryUserRepository;
