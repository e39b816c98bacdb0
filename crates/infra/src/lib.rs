//! Infrastructure layer: in-memory storage, configuration, demo data.

pub mod config;
pub mod repositories;
pub mod seed;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use repositories::{
    InMemoryInventoryRepository, InMemoryPartRepository, InMemorySaleLedger,
    InMemoryStoreRepository, InMemoryUserRepository,
};
pub use seed::{seed_demo_data, SeedError, SeedSummary, SeedTargets, DEFAULT_SEED};
pub use store::RecordStore;
