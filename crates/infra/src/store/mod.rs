//! In-memory storage backing every repository port.

pub mod record_store;

pub use record_store::RecordStore;
