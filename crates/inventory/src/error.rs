use thiserror::Error;

use partstock_core::{DomainError, PartId, RepositoryError, StoreId};

pub type InventoryResult<T> = Result<T, InventoryError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// A sale asked for more units than are on hand. Nothing was changed.
    #[error("insufficient inventory for sale (requested {requested}, available {available})")]
    InsufficientInventory { requested: u32, available: u32 },

    #[error("inventory record not found")]
    RecordNotFound,

    #[error("part {0} not found")]
    UnknownPart(PartId),

    #[error("store {0} not found")]
    UnknownStore(StoreId),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
