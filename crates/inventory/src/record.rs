use serde::{Deserialize, Serialize};

use partstock_core::{DomainError, DomainResult, Entity, InventoryId, PartId, StoreId};

const MAX_LOCATION_LEN: usize = 50;

/// Stock of one part at one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: InventoryId,
    pub part_id: PartId,
    pub store_id: StoreId,
    /// Units on hand.
    pub quantity: u32,
    /// Restock when `quantity` falls to this level.
    pub reorder_point: u32,
    /// Units to order when restocking.
    pub reorder_quantity: u32,
    /// Shelf capacity.
    pub max_stock_level: u32,
    /// Aisle/bin, e.g. `C-3-7`.
    pub location: Option<String>,
    /// Bumped by the repository on every successful save.
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub deleted: bool,
}

/// Input for creating or replacing the stock levels of a (part, store) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInventory {
    pub part_id: PartId,
    pub store_id: StoreId,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default = "NewInventory::default_reorder_point")]
    pub reorder_point: u32,
    #[serde(default = "NewInventory::default_reorder_quantity")]
    pub reorder_quantity: u32,
    #[serde(default = "NewInventory::default_max_stock_level")]
    pub max_stock_level: u32,
    #[serde(default)]
    pub location: Option<String>,
}

impl NewInventory {
    pub const DEFAULT_REORDER_POINT: u32 = 10;
    pub const DEFAULT_REORDER_QUANTITY: u32 = 50;
    pub const DEFAULT_MAX_STOCK_LEVEL: u32 = 200;

    /// Empty shelf with default thresholds.
    pub fn new(part_id: PartId, store_id: StoreId) -> Self {
        Self {
            part_id,
            store_id,
            quantity: 0,
            reorder_point: Self::DEFAULT_REORDER_POINT,
            reorder_quantity: Self::DEFAULT_REORDER_QUANTITY,
            max_stock_level: Self::DEFAULT_MAX_STOCK_LEVEL,
            location: None,
        }
    }

    fn default_reorder_point() -> u32 {
        Self::DEFAULT_REORDER_POINT
    }

    fn default_reorder_quantity() -> u32 {
        Self::DEFAULT_REORDER_QUANTITY
    }

    fn default_max_stock_level() -> u32 {
        Self::DEFAULT_MAX_STOCK_LEVEL
    }
}

impl InventoryRecord {
    pub fn create(id: InventoryId, new: NewInventory) -> DomainResult<Self> {
        let mut record = Self {
            id,
            part_id: new.part_id,
            store_id: new.store_id,
            quantity: 0,
            reorder_point: 0,
            reorder_quantity: 0,
            max_stock_level: 0,
            location: None,
            version: 0,
            deleted: false,
        };
        record.replace_levels(new)?;
        Ok(record)
    }

    /// Overwrite the stock levels. The (part, store) pair is fixed for the
    /// life of the record.
    pub fn replace_levels(&mut self, new: NewInventory) -> DomainResult<()> {
        if new.part_id != self.part_id || new.store_id != self.store_id {
            return Err(DomainError::invariant("inventory (part, store) pair cannot change"));
        }
        let location = new
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        if let Some(l) = &location {
            if l.chars().count() > MAX_LOCATION_LEN {
                return Err(DomainError::validation(format!(
                    "location cannot exceed {MAX_LOCATION_LEN} characters"
                )));
            }
        }
        if new.max_stock_level < new.quantity {
            tracing::debug!(
                part_id = %self.part_id,
                store_id = %self.store_id,
                quantity = new.quantity,
                max_stock_level = new.max_stock_level,
                "inventory stocked above shelf capacity"
            );
        }

        self.quantity = new.quantity;
        self.reorder_point = new.reorder_point;
        self.reorder_quantity = new.reorder_quantity;
        self.max_stock_level = new.max_stock_level;
        self.location = location;
        self.deleted = false;
        Ok(())
    }

    /// At or below the reorder point.
    pub fn needs_reorder(&self) -> bool {
        self.quantity <= self.reorder_point
    }

    /// Under 20% of shelf capacity.
    pub fn is_low_stock(&self) -> bool {
        u64::from(self.quantity) * 5 < u64::from(self.max_stock_level)
    }

    /// Free shelf capacity. Negative when overstocked.
    pub fn headroom(&self) -> i64 {
        i64::from(self.max_stock_level) - i64::from(self.quantity)
    }
}

impl Entity for InventoryRecord {
    type Id = InventoryId;

    fn id(&self) -> InventoryId {
        self.id
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }
}
