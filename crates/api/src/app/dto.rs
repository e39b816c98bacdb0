use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use partstock_core::{InventoryId, PartId, StoreId};
use partstock_inventory::{InventoryRecord, ReorderAlert};
use partstock_sales::{PartSalesTotal, Sale};

// -------------------------
// Request DTOs
// -------------------------
//
// Part, store and inventory bodies deserialize straight into the domain
// inputs (`NewPart`, `PartUpdate`, `NewStore`, `StoreUpdate`, `NewInventory`).

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordSaleRequest {
    pub part_id: PartId,
    pub store_id: StoreId,
    pub quantity: u32,
    /// Defaults to the caller's username.
    pub sold_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NameSearchQuery {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TopSellingQuery {
    pub limit: Option<usize>,
}

/// Optional half-open window `[start, end)`; both bounds or neither.
#[derive(Debug, Deserialize)]
pub struct SalesRangeQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub message: &'static str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RecordSaleResponse {
    pub sale: Sale,
    pub inventory_tracked: bool,
    /// Stock left on the shelf, when the pair is tracked.
    pub remaining_quantity: Option<u32>,
    pub reorder_alert: Option<ReorderAlert>,
}

#[derive(Debug, Serialize)]
pub struct ReorderPointResponse {
    pub inventory_id: InventoryId,
    pub current_reorder_point: u32,
    pub recommended_reorder_point: u32,
}

/// `recommended_reorder_quantity` may be zero or negative when the shelf is full.
#[derive(Debug, Serialize)]
pub struct ReorderQuantityResponse {
    pub inventory_id: InventoryId,
    pub current_reorder_quantity: u32,
    pub recommended_reorder_quantity: i64,
}

impl ReorderPointResponse {
    pub fn new(record: &InventoryRecord, recommended: u32) -> Self {
        Self {
            inventory_id: record.id,
            current_reorder_point: record.reorder_point,
            recommended_reorder_point: recommended,
        }
    }
}

impl ReorderQuantityResponse {
    pub fn new(record: &InventoryRecord, recommended: i64) -> Self {
        Self {
            inventory_id: record.id,
            current_reorder_quantity: record.reorder_quantity,
            recommended_reorder_quantity: recommended,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TopSellingRow {
    pub part_id: PartId,
    /// `None` when the part has since been removed from storage.
    pub part_name: Option<String>,
    pub total_quantity: u64,
}

impl TopSellingRow {
    pub fn new(total: PartSalesTotal, part_name: Option<String>) -> Self {
        Self {
            part_id: total.part_id,
            part_name,
            total_quantity: total.total_quantity,
        }
    }
}
