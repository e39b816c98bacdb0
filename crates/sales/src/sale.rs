use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use partstock_core::{DomainError, DomainResult, Entity, Money, PartId, SaleId, StoreId};

const MAX_SOLD_BY_LEN: usize = 100;

/// One recorded sale of a part at a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub part_id: PartId,
    pub store_id: StoreId,
    pub quantity_sold: u32,
    pub unit_price: Money,
    /// `unit_price * quantity_sold`, fixed when the sale is recorded.
    pub total_price: Money,
    pub sale_date: DateTime<Utc>,
    /// Employee name or username.
    pub sold_by: Option<String>,
}

/// Input for recording a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSale {
    pub part_id: PartId,
    pub store_id: StoreId,
    pub quantity: u32,
    pub unit_price: Money,
    pub sale_date: DateTime<Utc>,
    pub sold_by: Option<String>,
}

impl Sale {
    pub fn record(id: SaleId, new: NewSale) -> DomainResult<Self> {
        if new.quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if !new.unit_price.is_positive() {
            return Err(DomainError::validation("unit_price must be positive"));
        }
        if let Some(sold_by) = &new.sold_by {
            if sold_by.chars().count() > MAX_SOLD_BY_LEN {
                return Err(DomainError::validation(format!(
                    "sold_by cannot exceed {MAX_SOLD_BY_LEN} characters"
                )));
            }
        }
        let total_price = new
            .unit_price
            .checked_times(new.quantity)
            .ok_or_else(|| DomainError::invariant("total price overflows"))?;

        Ok(Self {
            id,
            part_id: new.part_id,
            store_id: new.store_id,
            quantity_sold: new.quantity,
            unit_price: new.unit_price,
            total_price,
            sale_date: new.sale_date,
            sold_by: new.sold_by,
        })
    }

    /// True when the sale falls in the half-open window `[start, end)`.
    pub fn within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.sale_date >= start && self.sale_date < end
    }
}

impl Entity for Sale {
    type Id = SaleId;

    fn id(&self) -> SaleId {
        self.id
    }
}
