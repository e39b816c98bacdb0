use core::str::FromStr;

use serde::{Deserialize, Serialize};

use partstock_core::{DomainError, DomainResult, Entity, Money, PartId};

/// Supplier lead time used when a part is created without one.
pub const DEFAULT_LEAD_TIME_DAYS: u32 = 7;

const MAX_SKU_LEN: usize = 50;
const MAX_DESCRIPTION_LEN: usize = 1000;
const MAX_VENDOR_FIELD_LEN: usize = 100;

/// Merchandising category of a part.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartCategory {
    Batteries,
    OilFluids,
    Filters,
    Brakes,
    Electrical,
    Tools,
    Accessories,
    EngineParts,
    Suspension,
    Lighting,
    Other,
}

impl PartCategory {
    pub const ALL: [PartCategory; 11] = [
        PartCategory::Batteries,
        PartCategory::OilFluids,
        PartCategory::Filters,
        PartCategory::Brakes,
        PartCategory::Electrical,
        PartCategory::Tools,
        PartCategory::Accessories,
        PartCategory::EngineParts,
        PartCategory::Suspension,
        PartCategory::Lighting,
        PartCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PartCategory::Batteries => "BATTERIES",
            PartCategory::OilFluids => "OIL_FLUIDS",
            PartCategory::Filters => "FILTERS",
            PartCategory::Brakes => "BRAKES",
            PartCategory::Electrical => "ELECTRICAL",
            PartCategory::Tools => "TOOLS",
            PartCategory::Accessories => "ACCESSORIES",
            PartCategory::EngineParts => "ENGINE_PARTS",
            PartCategory::Suspension => "SUSPENSION",
            PartCategory::Lighting => "LIGHTING",
            PartCategory::Other => "OTHER",
        }
    }
}

impl core::fmt::Display for PartCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartCategory {
    type Err = DomainError;

    /// Case-insensitive; accepts the wire names (`OIL_FLUIDS`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        PartCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| DomainError::validation(format!("unknown part category '{s}'")))
    }
}

/// A sellable auto part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: PartCategory,
    /// Unit cost to the chain.
    pub cost: Money,
    /// Unit shelf price. Expected to exceed `cost`; not enforced.
    pub price: Money,
    pub manufacturer: Option<String>,
    pub supplier_name: Option<String>,
    pub supplier_lead_time_days: u32,
    #[serde(default)]
    pub deleted: bool,
}

/// Input for creating a part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPart {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: PartCategory,
    pub cost: Money,
    pub price: Money,
    pub manufacturer: Option<String>,
    pub supplier_name: Option<String>,
    pub supplier_lead_time_days: Option<u32>,
}

/// Replacement values for the mutable fields of a part. The SKU never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartUpdate {
    pub name: String,
    pub description: Option<String>,
    pub category: PartCategory,
    pub cost: Money,
    pub price: Money,
    pub manufacturer: Option<String>,
    pub supplier_name: Option<String>,
    pub supplier_lead_time_days: Option<u32>,
}

impl Part {
    pub fn create(id: PartId, new: NewPart) -> DomainResult<Self> {
        let sku = new.sku.trim().to_string();
        if sku.is_empty() {
            return Err(DomainError::validation("sku cannot be empty"));
        }
        if sku.len() > MAX_SKU_LEN {
            return Err(DomainError::validation(format!(
                "sku cannot exceed {MAX_SKU_LEN} characters"
            )));
        }

        let mut part = Self {
            id,
            sku,
            name: String::new(),
            description: None,
            category: new.category,
            cost: Money::ZERO,
            price: Money::ZERO,
            manufacturer: None,
            supplier_name: None,
            supplier_lead_time_days: DEFAULT_LEAD_TIME_DAYS,
            deleted: false,
        };
        part.apply_update(PartUpdate {
            name: new.name,
            description: new.description,
            category: new.category,
            cost: new.cost,
            price: new.price,
            manufacturer: new.manufacturer,
            supplier_name: new.supplier_name,
            supplier_lead_time_days: new.supplier_lead_time_days,
        })?;
        Ok(part)
    }

    /// Validate and overwrite every mutable field. Leaves `self` untouched on error.
    pub fn apply_update(&mut self, update: PartUpdate) -> DomainResult<()> {
        let name = update.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if !update.cost.is_positive() {
            return Err(DomainError::validation("cost must be positive"));
        }
        if !update.price.is_positive() {
            return Err(DomainError::validation("price must be positive"));
        }
        check_len("description", update.description.as_deref(), MAX_DESCRIPTION_LEN)?;
        check_len("manufacturer", update.manufacturer.as_deref(), MAX_VENDOR_FIELD_LEN)?;
        check_len("supplier_name", update.supplier_name.as_deref(), MAX_VENDOR_FIELD_LEN)?;

        if update.cost >= update.price {
            tracing::debug!(sku = %self.sku, "part priced at or below cost");
        }

        self.name = name;
        self.description = update.description;
        self.category = update.category;
        self.cost = update.cost;
        self.price = update.price;
        self.manufacturer = update.manufacturer;
        self.supplier_name = update.supplier_name;
        self.supplier_lead_time_days = update
            .supplier_lead_time_days
            .unwrap_or(DEFAULT_LEAD_TIME_DAYS);
        Ok(())
    }

    pub fn lead_time_days(&self) -> u32 {
        self.supplier_lead_time_days
    }

    /// Case-insensitive substring match on the part name.
    pub fn name_contains(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(&term.to_lowercase())
    }
}

impl Entity for Part {
    type Id = PartId;

    fn id(&self) -> PartId {
        self.id
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

fn check_len(field: &str, value: Option<&str>, max: usize) -> DomainResult<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(DomainError::validation(format!(
            "{field} cannot exceed {max} characters"
        ))),
        _ => Ok(()),
    }
}
