use serde::{Deserialize, Serialize};

use partstock_core::{DomainError, DomainResult, Entity, StoreId};

const MAX_STORE_NUMBER_LEN: usize = 10;
const MAX_CITY_LEN: usize = 100;
const MAX_PHONE_LEN: usize = 20;

/// Role a store plays in the distribution network.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreType {
    Hub,
    #[default]
    Standard,
    Commercial,
}

/// A retail location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub store_number: String,
    pub name: String,
    pub address: String,
    pub city: String,
    /// Two-letter state code.
    pub state: String,
    pub zip_code: String,
    pub phone: Option<String>,
    pub store_type: StoreType,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStore {
    pub store_number: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub store_type: StoreType,
}

/// Replacement values for the mutable fields of a store. The store number never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreUpdate {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub store_type: StoreType,
}

impl Store {
    pub fn create(id: StoreId, new: NewStore) -> DomainResult<Self> {
        let store_number = new.store_number.trim().to_string();
        if store_number.is_empty() {
            return Err(DomainError::validation("store_number cannot be empty"));
        }
        if store_number.len() > MAX_STORE_NUMBER_LEN {
            return Err(DomainError::validation(format!(
                "store_number cannot exceed {MAX_STORE_NUMBER_LEN} characters"
            )));
        }

        let mut store = Self {
            id,
            store_number,
            name: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            phone: None,
            store_type: new.store_type,
            deleted: false,
        };
        store.apply_update(StoreUpdate {
            name: new.name,
            address: new.address,
            city: new.city,
            state: new.state,
            zip_code: new.zip_code,
            phone: new.phone,
            store_type: new.store_type,
        })?;
        Ok(store)
    }

    /// Validate and overwrite every mutable field. Leaves `self` untouched on error.
    pub fn apply_update(&mut self, update: StoreUpdate) -> DomainResult<()> {
        let name = non_blank("name", &update.name)?;
        let address = non_blank("address", &update.address)?;
        let city = non_blank("city", &update.city)?;
        if city.chars().count() > MAX_CITY_LEN {
            return Err(DomainError::validation(format!(
                "city cannot exceed {MAX_CITY_LEN} characters"
            )));
        }
        let state = non_blank("state", &update.state)?;
        if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::validation("state must be a two-letter code"));
        }
        let zip_code = update.zip_code.trim().to_string();
        if !is_valid_zip(&zip_code) {
            return Err(DomainError::validation(
                "zip_code must look like 12345 or 12345-6789",
            ));
        }
        if let Some(phone) = &update.phone {
            if phone.chars().count() > MAX_PHONE_LEN {
                return Err(DomainError::validation(format!(
                    "phone cannot exceed {MAX_PHONE_LEN} characters"
                )));
            }
        }

        self.name = name;
        self.address = address;
        self.city = city;
        self.state = state.to_ascii_uppercase();
        self.zip_code = zip_code;
        self.phone = update.phone;
        self.store_type = update.store_type;
        Ok(())
    }
}

impl Entity for Store {
    type Id = StoreId;

    fn id(&self) -> StoreId {
        self.id
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

fn non_blank(field: &str, value: &str) -> DomainResult<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(v.to_string())
}

/// `^\d{5}(-\d{4})?$`
fn is_valid_zip(zip: &str) -> bool {
    let digits = |s: &str, n: usize| s.len() == n && s.bytes().all(|b| b.is_ascii_digit());
    match zip.split_once('-') {
        None => digits(zip, 5),
        Some((head, tail)) => digits(head, 5) && digits(tail, 4),
    }
}
