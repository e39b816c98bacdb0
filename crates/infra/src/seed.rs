//! Demo data: a handful of Memphis-area stores, a small parts catalog, stock
//! for every (store, part) pair, 91 days of sales history and three logins.
//!
//! Generation is driven by a seeded RNG so two runs with the same seed and
//! clock produce the same data.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use partstock_auth::{hash_password, AuthError, NewUser, Role, User, UserRepository};
use partstock_catalog::{
    NewPart, NewStore, Part, PartCategory, PartRepository, Store, StoreRepository, StoreType,
};
use partstock_core::{
    DomainError, InventoryId, Money, PartId, RepositoryError, SaleId, StoreId, UserId,
};
use partstock_inventory::{InventoryRecord, InventoryRepository, NewInventory};
use partstock_sales::{NewSale, Sale, SaleLedger};

/// Seed used by the server when none is configured.
pub const DEFAULT_SEED: u64 = 5421;

const HISTORY_DAYS: i64 = 90;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Where seeded records are written.
pub struct SeedTargets<'a> {
    pub stores: &'a dyn StoreRepository,
    pub parts: &'a dyn PartRepository,
    pub inventory: &'a dyn InventoryRepository,
    pub sales: &'a dyn SaleLedger,
    pub users: &'a dyn UserRepository,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub stores: usize,
    pub parts: usize,
    pub inventory: usize,
    pub sales: usize,
    pub users: usize,
}

/// Load demo data unless stores already exist.
///
/// Returns `None` when skipped.
pub fn seed_demo_data(
    targets: &SeedTargets<'_>,
    now: DateTime<Utc>,
    seed: u64,
) -> Result<Option<SeedSummary>, SeedError> {
    if !targets.stores.list()?.is_empty() {
        tracing::info!("stores already present; skipping demo data");
        return Ok(None);
    }
    tracing::info!(seed, "loading demo data");
    let mut rng = StdRng::seed_from_u64(seed);

    let stores = create_stores(targets.stores)?;
    tracing::info!(count = stores.len(), "created stores");

    let parts = create_parts(targets.parts)?;
    tracing::info!(count = parts.len(), "created parts");

    let inventory = create_inventory(targets.inventory, &stores, &parts, &mut rng)?;
    tracing::info!(count = inventory, "created inventory records");

    let sales = create_sales_history(targets.sales, &stores, &parts, now, &mut rng)?;
    tracing::info!(count = sales, "created sales history");

    let users = create_users(targets.users)?;
    tracing::info!(count = users, "created users");

    let summary = SeedSummary {
        stores: stores.len(),
        parts: parts.len(),
        inventory,
        sales,
        users,
    };
    tracing::info!(?summary, "demo data loaded");
    Ok(Some(summary))
}

struct StoreSeed {
    number: &'static str,
    name: &'static str,
    address: &'static str,
    city: &'static str,
    state: &'static str,
    zip: &'static str,
    phone: &'static str,
    kind: StoreType,
}

const STORES: [StoreSeed; 5] = [
    StoreSeed {
        number: "5421",
        name: "AutoZone - Southaven",
        address: "7855 Southcrest Pkwy",
        city: "Southaven",
        state: "MS",
        zip: "38671",
        phone: "(662) 349-8600",
        kind: StoreType::Standard,
    },
    StoreSeed {
        number: "5001",
        name: "AutoZone - Memphis Hub",
        address: "3050 Austin Peay Hwy",
        city: "Memphis",
        state: "TN",
        zip: "38128",
        phone: "(901) 386-2100",
        kind: StoreType::Hub,
    },
    StoreSeed {
        number: "5422",
        name: "AutoZone - Germantown",
        address: "2145 W Poplar Ave",
        city: "Germantown",
        state: "TN",
        zip: "38138",
        phone: "(901) 754-8900",
        kind: StoreType::Standard,
    },
    StoreSeed {
        number: "5733",
        name: "AutoZone - Commercial Memphis",
        address: "4880 Summer Ave",
        city: "Memphis",
        state: "TN",
        zip: "38122",
        phone: "(901) 682-3400",
        kind: StoreType::Commercial,
    },
    StoreSeed {
        number: "5824",
        name: "AutoZone - Olive Branch",
        address: "6738 Goodman Rd",
        city: "Olive Branch",
        state: "MS",
        zip: "38654",
        phone: "(662) 890-1200",
        kind: StoreType::Standard,
    },
];

struct PartSeed {
    sku: &'static str,
    name: &'static str,
    description: &'static str,
    category: PartCategory,
    cost_cents: u64,
    price_cents: u64,
    manufacturer: &'static str,
    supplier: &'static str,
    lead_days: u32,
}

const PARTS: [PartSeed; 15] = [
    PartSeed {
        sku: "DU-48AGM",
        name: "Duralast Platinum AGM Battery Group 48",
        description: "800 CCA, 3-year warranty, AGM technology",
        category: PartCategory::Batteries,
        cost_cents: 8999,
        price_cents: 18999,
        manufacturer: "Duralast",
        supplier: "Clarios",
        lead_days: 3,
    },
    PartSeed {
        sku: "VL-65-850",
        name: "Valucraft Battery Group 65",
        description: "850 CCA, 2-year warranty",
        category: PartCategory::Batteries,
        cost_cents: 5999,
        price_cents: 12999,
        manufacturer: "Valucraft",
        supplier: "Clarios",
        lead_days: 3,
    },
    PartSeed {
        sku: "MOBIL1-5W30-5QT",
        name: "Mobil 1 Full Synthetic 5W-30 Motor Oil - 5 Quart",
        description: "Advanced full synthetic motor oil",
        category: PartCategory::OilFluids,
        cost_cents: 1899,
        price_cents: 3499,
        manufacturer: "Mobil",
        supplier: "ExxonMobil",
        lead_days: 5,
    },
    PartSeed {
        sku: "VAL-5W20-5QT",
        name: "Valucraft Conventional 5W-20 Motor Oil - 5 Quart",
        description: "Quality conventional motor oil",
        category: PartCategory::OilFluids,
        cost_cents: 999,
        price_cents: 1999,
        manufacturer: "Valucraft",
        supplier: "Phillips 66",
        lead_days: 7,
    },
    PartSeed {
        sku: "PRESTONE-AF2100",
        name: "Prestone 50/50 Prediluted Antifreeze - 1 Gallon",
        description: "Ready to use antifreeze coolant",
        category: PartCategory::OilFluids,
        cost_cents: 799,
        price_cents: 1499,
        manufacturer: "Prestone",
        supplier: "Prestone Products",
        lead_days: 5,
    },
    PartSeed {
        sku: "STP-S10575",
        name: "STP Extended Life Oil Filter",
        description: "10,000 mile protection",
        category: PartCategory::Filters,
        cost_cents: 399,
        price_cents: 899,
        manufacturer: "STP",
        supplier: "Spectrum Brands",
        lead_days: 7,
    },
    PartSeed {
        sku: "BOSCH-5430",
        name: "Bosch Workshop Engine Air Filter",
        description: "OE quality air filtration",
        category: PartCategory::Filters,
        cost_cents: 899,
        price_cents: 1699,
        manufacturer: "Bosch",
        supplier: "Bosch Auto Parts",
        lead_days: 5,
    },
    PartSeed {
        sku: "WIX-24977",
        name: "WIX Cabin Air Filter",
        description: "99% pollen filtration",
        category: PartCategory::Filters,
        cost_cents: 999,
        price_cents: 1999,
        manufacturer: "WIX",
        supplier: "WIX Filters",
        lead_days: 5,
    },
    PartSeed {
        sku: "DL-MKD1089",
        name: "Duralast Gold Brake Pad Set",
        description: "Ceramic brake pads with hardware",
        category: PartCategory::Brakes,
        cost_cents: 2999,
        price_cents: 6499,
        manufacturer: "Duralast",
        supplier: "Akebono",
        lead_days: 5,
    },
    PartSeed {
        sku: "DL-BR900842",
        name: "Duralast Brake Rotor",
        description: "Premium quality brake rotor",
        category: PartCategory::Brakes,
        cost_cents: 2499,
        price_cents: 5499,
        manufacturer: "Duralast",
        supplier: "Akebono",
        lead_days: 5,
    },
    PartSeed {
        sku: "DL-DLG100",
        name: "Duralast Gold Alternator",
        description: "140 amp, remanufactured, lifetime warranty",
        category: PartCategory::Electrical,
        cost_cents: 8999,
        price_cents: 19999,
        manufacturer: "Duralast",
        supplier: "Remy",
        lead_days: 3,
    },
    PartSeed {
        sku: "DL-17854",
        name: "Duralast Starter",
        description: "Remanufactured starter motor",
        category: PartCategory::Electrical,
        cost_cents: 5999,
        price_cents: 12999,
        manufacturer: "Duralast",
        supplier: "Remy",
        lead_days: 3,
    },
    PartSeed {
        sku: "RAIN-X-22",
        name: "Rain-X Latitude Water Repellency 22in Wiper Blade",
        description: "Premium beam wiper blade",
        category: PartCategory::Accessories,
        cost_cents: 1199,
        price_cents: 2499,
        manufacturer: "Rain-X",
        supplier: "ITW Global Brands",
        lead_days: 7,
    },
    PartSeed {
        sku: "NGK-3403",
        name: "NGK G-Power Platinum Spark Plug",
        description: "Platinum spark plug for performance",
        category: PartCategory::EngineParts,
        cost_cents: 349,
        price_cents: 799,
        manufacturer: "NGK",
        supplier: "NGK Spark Plugs",
        lead_days: 5,
    },
    PartSeed {
        sku: "SYLVANIA-H11",
        name: "Sylvania H11 SilverStar Ultra Headlight Bulb",
        description: "High performance halogen bulb",
        category: PartCategory::Lighting,
        cost_cents: 1999,
        price_cents: 3999,
        manufacturer: "Sylvania",
        supplier: "OSRAM",
        lead_days: 7,
    },
];

/// (username, password, role)
const USERS: [(&str, &str, Role); 3] = [
    ("admin", "admin123", Role::ADMIN),
    ("manager", "manager123", Role::MANAGER),
    ("employee", "employee123", Role::EMPLOYEE),
];

fn create_stores(repo: &dyn StoreRepository) -> Result<Vec<Store>, SeedError> {
    STORES
        .iter()
        .map(|s| {
            let store = Store::create(
                StoreId::new(),
                NewStore {
                    store_number: s.number.to_string(),
                    name: s.name.to_string(),
                    address: s.address.to_string(),
                    city: s.city.to_string(),
                    state: s.state.to_string(),
                    zip_code: s.zip.to_string(),
                    phone: Some(s.phone.to_string()),
                    store_type: s.kind,
                },
            )?;
            repo.insert(store.clone())?;
            Ok(store)
        })
        .collect()
}

fn create_parts(repo: &dyn PartRepository) -> Result<Vec<Part>, SeedError> {
    PARTS
        .iter()
        .map(|p| {
            let part = Part::create(
                PartId::new(),
                NewPart {
                    sku: p.sku.to_string(),
                    name: p.name.to_string(),
                    description: Some(p.description.to_string()),
                    category: p.category,
                    cost: Money::from_cents(p.cost_cents),
                    price: Money::from_cents(p.price_cents),
                    manufacturer: Some(p.manufacturer.to_string()),
                    supplier_name: Some(p.supplier.to_string()),
                    supplier_lead_time_days: Some(p.lead_days),
                },
            )?;
            repo.insert(part.clone())?;
            Ok(part)
        })
        .collect()
}

fn create_inventory(
    repo: &dyn InventoryRepository,
    stores: &[Store],
    parts: &[Part],
    rng: &mut StdRng,
) -> Result<usize, SeedError> {
    let mut count = 0;
    for store in stores {
        for part in parts {
            let reorder_quantity = reorder_quantity_for(part.category);
            let new = NewInventory {
                part_id: part.id,
                store_id: store.id,
                quantity: base_quantity(store.store_type, part.category) + rng.gen_range(0..20),
                reorder_point: reorder_point_for(part.category),
                reorder_quantity,
                max_stock_level: reorder_quantity * 4,
                location: Some(shelf_location(rng)),
            };
            repo.insert(InventoryRecord::create(InventoryId::new(), new)?)?;
            count += 1;
        }
    }
    Ok(count)
}

fn create_sales_history(
    ledger: &dyn SaleLedger,
    stores: &[Store],
    parts: &[Part],
    now: DateTime<Utc>,
    rng: &mut StdRng,
) -> Result<usize, SeedError> {
    let today = Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN));
    let mut count = 0;

    for days_ago in (0..=HISTORY_DAYS).rev() {
        let day = today - Duration::days(days_ago);
        for store in stores {
            let sales_today = rng.gen_range(2..=5);
            for _ in 0..sales_today {
                let part = &parts[rng.gen_range(0..parts.len())];
                let sale = Sale::record(
                    SaleId::new(),
                    NewSale {
                        part_id: part.id,
                        store_id: store.id,
                        quantity: sale_quantity_for(part.category, rng),
                        unit_price: part.price,
                        sale_date: day + Duration::hours(rng.gen_range(8..20)),
                        sold_by: Some(format!("Employee-{}", rng.gen_range(100..150))),
                    },
                )?;
                ledger.append(sale)?;
                count += 1;
            }
        }
    }
    Ok(count)
}

fn create_users(repo: &dyn UserRepository) -> Result<usize, SeedError> {
    for (username, password, role) in USERS {
        let user = User::create(
            UserId::new(),
            NewUser {
                username: username.to_string(),
                email: format!("{username}@partstock.local"),
                first_name: None,
                last_name: None,
                roles: vec![role],
            },
            hash_password(password)?,
        )?;
        repo.insert(user)?;
    }
    Ok(USERS.len())
}

/// Opening stock: larger stores and fast movers carry more.
fn base_quantity(store_type: StoreType, category: PartCategory) -> u32 {
    let base = match store_type {
        StoreType::Hub => 100,
        StoreType::Commercial => 50,
        StoreType::Standard => 30,
    };
    let percent = match category {
        PartCategory::Batteries | PartCategory::OilFluids | PartCategory::Filters => 100,
        PartCategory::Brakes => 80,
        PartCategory::Electrical | PartCategory::EngineParts => 60,
        _ => 50,
    };
    base * percent / 100
}

fn reorder_point_for(category: PartCategory) -> u32 {
    match category {
        PartCategory::Batteries | PartCategory::OilFluids => 15,
        PartCategory::Filters | PartCategory::Brakes => 20,
        PartCategory::Electrical => 8,
        PartCategory::EngineParts => 25,
        _ => 10,
    }
}

fn reorder_quantity_for(category: PartCategory) -> u32 {
    match category {
        PartCategory::Batteries => 30,
        PartCategory::OilFluids => 50,
        PartCategory::Filters => 40,
        PartCategory::Brakes => 30,
        PartCategory::Electrical => 15,
        PartCategory::EngineParts => 50,
        _ => 25,
    }
}

fn sale_quantity_for(category: PartCategory, rng: &mut StdRng) -> u32 {
    match category {
        PartCategory::OilFluids | PartCategory::Filters => rng.gen_range(1..=3),
        PartCategory::Batteries | PartCategory::Brakes => 1,
        // plugs go in sets
        PartCategory::EngineParts => rng.gen_range(1..=5),
        _ => rng.gen_range(1..=2),
    }
}

/// Aisle A-H, shelf 1-5, bin 1-10, e.g. `C-3-7`.
fn shelf_location(rng: &mut StdRng) -> String {
    let aisle = char::from(b'A' + rng.gen_range(0..8u8));
    format!("{aisle}-{}-{}", rng.gen_range(1..=5), rng.gen_range(1..=10))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{
        InMemoryInventoryRepository, InMemoryPartRepository, InMemorySaleLedger,
        InMemoryStoreRepository, InMemoryUserRepository,
    };
    use partstock_auth::verify_password;

    struct Repos {
        stores: InMemoryStoreRepository,
        parts: InMemoryPartRepository,
        inventory: InMemoryInventoryRepository,
        sales: InMemorySaleLedger,
        users: InMemoryUserRepository,
    }

    impl Repos {
        fn new() -> Self {
            Self {
                stores: InMemoryStoreRepository::new(),
                parts: InMemoryPartRepository::new(),
                inventory: InMemoryInventoryRepository::new(),
                sales: InMemorySaleLedger::new(),
                users: InMemoryUserRepository::new(),
            }
        }

        fn targets(&self) -> SeedTargets<'_> {
            SeedTargets {
                stores: &self.stores,
                parts: &self.parts,
                inventory: &self.inventory,
                sales: &self.sales,
                users: &self.users,
            }
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 15, 30, 0).unwrap()
    }

    #[test]
    fn seeds_every_collection() {
        let repos = Repos::new();

        let summary = seed_demo_data(&repos.targets(), now(), DEFAULT_SEED)
            .unwrap()
            .unwrap();

        assert_eq!(summary.stores, 5);
        assert_eq!(summary.parts, 15);
        assert_eq!(summary.inventory, 75);
        assert_eq!(summary.users, 3);
        // 91 days, 5 stores, 2..=5 sales each
        assert!((910..=2275).contains(&summary.sales));
        assert_eq!(repos.sales.list().unwrap().len(), summary.sales);
    }

    #[test]
    fn inventory_levels_follow_store_type_and_category() {
        let repos = Repos::new();
        seed_demo_data(&repos.targets(), now(), 7).unwrap();

        let hub = repos.stores.find_by_number("5001").unwrap().unwrap();
        let battery = repos.parts.find_by_sku("DU-48AGM").unwrap().unwrap();
        let record = repos
            .inventory
            .find_by_part_and_store(battery.id, hub.id)
            .unwrap()
            .unwrap();

        assert!((100..120).contains(&record.quantity));
        assert_eq!(record.reorder_point, 15);
        assert_eq!(record.reorder_quantity, 30);
        assert_eq!(record.max_stock_level, 120);
        let location = record.location.unwrap();
        assert_eq!(location.split('-').count(), 3);
    }

    #[test]
    fn sales_fall_inside_business_hours_of_the_history_window() {
        let repos = Repos::new();
        seed_demo_data(&repos.targets(), now(), 11).unwrap();

        let earliest = now() - Duration::days(HISTORY_DAYS + 1);
        for sale in repos.sales.list().unwrap() {
            assert!(sale.sale_date > earliest);
            let hour = sale.sale_date.format("%H").to_string().parse::<u32>().unwrap();
            assert!((8..20).contains(&hour));
            assert_eq!(sale.total_price, sale.unit_price.checked_times(sale.quantity_sold).unwrap());
        }
    }

    #[test]
    fn same_seed_same_shelves() {
        let a = Repos::new();
        let b = Repos::new();
        seed_demo_data(&a.targets(), now(), 99).unwrap();
        seed_demo_data(&b.targets(), now(), 99).unwrap();

        let shelf = |r: &Repos| -> Vec<(u32, Option<String>)> {
            r.inventory
                .list()
                .unwrap()
                .into_iter()
                .map(|i| (i.quantity, i.location))
                .collect()
        };
        let mut left = shelf(&a);
        let mut right = shelf(&b);
        left.sort();
        right.sort();
        assert_eq!(left, right);
    }

    #[test]
    fn second_run_is_skipped() {
        let repos = Repos::new();
        seed_demo_data(&repos.targets(), now(), 1).unwrap();
        assert_eq!(seed_demo_data(&repos.targets(), now(), 1).unwrap(), None);
        assert_eq!(repos.stores.list().unwrap().len(), 5);
    }

    #[test]
    fn seeded_users_can_sign_in() {
        let repos = Repos::new();
        seed_demo_data(&repos.targets(), now(), 1).unwrap();

        let manager = repos.users.find_by_username("manager").unwrap().unwrap();
        assert_eq!(manager.roles, vec![Role::MANAGER]);
        assert!(verify_password("manager123", &manager.password_hash));
    }
}
