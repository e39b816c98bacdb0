//! Reorder planning from recent sales velocity.
//!
//! Reorder point: weighted daily velocity over trailing 30/60/90-day windows
//! (weights 0.5/0.3/0.2), times supplier lead time plus a week of safety stock,
//! rounded up, never below [`MIN_REORDER_POINT`].
//!
//! Reorder quantity: 30 days of cover at the 30-day velocity, clamped to the
//! free shelf capacity.
//!
//! All arithmetic is exact. The weighted velocity is carried as a rational
//! over a common denominator and only the final division rounds up.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use partstock_catalog::Part;
use partstock_core::{RepositoryResult, StoreId};

use crate::ports::SalesQuery;
use crate::record::InventoryRecord;

/// Extra days of demand held on top of the supplier lead time.
pub const SAFETY_STOCK_DAYS: u32 = 7;

/// Floor for any computed reorder point.
pub const MIN_REORDER_POINT: u32 = 5;

/// Days of demand one reorder should cover.
pub const TARGET_COVERAGE_DAYS: u32 = 30;

/// Trailing windows: (length in days, weight in tenths).
const VELOCITY_WINDOWS: [(u32, u64); 3] = [(30, 5), (60, 3), (90, 2)];
const WEIGHT_SCALE: u64 = 10;
/// Least common multiple of the window lengths.
const WINDOW_LCM_DAYS: u64 = 180;

/// Window the reorder quantity is sized from.
const QUANTITY_WINDOW_DAYS: u32 = 30;

/// Units sold for one (part, store) over the three trailing windows.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SalesVelocity {
    pub sold_30: u64,
    pub sold_60: u64,
    pub sold_90: u64,
}

impl SalesVelocity {
    /// Query the three windows ending at `now` (each `[now - d, now)`).
    pub fn query<Q>(
        sales: &Q,
        part: &Part,
        store_id: StoreId,
        now: DateTime<Utc>,
    ) -> RepositoryResult<Self>
    where
        Q: SalesQuery + ?Sized,
    {
        let sold = |days: u32| {
            sales.total_quantity_sold(part.id, store_id, now - Duration::days(days.into()), now)
        };
        Ok(Self {
            sold_30: sold(VELOCITY_WINDOWS[0].0)?,
            sold_60: sold(VELOCITY_WINDOWS[1].0)?,
            sold_90: sold(VELOCITY_WINDOWS[2].0)?,
        })
    }

    fn totals(&self) -> [u64; 3] {
        [self.sold_30, self.sold_60, self.sold_90]
    }

    /// Weighted daily velocity scaled by `WEIGHT_SCALE * WINDOW_LCM_DAYS`.
    fn weighted_numerator(&self) -> u128 {
        self.totals()
            .iter()
            .zip(VELOCITY_WINDOWS)
            .map(|(&sold, (days, weight))| {
                u128::from(sold) * u128::from(weight) * u128::from(WINDOW_LCM_DAYS / u64::from(days))
            })
            .sum()
    }

    /// Reorder point for a supplier lead time of `lead_time_days`.
    pub fn reorder_point(&self, lead_time_days: u32) -> u32 {
        let coverage_days = u128::from(lead_time_days) + u128::from(SAFETY_STOCK_DAYS);
        let denominator = u128::from(WEIGHT_SCALE * WINDOW_LCM_DAYS);
        let raw = (self.weighted_numerator() * coverage_days).div_ceil(denominator);
        u32::try_from(raw).unwrap_or(u32::MAX).max(MIN_REORDER_POINT)
    }

    /// Units needed to cover [`TARGET_COVERAGE_DAYS`] at the 30-day velocity.
    pub fn target_order_quantity(&self) -> i64 {
        let units = (u128::from(self.sold_30) * u128::from(TARGET_COVERAGE_DAYS))
            .div_ceil(u128::from(QUANTITY_WINDOW_DAYS));
        i64::try_from(units).unwrap_or(i64::MAX)
    }
}

/// Recommended reorder point for `part` at `store_id`. Always at least
/// [`MIN_REORDER_POINT`]; a part with no sales history gets exactly that.
pub fn compute_optimal_reorder_point<Q>(
    part: &Part,
    store_id: StoreId,
    sales: &Q,
    now: DateTime<Utc>,
) -> RepositoryResult<u32>
where
    Q: SalesQuery + ?Sized,
{
    Ok(SalesVelocity::query(sales, part, store_id, now)?.reorder_point(part.lead_time_days()))
}

/// Recommended order size, bounded by free shelf capacity.
///
/// Zero or negative means the shelf is already full: do not order.
pub fn compute_optimal_reorder_quantity<Q>(
    part: &Part,
    store_id: StoreId,
    inventory: &InventoryRecord,
    sales: &Q,
    now: DateTime<Utc>,
) -> RepositoryResult<i64>
where
    Q: SalesQuery + ?Sized,
{
    let sold_30 = sales.total_quantity_sold(
        part.id,
        store_id,
        now - Duration::days(QUANTITY_WINDOW_DAYS.into()),
        now,
    )?;
    let velocity = SalesVelocity { sold_30, ..SalesVelocity::default() };
    Ok(velocity.target_order_quantity().min(inventory.headroom()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NewInventory;
    use crate::test_support::{fixed_now, part_with_lead_time, StaticSales};
    use partstock_core::InventoryId;
    use proptest::prelude::*;

    fn velocity(sold_30: u64, sold_60: u64, sold_90: u64) -> SalesVelocity {
        SalesVelocity { sold_30, sold_60, sold_90 }
    }

    fn shelf(part: &Part, store_id: StoreId, quantity: u32, max_stock_level: u32) -> InventoryRecord {
        let mut new = NewInventory::new(part.id, store_id);
        new.quantity = quantity;
        new.max_stock_level = max_stock_level;
        InventoryRecord::create(InventoryId::new(), new).unwrap()
    }

    #[test]
    fn weighted_velocity_drives_reorder_point() {
        // velocities 2.0, 1.5, 1.0 -> weighted 1.65 -> 16.5 over 10 days -> 17
        let part = part_with_lead_time(3);
        let store_id = StoreId::new();
        let sales = StaticSales::new(60, 90, 90);

        let rp = compute_optimal_reorder_point(&part, store_id, &sales, fixed_now()).unwrap();

        assert_eq!(rp, 17);
        assert_eq!(velocity(60, 90, 90).reorder_point(3), 17);
    }

    #[test]
    fn no_sales_history_floors_at_five() {
        let part = part_with_lead_time(7);
        let sales = StaticSales::new(0, 0, 0);
        assert_eq!(
            compute_optimal_reorder_point(&part, StoreId::new(), &sales, fixed_now()).unwrap(),
            MIN_REORDER_POINT
        );
    }

    #[test]
    fn windows_end_at_now_and_reach_back_30_60_90_days() {
        let part = part_with_lead_time(0);
        let store_id = StoreId::new();
        let sales = StaticSales::new(0, 0, 0);
        let now = fixed_now();

        compute_optimal_reorder_point(&part, store_id, &sales, now).unwrap();

        let calls = sales.calls();
        assert_eq!(calls.len(), 3);
        for (call, days) in calls.iter().zip([30, 60, 90]) {
            assert_eq!(call.part_id, part.id);
            assert_eq!(call.store_id, store_id);
            assert_eq!(call.end, now);
            assert_eq!(call.start, now - Duration::days(days));
        }
    }

    #[test]
    fn reorder_quantity_is_clamped_to_free_capacity() {
        // 30 sold in 30 days -> 1/day -> 30 wanted, only 20 fit
        let part = part_with_lead_time(7);
        let store_id = StoreId::new();
        let sales = StaticSales::new(30, 0, 0);
        let inventory = shelf(&part, store_id, 180, 200);

        let qty = compute_optimal_reorder_quantity(&part, store_id, &inventory, &sales, fixed_now()).unwrap();

        assert_eq!(qty, 20);
    }

    #[test]
    fn reorder_quantity_uses_only_the_30_day_window() {
        let part = part_with_lead_time(7);
        let store_id = StoreId::new();
        let sales = StaticSales::new(12, 500, 900);
        let inventory = shelf(&part, store_id, 0, 200);

        let qty = compute_optimal_reorder_quantity(&part, store_id, &inventory, &sales, fixed_now()).unwrap();

        assert_eq!(qty, 12);
        assert_eq!(sales.calls().len(), 1);
    }

    #[test]
    fn full_shelf_means_do_not_order() {
        let part = part_with_lead_time(7);
        let store_id = StoreId::new();
        let sales = StaticSales::new(90, 0, 0);

        let full = shelf(&part, store_id, 200, 200);
        let over = shelf(&part, store_id, 230, 200);

        assert_eq!(compute_optimal_reorder_quantity(&part, store_id, &full, &sales, fixed_now()).unwrap(), 0);
        assert_eq!(compute_optimal_reorder_quantity(&part, store_id, &over, &sales, fixed_now()).unwrap(), -30);
    }

    #[test]
    fn exact_arithmetic_does_not_round_up_whole_results() {
        // 0.3 * 10 is 3.0000000000000004 in binary floating point
        assert_eq!(velocity(0, 60, 0).reorder_point(3), MIN_REORDER_POINT);
        // 1.0 weighted over 14 days is exactly 14
        assert_eq!(velocity(30, 60, 90).reorder_point(7), 14);
        assert_eq!(velocity(7, 0, 0).target_order_quantity(), 7);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 1000,
            ..ProptestConfig::default()
        })]

        /// Property: result is the ceiling of the weighted formula, floored at 5.
        #[test]
        fn reorder_point_matches_formula(
            sold_30 in 0u64..100_000,
            sold_60 in 0u64..100_000,
            sold_90 in 0u64..100_000,
            lead in 0u32..365,
        ) {
            let rp = velocity(sold_30, sold_60, sold_90).reorder_point(lead);

            // Same formula with every term over 1800: s30/60 + s60/200 + s90/450.
            let numerator = (30 * sold_30 + 9 * sold_60 + 4 * sold_90) * u64::from(lead + 7);
            let exact = numerator.div_ceil(1800);
            prop_assert!(rp >= MIN_REORDER_POINT);
            prop_assert_eq!(u64::from(rp), exact.max(u64::from(MIN_REORDER_POINT)));

            let float = ((sold_30 as f64 / 30.0 * 0.5
                + sold_60 as f64 / 60.0 * 0.3
                + sold_90 as f64 / 90.0 * 0.2)
                * f64::from(lead + 7))
            .ceil() as u64;
            prop_assert!(exact.abs_diff(float) <= 1);
        }

        /// Property: zero demand gives the floor regardless of lead time.
        #[test]
        fn zero_demand_is_always_five(lead in 0u32..10_000) {
            prop_assert_eq!(SalesVelocity::default().reorder_point(lead), MIN_REORDER_POINT);
        }

        /// Property: quantity is min(30-day units, free capacity).
        #[test]
        fn reorder_quantity_matches_formula(
            sold_30 in 0u64..10_000,
            quantity in 0u32..1_000,
            max_stock_level in 0u32..1_000,
        ) {
            let part = part_with_lead_time(7);
            let store_id = StoreId::new();
            let sales = StaticSales::new(sold_30, 0, 0);
            let inventory = shelf(&part, store_id, quantity, max_stock_level);

            let qty = compute_optimal_reorder_quantity(&part, store_id, &inventory, &sales, fixed_now()).unwrap();

            let expected = (sold_30 as i64).min(i64::from(max_stock_level) - i64::from(quantity));
            prop_assert_eq!(qty, expected);
            if quantity == max_stock_level {
                prop_assert!(qty <= 0);
            }
        }
    }
}
