//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no database access and no HTTP.
//! Everything here is a deterministic function of its inputs; the quote
//! engine recomputes these on every read instead of caching results.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::models::{SalesTax, Service, Vehicle};

/// Round a monetary amount to 2 decimal places using banker's rounding
/// (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is
/// exactly halfway between two possibilities. This reduces cumulative
/// rounding bias across the many per-row roundings a quote performs.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Round a distance to 3 decimal places (kilometers).
///
/// Distances keep one extra digit of precision so per-km multiplication
/// still lands on the right cent once [`round_money`] is applied.
pub fn round_km(km: Decimal) -> Decimal {
    km.round_dp_with_strategy(3, RoundingStrategy::MidpointNearestEven)
}

/// How the foundational trip charge is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingMode {
    Hourly,
    Distance,
}

impl PricingMode {
    /// The mode is chosen solely from the service's hourly flag.
    pub fn for_service(service: &Service) -> Self {
        if service.is_hourly {
            PricingMode::Hourly
        } else {
            PricingMode::Distance
        }
    }
}

/// Floor on the vehicle minimum-hours figure for hourly bookings.
const HOURLY_FLOOR: i32 = 2;

/// Floor on the vehicle minimum-distance figure for distance bookings (km).
const DISTANCE_FLOOR_KM: Decimal = dec!(25);

/// Compute the foundational trip charge before any add-on, fee, or tax.
///
/// Hourly: billable hours are the requested hours floored at the vehicle
/// minimum, which is itself floored at two hours.
///
/// Distance: a baseline distance of at least 25 km is charged at whichever
/// is larger - baseline km at the per-km rate, or one hour at the per-hour
/// rate - so a cheap hourly rate cannot undercut a long per-km minimum or
/// vice versa. Distance beyond the baseline is charged per km with no
/// markup.
pub fn base_rate(
    mode: PricingMode,
    vehicle: &Vehicle,
    hours: Decimal,
    distance_km: Decimal,
) -> Decimal {
    match mode {
        PricingMode::Hourly => {
            let min_hours = Decimal::from(vehicle.min_hours.max(HOURLY_FLOOR));
            let billable_hours = hours.max(min_hours);
            round_money(billable_hours * vehicle.per_hour)
        }
        PricingMode::Distance => {
            let base_km = vehicle.min_distance.max(DISTANCE_FLOOR_KM);
            let base_by_km = vehicle.per_km * base_km;
            let base_by_hour = vehicle.per_hour;
            let base = base_by_km.max(base_by_hour);
            let over_km = (distance_km - base_km).max(Decimal::ZERO);
            round_money(base + over_km * vehicle.per_km)
        }
    }
}

/// Sum of all active tax rates, in percentage points.
///
/// Two active 5% taxes combine to a single 10% effective rate applied once
/// per taxable row, never compounded.
pub fn combined_tax_rate(taxes: &[SalesTax]) -> Decimal {
    taxes
        .iter()
        .filter(|t| t.is_active)
        .fold(Decimal::ZERO, |acc, t| acc + t.amount)
}

/// Tax owed on a pre-tax amount at the given combined rate.
pub fn tax_on(pre_tax: Decimal, combined_rate: Decimal) -> Decimal {
    round_money(pre_tax * combined_rate / dec!(100))
}
