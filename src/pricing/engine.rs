//! The quote pricing engine.
//!
//! One engine instance models one quote computation: the caller selects a
//! vehicle, a service, line items, and taxes, sets the route and hours, and
//! reads fully itemized totals back. Every derived value is recomputed from
//! current selections on read - there are no cached computed cells, so a
//! setter can never leave a stale total behind. The single asynchronous
//! step is distance resolution, which must be awaited before reading any
//! distance-dependent value.
//!
//! The engine never mutates the caller's catalog records and performs no
//! locking; concurrent quotes each get their own instance.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::calculators::{base_rate, combined_tax_rate, round_money, tax_on, PricingMode};
use super::directions::{DirectionsClient, DirectionsResponse, ProviderError};
use super::models::{LineItem, SalesTax, Service, Vehicle};

/// Fallback fuel surcharge, as a fraction of the base rate.
const FUEL_SURCHARGE_PCT: Decimal = dec!(0.08);

/// Fallback gratuity, as a fraction of the base rate.
const GRATUITY_PCT: Decimal = dec!(0.20);

pub const BASE_RATE_LABEL: &str = "Base Rate";
pub const FUEL_SURCHARGE_LABEL: &str = "Fuel Surcharge";
pub const GRATUITY_LABEL: &str = "Gratuity";
pub const AIRPORT_FEE_LABEL: &str = "GTAA Fee";
pub const TOTAL_TAX_LABEL: &str = "Total Tax";
pub const TOTAL_LABEL: &str = "Total";

/// One line of the itemized quote.
///
/// `source` links back to the configured line item; synthetic rows (base
/// rate, fallback fuel/gratuity, airport fee) carry `None`.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteRow {
    pub label: String,
    pub pre_tax_amount: Decimal,
    pub tax_amount: Decimal,
    pub is_taxable: bool,
    pub source: Option<LineItem>,
}

/// The `(label, tax, total)` row shape consumed by quote persistence and
/// notification collaborators. `total` is the pre-tax amount for item rows;
/// the final `Total` row carries the grand total instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowTotal {
    pub label: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
}

/// A named active tax rate, for display and diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct TaxRateView {
    pub name: String,
    pub rate: Decimal,
}

/// Diagnostics bundle of every public engine output.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteSnapshot {
    pub mode: PricingMode,
    pub distance_km: Decimal,
    pub hours: Decimal,
    pub base_rate: Decimal,
    pub sub_total: Decimal,
    pub tax_total: Decimal,
    pub total: Decimal,
    pub context: String,
    pub line_items: Vec<RowTotal>,
    pub line_items_with_totals: Vec<RowTotal>,
    pub active_tax_rates: Vec<TaxRateView>,
}

/// The pricing engine. See the module docs for the computation model.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    vehicle: Vehicle,
    service: Service,
    line_items: Vec<LineItem>,
    sales_taxes: Vec<SalesTax>,
    original_line_items: Vec<LineItem>,
    original_sales_taxes: Vec<SalesTax>,
    hours: Decimal,
    origin: String,
    destination: String,
    waypoints: Vec<String>,
    distance_km: Decimal,
    route_data: Option<DirectionsResponse>,
    context: String,
    airport_pickup_fee: Decimal,
}

impl PricingEngine {
    pub fn new(
        vehicle: Vehicle,
        service: Service,
        line_items: Vec<LineItem>,
        sales_taxes: Vec<SalesTax>,
    ) -> Self {
        Self {
            vehicle,
            service,
            original_line_items: line_items.clone(),
            original_sales_taxes: sales_taxes.clone(),
            line_items,
            sales_taxes,
            hours: Decimal::ZERO,
            origin: String::new(),
            destination: String::new(),
            waypoints: Vec::new(),
            distance_km: Decimal::ZERO,
            route_data: None,
            context: String::new(),
            airport_pickup_fee: Decimal::ZERO,
        }
    }

    /* ---------------------------------------------------------------
     * Selection setters. Each invalidates every derived value simply
     * because derived values are never stored.
     * --------------------------------------------------------------- */

    /// Set origin, destination, and ordered intermediate stops in one call.
    ///
    /// The resolved distance is unchanged until [`Self::update_distance`]
    /// is awaited.
    pub fn set_route(&mut self, origin: String, destination: String, waypoints: Vec<String>) {
        self.origin = origin;
        self.destination = destination;
        self.waypoints = waypoints;
    }

    /// Requested hours for hourly bookings; negative input is clamped to
    /// zero rather than rejected.
    pub fn set_hours(&mut self, hours: Decimal) {
        self.hours = hours.max(Decimal::ZERO);
    }

    pub fn set_vehicle(&mut self, vehicle: Vehicle) {
        self.vehicle = vehicle;
    }

    pub fn set_service(&mut self, service: Service) {
        self.service = service;
    }

    pub fn set_line_items(&mut self, items: Vec<LineItem>) {
        self.line_items = items;
    }

    pub fn set_taxes(&mut self, taxes: Vec<SalesTax>) {
        self.sales_taxes = taxes;
    }

    /// Booking context used to filter scoped line items.
    pub fn set_context(&mut self, context: String) {
        self.context = context;
    }

    /// Airport pickup fee; zero (the default) suppresses the fee row.
    /// Negative input is clamped to zero.
    pub fn set_airport_pickup_fee(&mut self, fee: Decimal) {
        self.airport_pickup_fee = fee.max(Decimal::ZERO);
    }

    /// Supply an externally resolved (or cached) distance directly, without
    /// contacting the provider.
    pub fn set_distance_km(&mut self, km: Decimal) {
        self.distance_km = km.max(Decimal::ZERO);
    }

    /// Resolve the current route to a distance through the provider.
    ///
    /// An incomplete route resolves to zero distance without a provider
    /// call. Must be awaited before distance-dependent reads; until then
    /// they reflect the previous distance.
    pub async fn update_distance(
        &mut self,
        client: &DirectionsClient,
    ) -> Result<(), ProviderError> {
        let resolved = client
            .resolve_distance(&self.origin, &self.destination, &self.waypoints)
            .await?;
        self.distance_km = resolved.distance_km;
        self.route_data = resolved.response;
        Ok(())
    }

    /// Restore the constructor's line item and tax selections and clear the
    /// trip inputs, keeping the vehicle and service selection.
    pub fn reset(&mut self) {
        self.origin.clear();
        self.destination.clear();
        self.waypoints.clear();
        self.hours = Decimal::ZERO;
        self.distance_km = Decimal::ZERO;
        self.route_data = None;
        self.line_items = self.original_line_items.clone();
        self.sales_taxes = self.original_sales_taxes.clone();
        self.context.clear();
        self.airport_pickup_fee = Decimal::ZERO;
    }

    /* ---------------------------------------------------------------
     * Derived values
     * --------------------------------------------------------------- */

    pub fn mode(&self) -> PricingMode {
        PricingMode::for_service(&self.service)
    }

    pub fn distance_km(&self) -> Decimal {
        self.distance_km
    }

    pub fn hours(&self) -> Decimal {
        self.hours
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn service(&self) -> &Service {
        &self.service
    }

    /// The validated provider payload from the last resolution, for
    /// persistence of leg text/coordinates by the surrounding application.
    pub fn route_data(&self) -> Option<&DirectionsResponse> {
        self.route_data.as_ref()
    }

    /// Foundational trip charge for the current mode, vehicle, hours, and
    /// distance.
    pub fn base_rate(&self) -> Decimal {
        base_rate(self.mode(), &self.vehicle, self.hours, self.distance_km)
    }

    pub fn active_taxes(&self) -> Vec<&SalesTax> {
        self.sales_taxes.iter().filter(|t| t.is_active).collect()
    }

    pub fn combined_tax_rate(&self) -> Decimal {
        combined_tax_rate(&self.sales_taxes)
    }

    /// Assemble the ordered chargeable rows.
    ///
    /// Order matters for display and audit: the synthetic base-rate row
    /// first, then configured items that pass the active/scope filter, then
    /// the fuel and gratuity fallbacks when no configured row already
    /// covers them (matched by case-insensitive label substring), then the
    /// airport fee row when a fee is set.
    pub fn rows(&self) -> Vec<QuoteRow> {
        let base = self.base_rate();
        let rate = self.combined_tax_rate();

        let mut rows = vec![QuoteRow {
            label: BASE_RATE_LABEL.to_string(),
            pre_tax_amount: base,
            tax_amount: tax_on(base, rate),
            is_taxable: true,
            source: None,
        }];

        for item in self.line_items.iter().filter(|i| i.applies_in(&self.context)) {
            let amount = if item.is_percentage {
                base * item.amount / dec!(100)
            } else {
                item.amount
            };
            let pre_tax = round_money(amount);
            let tax = if item.is_taxable {
                tax_on(pre_tax, rate)
            } else {
                Decimal::ZERO
            };
            rows.push(QuoteRow {
                label: item.label.clone(),
                pre_tax_amount: pre_tax,
                tax_amount: tax,
                is_taxable: item.is_taxable,
                source: Some(item.clone()),
            });
        }

        if !label_present(&rows, "fuel") {
            let pre_tax = round_money(base * FUEL_SURCHARGE_PCT);
            rows.push(QuoteRow {
                label: FUEL_SURCHARGE_LABEL.to_string(),
                pre_tax_amount: pre_tax,
                tax_amount: tax_on(pre_tax, rate),
                is_taxable: true,
                source: None,
            });
        }

        if !label_present(&rows, "gratuity") {
            rows.push(QuoteRow {
                label: GRATUITY_LABEL.to_string(),
                pre_tax_amount: round_money(base * GRATUITY_PCT),
                tax_amount: Decimal::ZERO,
                is_taxable: false,
                source: None,
            });
        }

        if self.airport_pickup_fee > Decimal::ZERO {
            let pre_tax = round_money(self.airport_pickup_fee);
            rows.push(QuoteRow {
                label: AIRPORT_FEE_LABEL.to_string(),
                pre_tax_amount: pre_tax,
                tax_amount: tax_on(pre_tax, rate),
                is_taxable: true,
                source: None,
            });
        }

        rows
    }

    /// Sum of all row pre-tax amounts, including synthetic/fallback rows.
    pub fn sub_total(&self) -> Decimal {
        round_money(
            self.rows()
                .iter()
                .fold(Decimal::ZERO, |acc, r| acc + r.pre_tax_amount),
        )
    }

    pub fn tax_total(&self) -> Decimal {
        round_money(
            self.rows()
                .iter()
                .fold(Decimal::ZERO, |acc, r| acc + r.tax_amount),
        )
    }

    pub fn total_amount(&self) -> Decimal {
        round_money(self.sub_total() + self.tax_total())
    }

    /// Minimal `(label, tax, total)` view mirroring each computed row.
    pub fn detailed_line_items(&self) -> Vec<RowTotal> {
        self.rows()
            .iter()
            .map(|r| RowTotal {
                label: r.label.clone(),
                tax: round_money(r.tax_amount),
                total: round_money(r.pre_tax_amount),
            })
            .collect()
    }

    /// Extended view for downstream persistence/notification consumers:
    /// the minimal rows, one row per active tax (its contribution
    /// reconstructed proportionally from the flattened total), a `Total
    /// Tax` row when more than one tax is active, and a final mandatory
    /// `Total` row.
    pub fn detailed_line_items_with_totals(&self) -> Vec<RowTotal> {
        let mut rows = self.detailed_line_items();
        let tax_total = self.tax_total();
        let combined = self.combined_tax_rate();
        let active = self.active_taxes();

        for tax in &active {
            // Guard against a zero combined rate; every contribution is
            // reported as zero in that case.
            let portion = if combined.is_zero() {
                Decimal::ZERO
            } else {
                tax.amount / combined
            };
            let amount = round_money(tax_total * portion);
            rows.push(RowTotal {
                label: tax.tax_name.clone(),
                tax: amount,
                total: amount,
            });
        }

        if active.len() > 1 {
            rows.push(RowTotal {
                label: TOTAL_TAX_LABEL.to_string(),
                tax: tax_total,
                total: tax_total,
            });
        }

        rows.push(RowTotal {
            label: TOTAL_LABEL.to_string(),
            tax: tax_total,
            total: self.total_amount(),
        });

        rows
    }

    /// Bundle every public output for diagnostics and logging.
    pub fn snapshot(&self) -> QuoteSnapshot {
        QuoteSnapshot {
            mode: self.mode(),
            distance_km: self.distance_km,
            hours: self.hours,
            base_rate: self.base_rate(),
            sub_total: self.sub_total(),
            tax_total: self.tax_total(),
            total: self.total_amount(),
            context: self.context.clone(),
            line_items: self.detailed_line_items(),
            line_items_with_totals: self.detailed_line_items_with_totals(),
            active_tax_rates: self
                .active_taxes()
                .iter()
                .map(|t| TaxRateView {
                    name: t.tax_name.clone(),
                    rate: t.amount,
                })
                .collect(),
        }
    }
}

fn label_present(rows: &[QuoteRow], needle: &str) -> bool {
    rows.iter()
        .any(|r| r.label.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sedan() -> Vehicle {
        Vehicle {
            vehicle_number: 1,
            label: "Executive Sedan".to_string(),
            vehicle_image: None,
            max_passengers: 3,
            max_luggage: 3,
            per_km: dec!(1.7),
            per_hour: dec!(85),
            min_hours: 2,
            min_distance: dec!(25),
            min_rate: dec!(170),
            is_active: true,
        }
    }

    fn suv() -> Vehicle {
        Vehicle {
            vehicle_number: 2,
            label: "Premium SUV".to_string(),
            vehicle_image: None,
            max_passengers: 5,
            max_luggage: 5,
            per_km: dec!(2.1),
            per_hour: dec!(110),
            min_hours: 2,
            min_distance: dec!(25),
            min_rate: dec!(220),
            is_active: true,
        }
    }

    fn hourly_service() -> Service {
        Service {
            service_number: 4,
            label: "Hourly / As Directed".to_string(),
            is_hourly: true,
            is_active: true,
        }
    }

    fn transfer_service() -> Service {
        Service {
            service_number: 1,
            label: "Point-to-Point".to_string(),
            is_hourly: false,
            is_active: true,
        }
    }

    fn hst() -> SalesTax {
        SalesTax {
            tax_number: 1,
            tax_name: "HST".to_string(),
            amount: dec!(13),
            region: "ON".to_string(),
            is_active: true,
        }
    }

    fn tax(number: i32, name: &str, amount: Decimal) -> SalesTax {
        SalesTax {
            tax_number: number,
            tax_name: name.to_string(),
            amount,
            region: "ON".to_string(),
            is_active: true,
        }
    }

    fn item(
        label: &str,
        is_percentage: bool,
        amount: Decimal,
        is_taxable: bool,
        applies_to: Option<&str>,
    ) -> LineItem {
        LineItem {
            item_number: 2000,
            label: label.to_string(),
            description: None,
            is_percentage,
            amount,
            is_taxable,
            is_active: true,
            applies_to: applies_to.map(str::to_string),
        }
    }

    fn hourly_engine() -> PricingEngine {
        let mut engine = PricingEngine::new(sedan(), hourly_service(), vec![], vec![hst()]);
        engine.set_hours(dec!(2));
        engine
    }

    fn row<'a>(rows: &'a [QuoteRow], label: &str) -> &'a QuoteRow {
        rows.iter()
            .find(|r| r.label == label)
            .unwrap_or_else(|| panic!("missing row {label}"))
    }

    // ==================== base rate tests ====================

    #[test]
    fn test_hourly_base_rate_floors_requested_hours() {
        let mut engine = hourly_engine();
        engine.set_hours(dec!(1));
        assert_eq!(engine.base_rate(), dec!(170.00));
    }

    #[test]
    fn test_distance_base_rate_with_overage() {
        let mut engine = PricingEngine::new(suv(), transfer_service(), vec![], vec![hst()]);
        engine.set_distance_km(dec!(40));
        assert_eq!(engine.base_rate(), dec!(141.50));
    }

    #[test]
    fn test_base_rate_recomputes_on_selection_change() {
        let mut engine = hourly_engine();
        assert_eq!(engine.base_rate(), dec!(170.00));
        engine.set_vehicle(suv());
        assert_eq!(engine.base_rate(), dec!(220.00));
        engine.set_service(transfer_service());
        // Distance mode now, zero distance: baseline-only charge
        assert_eq!(engine.base_rate(), dec!(110.00));
    }

    #[test]
    fn test_negative_hours_clamped() {
        let mut engine = hourly_engine();
        engine.set_hours(dec!(-5));
        assert_eq!(engine.hours(), Decimal::ZERO);
        assert_eq!(engine.base_rate(), dec!(170.00));
    }

    // ==================== row assembly tests ====================

    #[test]
    fn test_base_rate_row_always_first() {
        let engine = hourly_engine();
        let rows = engine.rows();
        assert_eq!(rows[0].label, BASE_RATE_LABEL);
        assert_eq!(rows[0].pre_tax_amount, dec!(170.00));
        assert_eq!(rows[0].tax_amount, dec!(22.10));
        assert!(rows[0].is_taxable);
        assert!(rows[0].source.is_none());
    }

    #[test]
    fn test_fallback_rows_synthesized() {
        let engine = hourly_engine();
        let rows = engine.rows();

        let fuel = row(&rows, FUEL_SURCHARGE_LABEL);
        assert_eq!(fuel.pre_tax_amount, dec!(13.60)); // 8% of 170
        assert_eq!(fuel.tax_amount, dec!(1.77));
        assert!(fuel.is_taxable);

        let gratuity = row(&rows, GRATUITY_LABEL);
        assert_eq!(gratuity.pre_tax_amount, dec!(34.00)); // 20% of 170
        assert_eq!(gratuity.tax_amount, Decimal::ZERO);
        assert!(!gratuity.is_taxable);
    }

    #[test]
    fn test_exactly_one_gratuity_row() {
        // However many other items are configured, a quote carries exactly
        // one gratuity row: the configured one when its label matches,
        // otherwise the synthesized fallback.
        let items = vec![
            item("Meet & Greet", false, dec!(25), true, None),
            item("Gratuity", true, dec!(20), false, None),
            item("Child Seat", false, dec!(15), false, None),
        ];
        let mut engine = PricingEngine::new(sedan(), hourly_service(), items, vec![hst()]);
        engine.set_hours(dec!(2));

        let rows = engine.rows();
        let gratuity_rows: Vec<_> = rows
            .iter()
            .filter(|r| r.label.to_lowercase().contains("gratuity"))
            .collect();
        assert_eq!(gratuity_rows.len(), 1);
        assert_eq!(gratuity_rows[0].pre_tax_amount, dec!(34.00));
        assert!(!gratuity_rows[0].is_taxable);
        assert!(gratuity_rows[0].source.is_some());
    }

    #[test]
    fn test_fallback_matches_label_case_insensitively() {
        let items = vec![item("FUEL levy", false, dec!(5), true, None)];
        let mut engine = PricingEngine::new(sedan(), hourly_service(), items, vec![hst()]);
        engine.set_hours(dec!(2));

        let rows = engine.rows();
        assert!(rows.iter().all(|r| r.label != FUEL_SURCHARGE_LABEL));
        assert_eq!(row(&rows, "FUEL levy").pre_tax_amount, dec!(5.00));
    }

    #[test]
    fn test_scoped_items_filtered_by_context() {
        let items = vec![
            item("Winery Tour Package", false, dec!(50), true, Some("charter")),
            item("Meet & Greet", false, dec!(25), true, None),
        ];
        let mut engine = PricingEngine::new(sedan(), hourly_service(), items, vec![hst()]);
        engine.set_hours(dec!(2));

        engine.set_context("booking".to_string());
        let labels: Vec<String> = engine.rows().iter().map(|r| r.label.clone()).collect();
        assert!(!labels.contains(&"Winery Tour Package".to_string()));
        assert!(labels.contains(&"Meet & Greet".to_string()));

        engine.set_context("charter".to_string());
        let labels: Vec<String> = engine.rows().iter().map(|r| r.label.clone()).collect();
        assert!(labels.contains(&"Winery Tour Package".to_string()));
    }

    #[test]
    fn test_inactive_items_excluded() {
        let mut inactive = item("Meet & Greet", false, dec!(25), true, None);
        inactive.is_active = false;
        let mut engine =
            PricingEngine::new(sedan(), hourly_service(), vec![inactive], vec![hst()]);
        engine.set_hours(dec!(2));
        assert!(engine.rows().iter().all(|r| r.label != "Meet & Greet"));
    }

    #[test]
    fn test_percentage_item_computed_from_base_rate() {
        let items = vec![item("Peak Season Surcharge", true, dec!(10), true, None)];
        let mut engine = PricingEngine::new(sedan(), hourly_service(), items, vec![hst()]);
        engine.set_hours(dec!(2));

        let rows = engine.rows();
        let surcharge = row(&rows, "Peak Season Surcharge");
        assert_eq!(surcharge.pre_tax_amount, dec!(17.00)); // 10% of 170
        assert_eq!(surcharge.tax_amount, dec!(2.21));
    }

    #[test]
    fn test_airport_fee_row_appears_and_disappears() {
        let mut engine = hourly_engine();
        engine.set_airport_pickup_fee(dec!(13.27));

        let rows = engine.rows();
        let fee_rows: Vec<_> = rows.iter().filter(|r| r.label == AIRPORT_FEE_LABEL).collect();
        assert_eq!(fee_rows.len(), 1);
        assert_eq!(fee_rows[0].pre_tax_amount, dec!(13.27));
        assert_eq!(fee_rows[0].tax_amount, dec!(1.73));
        assert!(fee_rows[0].is_taxable);

        engine.set_airport_pickup_fee(Decimal::ZERO);
        assert!(engine.rows().iter().all(|r| r.label != AIRPORT_FEE_LABEL));
    }

    #[test]
    fn test_negative_airport_fee_clamped() {
        let mut engine = hourly_engine();
        engine.set_airport_pickup_fee(dec!(-10));
        assert!(engine.rows().iter().all(|r| r.label != AIRPORT_FEE_LABEL));
    }

    // ==================== tax aggregation tests ====================

    #[test]
    fn test_taxes_sum_not_compound() {
        // 5% + 8% behaves as one flat 13% rate per taxable row
        let taxes = vec![tax(1, "GST", dec!(5)), tax(2, "PST", dec!(8))];
        let mut engine = PricingEngine::new(sedan(), hourly_service(), vec![], taxes);
        engine.set_hours(dec!(2));

        assert_eq!(engine.combined_tax_rate(), dec!(13));
        let rows = engine.rows();
        assert_eq!(row(&rows, BASE_RATE_LABEL).tax_amount, dec!(22.10));
    }

    #[test]
    fn test_inactive_tax_excluded_from_combined_rate() {
        let mut retired = tax(2, "Old levy", dec!(2));
        retired.is_active = false;
        let engine =
            PricingEngine::new(sedan(), hourly_service(), vec![], vec![hst(), retired]);
        assert_eq!(engine.combined_tax_rate(), dec!(13));
    }

    #[test]
    fn test_per_tax_reconstruction_proportional() {
        let taxes = vec![tax(1, "GST", dec!(5)), tax(2, "PST", dec!(8))];
        let mut engine = PricingEngine::new(sedan(), hourly_service(), vec![], taxes);
        engine.set_hours(dec!(2));

        // Rows: base 170.00 (tax 22.10), fuel 13.60 (tax 1.77),
        // gratuity 34.00 (no tax); tax total 23.87
        let rows = engine.detailed_line_items_with_totals();
        let gst = rows.iter().find(|r| r.label == "GST").unwrap();
        let pst = rows.iter().find(|r| r.label == "PST").unwrap();
        assert_eq!(gst.total, dec!(9.18)); // 23.87 * 5/13
        assert_eq!(pst.total, dec!(14.69)); // 23.87 * 8/13

        let total_tax = rows.iter().find(|r| r.label == TOTAL_TAX_LABEL).unwrap();
        assert_eq!(total_tax.total, dec!(23.87));
    }

    #[test]
    fn test_single_tax_has_no_total_tax_row() {
        let engine = hourly_engine();
        let rows = engine.detailed_line_items_with_totals();
        assert!(rows.iter().any(|r| r.label == "HST"));
        assert!(rows.iter().all(|r| r.label != TOTAL_TAX_LABEL));
        assert_eq!(rows.last().unwrap().label, TOTAL_LABEL);
    }

    #[test]
    fn test_zero_combined_rate_reports_zero_per_tax() {
        let engine =
            PricingEngine::new(sedan(), hourly_service(), vec![], vec![tax(1, "HST", dec!(0))]);
        let rows = engine.detailed_line_items_with_totals();
        let hst = rows.iter().find(|r| r.label == "HST").unwrap();
        assert_eq!(hst.total, Decimal::ZERO);
        assert_eq!(hst.tax, Decimal::ZERO);
    }

    // ==================== totals tests ====================

    #[test]
    fn test_totals_consistent() {
        let mut engine = hourly_engine();
        engine.set_airport_pickup_fee(dec!(13.27));

        let rows = engine.rows();
        let row_sum = rows
            .iter()
            .fold(Decimal::ZERO, |acc, r| acc + r.pre_tax_amount);
        assert_eq!(engine.sub_total(), row_sum);
        assert_eq!(
            engine.total_amount(),
            round_money(engine.sub_total() + engine.tax_total())
        );
    }

    #[test]
    fn test_worked_example_totals() {
        // base 170.00 + fuel 13.60 + gratuity 34.00 = 217.60
        // tax 22.10 + 1.77 = 23.87; grand total 241.47
        let engine = hourly_engine();
        assert_eq!(engine.sub_total(), dec!(217.60));
        assert_eq!(engine.tax_total(), dec!(23.87));
        assert_eq!(engine.total_amount(), dec!(241.47));
    }

    #[test]
    fn test_totals_idempotent() {
        let engine = hourly_engine();
        let first = (
            engine.sub_total(),
            engine.tax_total(),
            engine.total_amount(),
            engine.detailed_line_items_with_totals(),
        );
        let second = (
            engine.sub_total(),
            engine.tax_total(),
            engine.total_amount(),
            engine.detailed_line_items_with_totals(),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_extended_view_final_row() {
        let engine = hourly_engine();
        let rows = engine.detailed_line_items_with_totals();
        let total = rows.last().unwrap();
        assert_eq!(total.label, TOTAL_LABEL);
        assert_eq!(total.tax, dec!(23.87));
        assert_eq!(total.total, dec!(241.47));
    }

    #[test]
    fn test_minimal_view_mirrors_rows() {
        let engine = hourly_engine();
        let rows = engine.rows();
        let view = engine.detailed_line_items();
        assert_eq!(rows.len(), view.len());
        for (computed, minimal) in rows.iter().zip(view.iter()) {
            assert_eq!(computed.label, minimal.label);
            assert_eq!(computed.pre_tax_amount, minimal.total);
            assert_eq!(computed.tax_amount, minimal.tax);
        }
    }

    // ==================== route / lifecycle tests ====================

    #[tokio::test]
    async fn test_incomplete_route_yields_baseline_only_quote() {
        let client = DirectionsClient::new("test-key".to_string()).unwrap();
        let mut engine = PricingEngine::new(suv(), transfer_service(), vec![], vec![hst()]);

        engine.set_route(String::new(), "place-b".to_string(), vec![]);
        engine.update_distance(&client).await.unwrap();

        assert_eq!(engine.distance_km(), Decimal::ZERO);
        assert!(engine.route_data().is_none());
        // Distance mode with zero distance charges the baseline only
        assert_eq!(engine.base_rate(), dec!(110.00));
    }

    #[test]
    fn test_reset_restores_constructor_selections() {
        let items = vec![item("Meet & Greet", false, dec!(25), true, None)];
        let mut engine =
            PricingEngine::new(sedan(), hourly_service(), items.clone(), vec![hst()]);
        engine.set_hours(dec!(3));
        engine.set_context("booking".to_string());
        engine.set_airport_pickup_fee(dec!(13.27));
        engine.set_line_items(vec![]);
        engine.set_taxes(vec![]);

        engine.reset();

        assert_eq!(engine.hours(), Decimal::ZERO);
        assert_eq!(engine.context(), "");
        assert_eq!(engine.combined_tax_rate(), dec!(13));
        assert!(engine.rows().iter().any(|r| r.label == "Meet & Greet"));
        assert!(engine.rows().iter().all(|r| r.label != AIRPORT_FEE_LABEL));
    }

    #[test]
    fn test_snapshot_bundles_outputs() {
        let mut engine = hourly_engine();
        engine.set_context("booking".to_string());
        let snapshot = engine.snapshot();

        assert_eq!(snapshot.mode, PricingMode::Hourly);
        assert_eq!(snapshot.base_rate, dec!(170.00));
        assert_eq!(snapshot.sub_total, dec!(217.60));
        assert_eq!(snapshot.total, dec!(241.47));
        assert_eq!(snapshot.context, "booking");
        assert_eq!(snapshot.active_tax_rates.len(), 1);
        assert_eq!(snapshot.active_tax_rates[0].rate, dec!(13));
        assert_eq!(
            snapshot.line_items.len() + 2, // one HST row + Total row
            snapshot.line_items_with_totals.len()
        );
    }
}
