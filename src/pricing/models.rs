//! Rate catalog models for the pricing engine.
//!
//! These models use sqlx's FromRow derive for direct database
//! deserialization. The engine treats all of them as immutable reference
//! data: they are selected, never mutated.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Vehicle rate card from livery_vehicle
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Vehicle {
    pub vehicle_number: i32,
    pub label: String,
    pub vehicle_image: Option<String>,
    pub max_passengers: i32,
    pub max_luggage: i32,
    pub per_km: Decimal,
    pub per_hour: Decimal,
    pub min_hours: i32,
    pub min_distance: Decimal,
    pub min_rate: Decimal,
    pub is_active: bool,
}

/// Service classification from livery_service
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Service {
    pub service_number: i32,
    pub label: String,
    /// Hourly services bill by time; everything else bills by distance.
    pub is_hourly: bool,
    pub is_active: bool,
}

/// Configurable charge rule from livery_line_item
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LineItem {
    pub item_number: i32,
    pub label: String,
    pub description: Option<String>,
    /// Percentage items are computed against the base rate; flat items are
    /// charged as-is.
    pub is_percentage: bool,
    pub amount: Decimal,
    pub is_taxable: bool,
    pub is_active: bool,
    /// Optional scope tag restricting the item to one booking context.
    pub applies_to: Option<String>,
}

impl LineItem {
    /// Check if this item should be charged in the given booking context.
    ///
    /// Inactive items never apply; an empty scope tag means the item applies
    /// everywhere.
    pub fn applies_in(&self, context: &str) -> bool {
        if !self.is_active {
            return false;
        }
        match self.applies_to.as_deref() {
            None | Some("") => true,
            Some(scope) => scope == context,
        }
    }
}

/// Sales tax rate from livery_sales_tax
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SalesTax {
    pub tax_number: i32,
    pub tax_name: String,
    /// Rate in percentage points (13 means 13%).
    pub amount: Decimal,
    pub region: String,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn gratuity(applies_to: Option<&str>, is_active: bool) -> LineItem {
        LineItem {
            item_number: 2001,
            label: "Gratuity".to_string(),
            description: Some("Suggested gratuity (20%)".to_string()),
            is_percentage: true,
            amount: dec!(20),
            is_taxable: false,
            is_active,
            applies_to: applies_to.map(str::to_string),
        }
    }

    #[test]
    fn test_applies_in_unscoped_item() {
        assert!(gratuity(None, true).applies_in("booking"));
        assert!(gratuity(Some(""), true).applies_in("booking"));
    }

    #[test]
    fn test_applies_in_scope_match() {
        assert!(gratuity(Some("booking"), true).applies_in("booking"));
        assert!(!gratuity(Some("booking"), true).applies_in("charter"));
    }

    #[test]
    fn test_applies_in_inactive_item() {
        assert!(!gratuity(None, false).applies_in("booking"));
    }
}
