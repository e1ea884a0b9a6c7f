//! Response DTOs for the quote API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Quote;

use super::engine::RowTotal;

/// A persisted quote as returned to the booking form and to downstream
/// collaborators (email/SMS/CRM pick the same shape up from storage).
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub quote_number: i32,
    pub selected_hours: i32,
    pub selected_passengers: i32,
    pub is_round_trip: bool,

    #[serde(with = "rust_decimal::serde::str")]
    pub quote_subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub quote_tax_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub quote_total: Decimal,

    /// Extended row view: item rows, per-tax rows, and the final total row.
    pub combined_line_items: Vec<RowTotal>,

    pub vehicle_label: String,
    pub service_label: String,

    pub origin_full_name: String,
    pub destination_full_name: String,
    pub distance_text: Option<String>,
    pub duration_text: Option<String>,

    pub is_booked: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        let combined_line_items = quote.parse_line_items().unwrap_or_default();
        Self {
            quote_number: quote.quote_number,
            selected_hours: quote.selected_hours,
            selected_passengers: quote.selected_passengers,
            is_round_trip: quote.is_round_trip,
            quote_subtotal: quote.quote_subtotal,
            quote_tax_total: quote.quote_tax_total,
            quote_total: quote.quote_total,
            combined_line_items,
            vehicle_label: quote.vehicle_label,
            service_label: quote.service_label,
            origin_full_name: quote.origin_full_name,
            destination_full_name: quote.destination_full_name,
            distance_text: quote.distance_text,
            duration_text: quote.duration_text,
            is_booked: quote.is_booked,
            created_at: quote.created_at,
        }
    }
}
