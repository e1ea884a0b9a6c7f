//! Persisted quote models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::pricing::RowTotal;

/// Quote record from livery_quote
#[derive(Debug, Clone, FromRow)]
pub struct Quote {
    pub id: Uuid,
    pub quote_number: i32,

    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub phone_number: String,

    pub selected_hours: i32,
    pub selected_passengers: i32,
    pub is_round_trip: bool,

    pub quote_subtotal: Decimal,
    pub quote_tax_total: Decimal,
    pub quote_total: Decimal,
    /// Extended row view stored as JSONB, exactly as the engine emitted it.
    pub combined_line_items: serde_json::Value,

    pub vehicle_number: i32,
    pub vehicle_label: String,
    pub service_number: i32,
    pub service_label: String,

    pub origin_place_id: String,
    pub origin_full_name: String,
    pub origin_lat: Option<f64>,
    pub origin_lng: Option<f64>,
    pub destination_place_id: String,
    pub destination_full_name: String,
    pub destination_lat: Option<f64>,
    pub destination_lng: Option<f64>,

    /// First-leg renderings from the directions provider, stored untouched.
    pub distance_text: Option<String>,
    pub duration_text: Option<String>,

    pub pickup_date: Option<String>,
    pub pickup_time: Option<String>,
    pub return_date: Option<String>,
    pub return_time: Option<String>,

    pub is_booked: bool,
    pub created_at: DateTime<Utc>,
}

impl Quote {
    /// Parse the stored row view back into typed rows.
    pub fn parse_line_items(&self) -> Option<Vec<RowTotal>> {
        serde_json::from_value(self.combined_line_items.clone()).ok()
    }
}

/// Insert payload for a freshly computed quote.
///
/// The quote number and timestamps are assigned by the database.
#[derive(Debug, Clone, Serialize)]
pub struct NewQuote {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub phone_number: String,

    pub selected_hours: i32,
    pub selected_passengers: i32,
    pub is_round_trip: bool,

    pub quote_subtotal: Decimal,
    pub quote_tax_total: Decimal,
    pub quote_total: Decimal,
    pub combined_line_items: Vec<RowTotal>,

    pub vehicle_number: i32,
    pub vehicle_label: String,
    pub service_number: i32,
    pub service_label: String,

    pub origin_place_id: String,
    pub origin_full_name: String,
    pub origin_lat: Option<f64>,
    pub origin_lng: Option<f64>,
    pub destination_place_id: String,
    pub destination_full_name: String,
    pub destination_lat: Option<f64>,
    pub destination_lng: Option<f64>,

    pub distance_text: Option<String>,
    pub duration_text: Option<String>,

    pub pickup_date: Option<String>,
    pub pickup_time: Option<String>,
    pub return_date: Option<String>,
    pub return_time: Option<String>,
}
