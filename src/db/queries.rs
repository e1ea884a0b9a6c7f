//! Database queries for quote persistence

use sqlx::types::Json;
use sqlx::PgPool;

use crate::error::{AppError, Result};
use crate::models::{NewQuote, Quote};

const QUOTE_COLUMNS: &str = r#"
    id, quote_number,
    first_name, last_name, email_address, phone_number,
    selected_hours, selected_passengers, is_round_trip,
    quote_subtotal, quote_tax_total, quote_total, combined_line_items,
    vehicle_number, vehicle_label, service_number, service_label,
    origin_place_id, origin_full_name, origin_lat, origin_lng,
    destination_place_id, destination_full_name, destination_lat, destination_lng,
    distance_text, duration_text,
    pickup_date, pickup_time, return_date, return_time,
    is_booked, created_at
"#;

/// Insert a computed quote; the quote number is assigned by the database.
pub async fn insert_quote(pool: &PgPool, quote: &NewQuote) -> Result<Quote> {
    let sql = format!(
        r#"
        INSERT INTO livery_quote (
            first_name, last_name, email_address, phone_number,
            selected_hours, selected_passengers, is_round_trip,
            quote_subtotal, quote_tax_total, quote_total, combined_line_items,
            vehicle_number, vehicle_label, service_number, service_label,
            origin_place_id, origin_full_name, origin_lat, origin_lng,
            destination_place_id, destination_full_name, destination_lat, destination_lng,
            distance_text, duration_text,
            pickup_date, pickup_time, return_date, return_time
        ) VALUES (
            $1, $2, $3, $4,
            $5, $6, $7,
            $8, $9, $10, $11,
            $12, $13, $14, $15,
            $16, $17, $18, $19,
            $20, $21, $22, $23,
            $24, $25,
            $26, $27, $28, $29
        )
        RETURNING {QUOTE_COLUMNS}
        "#
    );

    let inserted = sqlx::query_as::<_, Quote>(&sql)
        .bind(&quote.first_name)
        .bind(&quote.last_name)
        .bind(&quote.email_address)
        .bind(&quote.phone_number)
        .bind(quote.selected_hours)
        .bind(quote.selected_passengers)
        .bind(quote.is_round_trip)
        .bind(quote.quote_subtotal)
        .bind(quote.quote_tax_total)
        .bind(quote.quote_total)
        .bind(Json(&quote.combined_line_items))
        .bind(quote.vehicle_number)
        .bind(&quote.vehicle_label)
        .bind(quote.service_number)
        .bind(&quote.service_label)
        .bind(&quote.origin_place_id)
        .bind(&quote.origin_full_name)
        .bind(quote.origin_lat)
        .bind(quote.origin_lng)
        .bind(&quote.destination_place_id)
        .bind(&quote.destination_full_name)
        .bind(quote.destination_lat)
        .bind(quote.destination_lng)
        .bind(&quote.distance_text)
        .bind(&quote.duration_text)
        .bind(&quote.pickup_date)
        .bind(&quote.pickup_time)
        .bind(&quote.return_date)
        .bind(&quote.return_time)
        .fetch_one(pool)
        .await?;

    Ok(inserted)
}

/// Get a quote by its number
pub async fn get_quote(pool: &PgPool, quote_number: i32) -> Result<Quote> {
    let sql = format!(
        r#"
        SELECT {QUOTE_COLUMNS}
        FROM livery_quote
        WHERE quote_number = $1
        "#
    );

    sqlx::query_as::<_, Quote>(&sql)
        .bind(quote_number)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)
}

/// Get a quote by number only if it is still open: issued within the last
/// seven days and not yet booked.
pub async fn find_recent_unbooked(pool: &PgPool, quote_number: i32) -> Result<Option<Quote>> {
    let sql = format!(
        r#"
        SELECT {QUOTE_COLUMNS}
        FROM livery_quote
        WHERE quote_number = $1
          AND is_booked = false
          AND created_at >= now() - interval '7 days'
        "#
    );

    let quote = sqlx::query_as::<_, Quote>(&sql)
        .bind(quote_number)
        .fetch_optional(pool)
        .await?;

    Ok(quote)
}

/// Mark a quote as booked
pub async fn mark_booked(pool: &PgPool, quote_number: i32) -> Result<()> {
    let result = sqlx::query("UPDATE livery_quote SET is_booked = true WHERE quote_number = $1")
        .bind(quote_number)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
