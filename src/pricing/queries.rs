//! Database queries for the rate catalog.
//!
//! Catalog records are read-only reference data for the pricing engine;
//! only active rows ever reach it.

use sqlx::PgPool;

use crate::error::AppError;

use super::models::{LineItem, SalesTax, Service, Vehicle};

/// Get all active vehicles, in catalog order
pub async fn get_active_vehicles(pool: &PgPool) -> Result<Vec<Vehicle>, AppError> {
    let vehicles = sqlx::query_as::<_, Vehicle>(
        r#"
        SELECT
            vehicle_number, label, vehicle_image,
            max_passengers, max_luggage,
            per_km, per_hour, min_hours, min_distance, min_rate,
            is_active
        FROM livery_vehicle
        WHERE is_active = true
        ORDER BY vehicle_number
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(vehicles)
}

/// Get all active services, in catalog order
pub async fn get_active_services(pool: &PgPool) -> Result<Vec<Service>, AppError> {
    let services = sqlx::query_as::<_, Service>(
        r#"
        SELECT service_number, label, is_hourly, is_active
        FROM livery_service
        WHERE is_active = true
        ORDER BY service_number
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(services)
}

/// Get all active line items, in catalog order
pub async fn get_active_line_items(pool: &PgPool) -> Result<Vec<LineItem>, AppError> {
    let items = sqlx::query_as::<_, LineItem>(
        r#"
        SELECT
            item_number, label, description,
            is_percentage, amount, is_taxable, is_active, applies_to
        FROM livery_line_item
        WHERE is_active = true
        ORDER BY item_number
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// Get all sales taxes, active and inactive.
///
/// The engine filters on the active flag itself, so retired rates can still
/// be shown on historical quote views.
pub async fn get_sales_taxes(pool: &PgPool) -> Result<Vec<SalesTax>, AppError> {
    let taxes = sqlx::query_as::<_, SalesTax>(
        r#"
        SELECT tax_number, tax_name, amount, region, is_active
        FROM livery_sales_tax
        ORDER BY tax_number
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(taxes)
}
