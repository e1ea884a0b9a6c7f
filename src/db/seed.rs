//! Default rate catalog seeding for local/dev databases.
//!
//! Populates vehicles, services, line items, and sales tax rows so the
//! booking form has something to quote against. Inserts are idempotent on
//! the catalog numbers; existing rows are left untouched.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;
use tracing::info;

use crate::error::Result;

struct SeedVehicle {
    vehicle_number: i32,
    label: &'static str,
    vehicle_image: &'static str,
    max_passengers: i32,
    max_luggage: i32,
    per_km: Decimal,
    per_hour: Decimal,
    min_hours: i32,
    min_distance: Decimal,
    min_rate: Decimal,
}

fn seed_vehicles() -> [SeedVehicle; 2] {
    [
        SeedVehicle {
            vehicle_number: 1,
            label: "Luxury Sedan",
            vehicle_image: "/images/standard_sedan-4.jpg",
            max_passengers: 3,
            max_luggage: 3,
            per_km: dec!(1.7),
            per_hour: dec!(80),
            min_hours: 2,
            min_distance: dec!(25),
            min_rate: dec!(0),
        },
        SeedVehicle {
            vehicle_number: 2,
            label: "Luxury SUV",
            vehicle_image: "/images/premium_suv-1.jpg",
            max_passengers: 6,
            max_luggage: 6,
            per_km: dec!(2.1),
            per_hour: dec!(105),
            min_hours: 2,
            min_distance: dec!(25),
            min_rate: dec!(0),
        },
    ]
}

/// Seed the default rate catalog.
pub async fn seed_catalog(pool: &PgPool) -> Result<()> {
    for v in seed_vehicles() {
        sqlx::query(
            r#"
            INSERT INTO livery_vehicle (
                vehicle_number, label, vehicle_image,
                max_passengers, max_luggage,
                per_km, per_hour, min_hours, min_distance, min_rate,
                is_active
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, true)
            ON CONFLICT (vehicle_number) DO NOTHING
            "#,
        )
        .bind(v.vehicle_number)
        .bind(v.label)
        .bind(v.vehicle_image)
        .bind(v.max_passengers)
        .bind(v.max_luggage)
        .bind(v.per_km)
        .bind(v.per_hour)
        .bind(v.min_hours)
        .bind(v.min_distance)
        .bind(v.min_rate)
        .execute(pool)
        .await?;
    }

    let services: [(i32, &str, bool); 4] = [
        (1, "Point-to-Point", false),
        (2, "To Airport", false),
        (3, "From Airport", false),
        (4, "Hourly / As Directed", true),
    ];
    for (service_number, label, is_hourly) in services {
        sqlx::query(
            r#"
            INSERT INTO livery_service (service_number, label, is_hourly, is_active)
            VALUES ($1, $2, $3, true)
            ON CONFLICT (service_number) DO NOTHING
            "#,
        )
        .bind(service_number)
        .bind(label)
        .bind(is_hourly)
        .execute(pool)
        .await?;
    }

    // (number, label, description, is_percentage, amount, is_taxable, applies_to)
    let line_items: [(i32, &str, &str, bool, Decimal, bool, &str); 2] = [
        (
            2001,
            "Gratuity",
            "Suggested gratuity (20%)",
            true,
            dec!(20),
            false,
            "base",
        ),
        (
            2002,
            "Fuel Surcharge",
            "Fuel surcharge (8%)",
            true,
            dec!(8),
            true,
            "base",
        ),
    ];
    for (item_number, label, description, is_percentage, amount, is_taxable, applies_to) in
        line_items
    {
        sqlx::query(
            r#"
            INSERT INTO livery_line_item (
                item_number, label, description,
                is_percentage, amount, is_taxable, is_active, applies_to
            ) VALUES ($1, $2, $3, $4, $5, $6, true, $7)
            ON CONFLICT (item_number) DO NOTHING
            "#,
        )
        .bind(item_number)
        .bind(label)
        .bind(description)
        .bind(is_percentage)
        .bind(amount)
        .bind(is_taxable)
        .bind(applies_to)
        .execute(pool)
        .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO livery_sales_tax (tax_number, tax_name, amount, region, is_active)
        VALUES ($1, $2, $3, $4, true)
        ON CONFLICT (tax_number) DO NOTHING
        "#,
    )
    .bind(1)
    .bind("HST")
    .bind(dec!(13))
    .bind("ON")
    .execute(pool)
    .await?;

    info!("Rate catalog seeded");
    Ok(())
}
