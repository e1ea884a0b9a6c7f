//! Quote service functions with database and cache access.
//!
//! These functions load the rate catalog (read-through against the
//! application cache), drive the pricing engine, and persist the computed
//! quote. The engine itself never sees the database.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;
use std::sync::Arc;

use crate::cache::AppCache;
use crate::db;
use crate::error::AppError;
use crate::models::{NewQuote, Quote};

use super::directions::DirectionsClient;
use super::engine::PricingEngine;
use super::models::{LineItem, SalesTax, Service, Vehicle};
use super::queries;
use super::requests::CreateQuoteRequest;

/// Airport pickup fee charged when the origin place is tagged as an
/// airport (the GTAA per-trip fee).
pub const AIRPORT_PICKUP_FEE: Decimal = dec!(13.27);

/// One consistent load of the full rate catalog.
#[derive(Debug, Clone)]
pub struct RateCatalog {
    pub vehicles: Vec<Vehicle>,
    pub services: Vec<Service>,
    pub line_items: Vec<LineItem>,
    pub sales_taxes: Vec<SalesTax>,
}

impl RateCatalog {
    pub fn find_vehicle(&self, vehicle_number: i32) -> Option<&Vehicle> {
        self.vehicles
            .iter()
            .find(|v| v.vehicle_number == vehicle_number)
    }

    pub fn find_service(&self, service_number: i32) -> Option<&Service> {
        self.services
            .iter()
            .find(|s| s.service_number == service_number)
    }
}

/// Load the rate catalog, reading through the cache.
pub async fn load_catalog(pool: &PgPool, cache: &AppCache) -> Result<RateCatalog, AppError> {
    Ok(RateCatalog {
        vehicles: cached_vehicles(pool, cache).await?,
        services: cached_services(pool, cache).await?,
        line_items: cached_line_items(pool, cache).await?,
        sales_taxes: cached_sales_taxes(pool, cache).await?,
    })
}

pub async fn cached_vehicles(pool: &PgPool, cache: &AppCache) -> Result<Vec<Vehicle>, AppError> {
    if let Some(cached) = cache.vehicles.get(AppCache::CATALOG_KEY).await {
        tracing::debug!("Cache HIT for vehicle catalog");
        return Ok((*cached).clone());
    }
    tracing::debug!("Cache MISS for vehicle catalog");
    let vehicles = queries::get_active_vehicles(pool).await?;
    cache
        .vehicles
        .insert(AppCache::CATALOG_KEY.to_string(), Arc::new(vehicles.clone()))
        .await;
    Ok(vehicles)
}

pub async fn cached_services(pool: &PgPool, cache: &AppCache) -> Result<Vec<Service>, AppError> {
    if let Some(cached) = cache.services.get(AppCache::CATALOG_KEY).await {
        tracing::debug!("Cache HIT for service catalog");
        return Ok((*cached).clone());
    }
    tracing::debug!("Cache MISS for service catalog");
    let services = queries::get_active_services(pool).await?;
    cache
        .services
        .insert(AppCache::CATALOG_KEY.to_string(), Arc::new(services.clone()))
        .await;
    Ok(services)
}

pub async fn cached_line_items(pool: &PgPool, cache: &AppCache) -> Result<Vec<LineItem>, AppError> {
    if let Some(cached) = cache.line_items.get(AppCache::CATALOG_KEY).await {
        tracing::debug!("Cache HIT for line item catalog");
        return Ok((*cached).clone());
    }
    tracing::debug!("Cache MISS for line item catalog");
    let items = queries::get_active_line_items(pool).await?;
    cache
        .line_items
        .insert(AppCache::CATALOG_KEY.to_string(), Arc::new(items.clone()))
        .await;
    Ok(items)
}

pub async fn cached_sales_taxes(pool: &PgPool, cache: &AppCache) -> Result<Vec<SalesTax>, AppError> {
    if let Some(cached) = cache.sales_taxes.get(AppCache::CATALOG_KEY).await {
        tracing::debug!("Cache HIT for sales tax catalog");
        return Ok((*cached).clone());
    }
    tracing::debug!("Cache MISS for sales tax catalog");
    let taxes = queries::get_sales_taxes(pool).await?;
    cache
        .sales_taxes
        .insert(AppCache::CATALOG_KEY.to_string(), Arc::new(taxes.clone()))
        .await;
    Ok(taxes)
}

/// Compute and persist a quote for a booking request.
///
/// Resolves the route distance (awaited before any dependent read), applies
/// the airport pickup fee when the origin is an airport, and stores the
/// itemized result. Notification delivery is a separate consumer of the
/// stored record; a failure there can never fail the quote.
#[tracing::instrument(skip(pool, cache, directions, request), fields(vehicle = request.vehicle_number, service = request.service_number))]
pub async fn create_quote(
    pool: &PgPool,
    cache: &AppCache,
    directions: &DirectionsClient,
    request: CreateQuoteRequest,
) -> Result<Quote, AppError> {
    let catalog = load_catalog(pool, cache).await?;

    let vehicle = catalog
        .find_vehicle(request.vehicle_number)
        .ok_or_else(|| AppError::UnknownSelection(format!("vehicle {}", request.vehicle_number)))?
        .clone();
    let service = catalog
        .find_service(request.service_number)
        .ok_or_else(|| AppError::UnknownSelection(format!("service {}", request.service_number)))?
        .clone();

    let mut engine = PricingEngine::new(
        vehicle,
        service,
        catalog.line_items.clone(),
        catalog.sales_taxes.clone(),
    );
    engine.set_route(
        request.origin.place_id.clone(),
        request.destination.place_id.clone(),
        request.stops.iter().map(|s| s.place_id.clone()).collect(),
    );
    engine.set_hours(Decimal::from(request.selected_hours));
    engine.set_context(request.origin.place_id.clone());
    engine.update_distance(directions).await?;

    if request.origin.is_airport() {
        engine.set_airport_pickup_fee(AIRPORT_PICKUP_FEE);
    } else {
        engine.set_airport_pickup_fee(Decimal::ZERO);
    }

    tracing::debug!(snapshot = ?engine.snapshot(), "computed quote");

    let first_leg = engine.route_data().and_then(|d| d.first_leg());
    let new_quote = NewQuote {
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        email_address: request.email_address.clone(),
        phone_number: request.phone_number.clone(),

        selected_hours: request.selected_hours,
        selected_passengers: request.selected_passengers,
        is_round_trip: request.is_round_trip,

        quote_subtotal: engine.sub_total(),
        quote_tax_total: engine.tax_total(),
        quote_total: engine.total_amount(),
        combined_line_items: engine.detailed_line_items_with_totals(),

        vehicle_number: engine.vehicle().vehicle_number,
        vehicle_label: engine.vehicle().label.clone(),
        service_number: engine.service().service_number,
        service_label: engine.service().label.clone(),

        origin_place_id: request.origin.place_id.clone(),
        origin_full_name: request.origin.full_name(),
        origin_lat: first_leg.map(|l| l.start_location.lat),
        origin_lng: first_leg.map(|l| l.start_location.lng),
        destination_place_id: request.destination.place_id.clone(),
        destination_full_name: request.destination.full_name(),
        destination_lat: first_leg.map(|l| l.end_location.lat),
        destination_lng: first_leg.map(|l| l.end_location.lng),

        distance_text: first_leg.map(|l| l.distance.text.clone()),
        duration_text: first_leg.map(|l| l.duration.text.clone()),

        pickup_date: request.pickup_date.clone(),
        pickup_time: request.pickup_time.clone(),
        return_date: request.return_date.clone(),
        return_time: request.return_time.clone(),
    };

    let quote = db::insert_quote(pool, &new_quote).await?;
    tracing::info!(
        quote_number = quote.quote_number,
        total = %quote.quote_total,
        "quote created"
    );

    Ok(quote)
}
